use crate::domain::model::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Course code '{code}' already exists")]
    DuplicateCode { code: String },

    #[error("Course '{code}' not found")]
    NotFound { code: String },

    #[error("Invalid course submission: {}", join_messages(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Catalog,
    Storage,
    Configuration,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::message)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::Validation { .. } => ErrorCategory::Validation,
            CatalogError::DuplicateCode { .. } | CatalogError::NotFound { .. } => {
                ErrorCategory::Catalog
            }
            CatalogError::IoError(_) | CatalogError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            CatalogError::ConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CatalogError::ServerError { .. } => ErrorCategory::Server,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Catalog => ErrorSeverity::Low,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Server => ErrorSeverity::Critical,
        }
    }

    /// 使用者看得懂的訊息，頁面與終端機都用這個
    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::DuplicateCode { code } => {
                format!("A course with code {} already exists.", code)
            }
            CatalogError::NotFound { code } => format!("Course with code {} not found.", code),
            CatalogError::Validation { errors } => join_messages(errors),
            CatalogError::IoError(_) | CatalogError::SerializationError(_) => {
                "Failed to save course".to_string()
            }
            CatalogError::ServerError { message } => format!("Server failure: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CatalogError::Validation { .. } => {
                "Fill in the code, name and instructor fields with a code not yet in the catalog"
            }
            CatalogError::DuplicateCode { .. } => "Pick a course code that is not in the catalog",
            CatalogError::NotFound { .. } => "Check the course code against the catalog listing",
            CatalogError::IoError(_) => "Check that the data directory exists and is writable",
            CatalogError::SerializationError(_) => {
                "The catalog file may be corrupted; restore it or remove it to start empty"
            }
            CatalogError::ConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
            CatalogError::ServerError { .. } => "Make sure the listen address is free and valid",
        }
    }
}

impl From<Vec<FieldError>> for CatalogError {
    fn from(errors: Vec<FieldError>) -> Self {
        CatalogError::Validation { errors }
    }
}
