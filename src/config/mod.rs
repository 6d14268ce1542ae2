#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::{LocalStorage, MemoryStorage};
use crate::core::store::{CourseStore, DEFAULT_CATALOG_FILE};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::logger::LoggerOptions;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: String,
    pub file_name: String,
}

/// 合併 TOML 與命令列之後的完整設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub logging: LoggerOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            storage: StorageSettings {
                backend: StorageBackend::Memory,
                path: ".".to_string(),
                file_name: DEFAULT_CATALOG_FILE.to_string(),
            },
            logging: LoggerOptions::default(),
        }
    }
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Builds the course store for the configured backend.
    pub async fn open_store(&self) -> Result<CourseStore> {
        let storage: Arc<dyn Storage> = match self.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            StorageBackend::File => Arc::new(LocalStorage::new(&self.storage.path)),
        };
        CourseStore::open(storage, self.storage.file_name.clone()).await
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.port", self.server.port as usize, 1)?;

        if self.storage.backend == StorageBackend::File {
            validate_path("storage.path", &self.storage.path)?;
        }
        validate_path("storage.file_name", &self.storage.file_name)?;

        if let Some(level) = &self.logging.level {
            validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }
        if let Some(log_dir) = &self.logging.log_dir {
            validate_path("logging.log_dir", log_dir)?;
            validate_path("logging.file_name", &self.logging.file_name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CatalogError;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = Some("loud".to_string());

        assert!(matches!(
            config.validate(),
            Err(CatalogError::InvalidConfigValueError { field, .. }) if field == "logging.level"
        ));
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::File;
        config.storage.path = String::new();

        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_open_file_store_reads_existing_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("catalog.json"),
            r#"[{"code": "CS101", "name": "Intro", "instructor": "Lee"}]"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::File;
        config.storage.path = temp_dir.path().to_str().unwrap().to_string();
        config.storage.file_name = "catalog.json".to_string();

        let store = config.open_store().await.unwrap();

        assert_eq!(store.get("CS101").await.unwrap().instructor, "Lee");
    }
}
