pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{LocalStorage, MemoryStorage};
pub use config::AppConfig;
pub use core::{store::CourseStore, validation::validate_course};
pub use domain::model::{Course, FieldError, FieldErrorKind};
pub use server::{create_router, AppState};
pub use utils::error::{CatalogError, Result};
