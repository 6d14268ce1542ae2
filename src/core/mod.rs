pub mod store;
pub mod validation;

pub use crate::domain::model::{Course, FieldError, FieldErrorKind, RawCourse, ValidatedCourse};
pub use crate::domain::ports::Storage;
pub use crate::utils::error::Result;
