use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 表單送上來的原始欄位，鍵為欄位名稱
pub type RawCourse = HashMap<String, String>;

pub const REQUIRED_FIELDS: [&str; 3] = ["code", "name", "instructor"];

pub const OPTIONAL_FIELDS: [&str; 6] = [
    "semester",
    "schedule",
    "classroom",
    "prerequisites",
    "grading",
    "description",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub instructor: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub classroom: String,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub grading: String,
    #[serde(default)]
    pub description: String,
}

impl Course {
    /// Looks up a field value by its form name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "code" => &self.code,
            "name" => &self.name,
            "instructor" => &self.instructor,
            "semester" => &self.semester,
            "schedule" => &self.schedule,
            "classroom" => &self.classroom,
            "prerequisites" => &self.prerequisites,
            "grading" => &self.grading,
            "description" => &self.description,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Same course with every field trimmed.
    pub fn trimmed(self) -> Course {
        let trim = |value: String| value.trim().to_string();
        Course {
            code: trim(self.code),
            name: trim(self.name),
            instructor: trim(self.instructor),
            semester: trim(self.semester),
            schedule: trim(self.schedule),
            classroom: trim(self.classroom),
            prerequisites: trim(self.prerequisites),
            grading: trim(self.grading),
            description: trim(self.description),
        }
    }

    pub fn empty_optional_fields(&self) -> Vec<&'static str> {
        OPTIONAL_FIELDS
            .iter()
            .copied()
            .filter(|field| self.field(field).is_some_and(str::is_empty))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldErrorKind {
    MissingField,
    DuplicateCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    pub fn message(&self) -> String {
        let label = capitalize(&self.field);
        match self.kind {
            FieldErrorKind::MissingField => format!("{} is required and cannot be empty", label),
            FieldErrorKind::DuplicateCode => format!("{} is already in use by another course", label),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// 驗證成功的課程，附帶空白選填欄位的警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCourse {
    pub course: Course,
    pub warnings: Vec<&'static str>,
}

pub fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
