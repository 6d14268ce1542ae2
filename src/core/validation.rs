use crate::domain::model::{
    Course, FieldError, FieldErrorKind, RawCourse, ValidatedCourse, REQUIRED_FIELDS,
};
use crate::utils::error::CatalogError;

/// 已存在課程代碼的唯讀視圖
pub trait ExistingCodes {
    fn contains_code(&self, code: &str) -> bool;
}

impl ExistingCodes for [Course] {
    fn contains_code(&self, code: &str) -> bool {
        self.iter().any(|course| course.code == code)
    }
}

impl ExistingCodes for Vec<Course> {
    fn contains_code(&self, code: &str) -> bool {
        self.as_slice().contains_code(code)
    }
}

impl ExistingCodes for std::collections::HashSet<String> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code)
    }
}

fn trimmed(raw: &RawCourse, field: &str) -> String {
    raw.get(field).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Checks a raw submission and produces a normalized course.
///
/// Every missing required field is reported, together with a duplicate code
/// when the code is present but already taken. Unknown keys are ignored.
#[tracing::instrument(name = "validate-course", skip_all, fields(code = raw.get("code").map(|c| c.trim())))]
pub fn validate_course<E>(raw: &RawCourse, existing: &E) -> Result<ValidatedCourse, Vec<FieldError>>
where
    E: ExistingCodes + ?Sized,
{
    let mut errors: Vec<FieldError> = REQUIRED_FIELDS
        .iter()
        .filter(|field| trimmed(raw, field).is_empty())
        .map(|field| FieldError::new(*field, FieldErrorKind::MissingField))
        .collect();

    let code = trimmed(raw, "code");
    if !code.is_empty() && existing.contains_code(&code) {
        errors.push(FieldError::new("code", FieldErrorKind::DuplicateCode));
    }

    if !errors.is_empty() {
        tracing::warn!(
            validation.status = "error",
            errors = %errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>().join(", "),
            "Course submission rejected"
        );
        return Err(errors);
    }

    let course = Course {
        code,
        name: trimmed(raw, "name"),
        instructor: trimmed(raw, "instructor"),
        semester: trimmed(raw, "semester"),
        schedule: trimmed(raw, "schedule"),
        classroom: trimmed(raw, "classroom"),
        prerequisites: trimmed(raw, "prerequisites"),
        grading: trimmed(raw, "grading"),
        description: trimmed(raw, "description"),
    };

    let warnings = course.empty_optional_fields();
    if warnings.is_empty() {
        tracing::debug!(validation.status = "success", "Course submission valid");
    } else {
        tracing::warn!(
            validation.status = "warning",
            warning_fields = %warnings.join(", "),
            "Optional course fields are empty"
        );
    }

    Ok(ValidatedCourse { course, warnings })
}

/// Re-checks courses read back from a catalog snapshot.
///
/// Records are trimmed the same way a submission is. A record with an empty
/// required field fails with `Validation`, a repeated code with `DuplicateCode`.
#[tracing::instrument(name = "check-snapshot", skip_all, fields(course.count = records.len()))]
pub fn validate_snapshot(records: Vec<Course>) -> crate::utils::error::Result<Vec<Course>> {
    let mut courses: Vec<Course> = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let course = record.trimmed();

        let errors: Vec<FieldError> = REQUIRED_FIELDS
            .iter()
            .filter(|field| course.field(field).is_some_and(str::is_empty))
            .map(|field| FieldError::new(*field, FieldErrorKind::MissingField))
            .collect();
        if !errors.is_empty() {
            tracing::error!(snapshot.index = index, "❌ Stored course is missing required fields");
            return Err(CatalogError::Validation { errors });
        }

        if courses.contains_code(&course.code) {
            tracing::error!(snapshot.index = index, course.code = %course.code, "❌ Stored course code is duplicated");
            return Err(CatalogError::DuplicateCode { code: course.code });
        }

        courses.push(course);
    }

    Ok(courses)
}
