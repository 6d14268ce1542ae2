use crate::adapters::MemoryStorage;
use crate::core::validation::{validate_course, validate_snapshot};
use crate::domain::model::{Course, RawCourse, ValidatedCourse};
use crate::domain::ports::Storage;
use crate::utils::error::{CatalogError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub const DEFAULT_CATALOG_FILE: &str = "course_catalog.json";

/// 課程目錄：唯一擁有所有 Course 的地方
///
/// Mutations are serialized by one mutex around the ordered collection. The
/// snapshot is written to storage while the lock is held, so the persisted
/// order always matches the in-memory order.
pub struct CourseStore {
    courses: Mutex<Vec<Course>>,
    storage: Arc<dyn Storage>,
    file_name: String,
}

impl CourseStore {
    /// Empty catalog backed by process memory only.
    pub fn in_memory() -> Self {
        Self {
            courses: Mutex::new(Vec::new()),
            storage: Arc::new(MemoryStorage::new()),
            file_name: DEFAULT_CATALOG_FILE.to_string(),
        }
    }

    /// Loads the catalog snapshot from storage. A missing snapshot is an empty catalog.
    ///
    /// Stored records go through the same required-field and unique-code rules
    /// as submissions; a snapshot that breaks them is rejected.
    #[tracing::instrument(name = "load-courses", skip(storage, file_name))]
    pub async fn open(storage: Arc<dyn Storage>, file_name: impl Into<String>) -> Result<Self> {
        let start_time = Instant::now();
        let file_name = file_name.into();

        let courses: Vec<Course> = match storage.read_file(&file_name).await? {
            Some(data) => validate_snapshot(serde_json::from_slice(&data)?)?,
            None => Vec::new(),
        };

        tracing::info!(
            course.count = courses.len(),
            load.time_ms = start_time.elapsed().as_millis() as u64,
            "📚 Loaded course catalog from {}",
            file_name
        );

        Ok(Self {
            courses: Mutex::new(courses),
            storage,
            file_name,
        })
    }

    /// Validates a raw submission and inserts it under a single lock, so the
    /// duplicate check cannot race with a concurrent insert of the same code.
    #[tracing::instrument(name = "submit-course", skip_all)]
    pub async fn submit(&self, raw: &RawCourse) -> Result<ValidatedCourse> {
        let mut courses = self.courses.lock().await;
        let validated = validate_course(raw, courses.as_slice())?;
        self.insert_locked(&mut courses, validated.course.clone())
            .await?;
        Ok(validated)
    }

    #[tracing::instrument(name = "add-course", skip_all, fields(course.code = %course.code))]
    pub async fn add(&self, course: Course) -> Result<Course> {
        let mut courses = self.courses.lock().await;
        self.insert_locked(&mut courses, course).await
    }

    /// 依加入順序回傳所有課程
    #[tracing::instrument(name = "list-courses", skip_all)]
    pub async fn list(&self) -> Vec<Course> {
        self.courses.lock().await.clone()
    }

    #[tracing::instrument(name = "get-course", skip(self))]
    pub async fn get(&self, code: &str) -> Result<Course> {
        let courses = self.courses.lock().await;
        courses
            .iter()
            .find(|course| course.code == code)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound {
                code: code.to_string(),
            })
    }

    #[tracing::instrument(name = "delete-course-by-code", skip(self))]
    pub async fn delete(&self, code: &str) -> Result<Course> {
        let start_time = Instant::now();
        let mut courses = self.courses.lock().await;

        let Some(index) = courses.iter().position(|course| course.code == code) else {
            tracing::warn!(delete.status = "not-found", "Course to delete not found");
            return Err(CatalogError::NotFound {
                code: code.to_string(),
            });
        };

        let removed = courses.remove(index);
        if let Err(e) = self.persist(&courses).await {
            courses.insert(index, removed);
            tracing::error!("❌ Failed to persist deletion, rolled back: {}", e);
            return Err(e);
        }

        tracing::info!(
            course.count = courses.len(),
            delete.time_ms = start_time.elapsed().as_millis() as u64,
            "🗑️ Course deleted"
        );
        Ok(removed)
    }

    #[tracing::instrument(name = "count-courses", skip_all)]
    pub async fn len(&self) -> usize {
        self.courses.lock().await.len()
    }

    #[tracing::instrument(name = "count-courses", skip_all)]
    pub async fn is_empty(&self) -> bool {
        self.courses.lock().await.is_empty()
    }

    async fn insert_locked(&self, courses: &mut Vec<Course>, course: Course) -> Result<Course> {
        let start_time = Instant::now();

        if courses.iter().any(|existing| existing.code == course.code) {
            tracing::warn!(course.code = %course.code, "Duplicate course code rejected");
            return Err(CatalogError::DuplicateCode { code: course.code });
        }

        courses.push(course.clone());
        if let Err(e) = self.persist(courses).await {
            courses.pop();
            tracing::error!("❌ Failed to persist new course, rolled back: {}", e);
            return Err(e);
        }

        tracing::info!(
            course.code = %course.code,
            course.count = courses.len(),
            save.time_ms = start_time.elapsed().as_millis() as u64,
            "✅ Course added"
        );
        Ok(course)
    }

    async fn persist(&self, courses: &[Course]) -> Result<()> {
        let data = serde_json::to_vec_pretty(courses)?;
        tracing::debug!("Writing catalog snapshot ({} bytes) to {}", data.len(), self.file_name);
        self.storage.write_file(&self.file_name, &data).await
    }
}

impl Default for CourseStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
