use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActivityStats {
    pub added_courses: u64,
    pub missing_field_errors: u64,
    pub validation_errors: u64,
    pub storage_errors: u64,
    pub deletion_errors: u64,
    pub catalog_page_views: u64,
    pub uptime_seconds: u64,
}

/// 整個行程共用的操作計數器
#[derive(Debug)]
pub struct ActivityMonitor {
    added_courses: AtomicU64,
    missing_field_errors: AtomicU64,
    validation_errors: AtomicU64,
    storage_errors: AtomicU64,
    deletion_errors: AtomicU64,
    catalog_page_views: AtomicU64,
    start_time: Instant,
}

impl ActivityMonitor {
    pub fn new() -> Self {
        Self {
            added_courses: AtomicU64::new(0),
            missing_field_errors: AtomicU64::new(0),
            validation_errors: AtomicU64::new(0),
            storage_errors: AtomicU64::new(0),
            deletion_errors: AtomicU64::new(0),
            catalog_page_views: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_course_added(&self) -> u64 {
        self.added_courses.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_missing_fields(&self) -> u64 {
        self.missing_field_errors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_validation_error(&self) -> u64 {
        self.validation_errors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_storage_error(&self) -> u64 {
        self.storage_errors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_deletion_error(&self) -> u64 {
        self.deletion_errors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_catalog_view(&self) -> u64 {
        self.catalog_page_views.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> ActivityStats {
        ActivityStats {
            added_courses: self.added_courses.load(Ordering::Relaxed),
            missing_field_errors: self.missing_field_errors.load(Ordering::Relaxed),
            validation_errors: self.validation_errors.load(Ordering::Relaxed),
            storage_errors: self.storage_errors.load(Ordering::Relaxed),
            deletion_errors: self.deletion_errors.load(Ordering::Relaxed),
            catalog_page_views: self.catalog_page_views.load(Ordering::Relaxed),
            uptime_seconds: self.elapsed().as_secs(),
        }
    }

    pub fn log_stats(&self, phase: &str) {
        let stats = self.snapshot();
        tracing::info!(
            "📊 {} - added: {}, missing fields: {}, validation errors: {}, storage errors: {}, deletion errors: {}, catalog views: {}, uptime: {}s",
            phase,
            stats.added_courses,
            stats.missing_field_errors,
            stats.validation_errors,
            stats.storage_errors,
            stats.deletion_errors,
            stats.catalog_page_views,
            stats.uptime_seconds
        );
    }
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}
