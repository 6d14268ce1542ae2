use crate::utils::error::Result;
use async_trait::async_trait;

/// 課程目錄快照的持久化後端
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns `None` when nothing has been written at `path` yet.
    async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>>;
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
