use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crate::types::VideoRecord;
use crate::Result;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a record as a new file and returns its path
    async fn write_record(&self, record: &VideoRecord) -> Result<PathBuf>;

    /// Reads back a record written by `write_record`
    async fn read_record(&self, path: &Path) -> Result<VideoRecord>;
}
