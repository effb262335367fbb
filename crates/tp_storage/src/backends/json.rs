use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tp_core::{RecordStore, Result, VideoRecord};

/// Timestamp part of record file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes one pretty-printed JSON file per fetch into a single directory.
///
/// Files are created once and never rewritten; stale records simply accumulate.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<video_id>_<YYYYMMDD_HHMMSS>.json`
    pub fn record_path(&self, video_id: &str, at: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", video_id, at.format(FILE_TIMESTAMP_FORMAT)))
    }

    /// Writes `record` as fetched at `at`.
    ///
    /// A second fetch of the same video within one second gets `_1`, `_2`, ... appended
    /// instead of replacing the earlier file.
    pub async fn write_record_at(&self, record: &VideoRecord, at: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(record)?;

        let base = self.record_path(&record.video_id, at);
        let mut path = base.clone();
        let mut attempt = 0u32;
        let mut file = loop {
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                    path = base.with_file_name(format!(
                        "{}_{}_{}.json",
                        record.video_id,
                        at.format(FILE_TIMESTAMP_FORMAT),
                        attempt
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        };
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("💾 Stored record {} at {}", record.video_id, path.display());
        Ok(path)
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn write_record(&self, record: &VideoRecord) -> Result<PathBuf> {
        self.write_record_at(record, Local::now()).await
    }

    async fn read_record(&self, path: &Path) -> Result<VideoRecord> {
        let json = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json)?)
    }
}
