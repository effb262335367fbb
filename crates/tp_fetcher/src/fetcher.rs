use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tp_core::{AppConfig, Error, RecordStore, Result, VideoRecord, VideoSource};
use tracing::{info, warn};

use crate::query::{parse_query, VideoQuery};
use crate::youtube::YouTubeClient;

pub const NO_KEY_DESCRIPTION: &str = "YouTube 영상에 대한 설명입니다.";
pub const API_FAILURE_DESCRIPTION: &str = "YouTube API 호출 실패로 상세 정보를 가져올 수 없습니다.";

/// Resolves a query to one video and writes its record to disk.
pub struct MetadataFetcher {
    source: Option<Arc<dyn VideoSource>>,
    store: Arc<dyn RecordStore>,
}

impl MetadataFetcher {
    pub fn new(source: Option<Arc<dyn VideoSource>>, store: Arc<dyn RecordStore>) -> Self {
        Self { source, store }
    }

    /// Uses the YouTube Data API when a key is configured, degraded mode otherwise.
    pub fn from_config(config: &AppConfig, store: Arc<dyn RecordStore>) -> Self {
        let source = config
            .youtube_key()
            .map(|key| Arc::new(YouTubeClient::new(key)) as Arc<dyn VideoSource>);
        Self::new(source, store)
    }

    /// Fetches metadata for a video link or search term and returns the record file path.
    pub async fn fetch(&self, query: &str) -> Result<PathBuf> {
        let record = match parse_query(query)? {
            VideoQuery::Direct(video_id) => {
                info!("🔗 YouTube URL detected, video id {}", video_id);
                self.resolve(&video_id).await
            }
            VideoQuery::Search(term) => {
                let source = self.source.as_ref().ok_or(Error::NoCredential)?;
                info!("🔍 Searching YouTube for \"{}\"", term);
                let video_id = source
                    .search_first(&term)
                    .await
                    .map_err(|e| Error::Api(format!("search failed: {}", e)))?
                    .ok_or_else(|| Error::EmptyResult(term.clone()))?;
                info!("🎯 First result: {}", video_id);
                self.resolve(&video_id).await
            }
        };

        if record.is_placeholder() {
            warn!("⚠️ Continuing with placeholder metadata for {}", record.video_id);
        }
        self.store.write_record(&record).await
    }

    /// Looks the id up, falling back to a placeholder record on any failure.
    async fn resolve(&self, video_id: &str) -> VideoRecord {
        let Some(source) = self.source.as_ref() else {
            info!("No YouTube API key configured; using basic information only");
            return VideoRecord::placeholder(video_id, NO_KEY_DESCRIPTION, Local::now());
        };

        match source.video_details(video_id).await {
            Ok(details) => VideoRecord::from_details(video_id, details, Local::now()),
            Err(e) => {
                warn!("❌ YouTube API call failed for {}: {}", video_id, e);
                VideoRecord::placeholder(video_id, API_FAILURE_DESCRIPTION, Local::now())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tp_core::{RecordSource, VideoDetails};
    use tp_storage::JsonRecordStore;

    #[derive(Debug, Default)]
    struct FakeSource {
        search_result: Option<String>,
        fail_search: bool,
        fail_details: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VideoSource for FakeSource {
        async fn search_first(&self, query: &str) -> Result<Option<String>> {
            self.calls.lock().unwrap().push(format!("search:{}", query));
            if self.fail_search {
                return Err(Error::Api("quota exceeded".to_string()));
            }
            Ok(self.search_result.clone())
        }

        async fn video_details(&self, video_id: &str) -> Result<VideoDetails> {
            self.calls.lock().unwrap().push(format!("details:{}", video_id));
            if self.fail_details {
                return Err(Error::Api("403 Forbidden".to_string()));
            }
            Ok(VideoDetails {
                title: "Async Rust explained".to_string(),
                description: "Futures, executors and wakers".to_string(),
                channel_title: "Jon Gjengset".to_string(),
                published_at: "2022-02-01T12:00:00Z".to_string(),
                view_count: "98765".to_string(),
                tags: vec!["rust".to_string(), "async".to_string()],
            })
        }
    }

    fn fetcher_with(
        source: Option<Arc<FakeSource>>,
        dir: &tempfile::TempDir,
    ) -> (MetadataFetcher, Arc<JsonRecordStore>) {
        let store = Arc::new(JsonRecordStore::new(dir.path().join("json")));
        let source = source.map(|s| s as Arc<dyn VideoSource>);
        (MetadataFetcher::new(source, store.clone()), store)
    }

    fn written_files(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path().join("json"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_url_without_key_uses_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, store) = fetcher_with(None, &dir);

        let path = fetcher.fetch("https://youtu.be/abc123XYZ").await.unwrap();
        let record = store.read_record(&path).await.unwrap();

        assert_eq!(record.video_id, "abc123XYZ");
        assert_eq!(record.title, "YouTube 영상 (abc123XYZ)");
        assert_eq!(record.view_count, "0");
        assert_eq!(record.description, NO_KEY_DESCRIPTION);
        assert_eq!(record.source, RecordSource::Placeholder);
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("abc123XYZ_"));
    }

    #[tokio::test]
    async fn test_search_without_key_fails_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, _) = fetcher_with(None, &dir);

        let result = fetcher.fetch("rust ownership").await;
        assert!(matches!(result, Err(Error::NoCredential)));
        assert_eq!(written_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_api_failure_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(FakeSource {
            fail_details: true,
            ..FakeSource::default()
        });
        let (fetcher, store) = fetcher_with(Some(source.clone()), &dir);

        let path = fetcher
            .fetch("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();
        let record = store.read_record(&path).await.unwrap();

        assert_eq!(record.video_id, "dQw4w9WgXcQ");
        assert_eq!(record.description, API_FAILURE_DESCRIPTION);
        assert!(record.is_placeholder());
        assert_eq!(*source.calls.lock().unwrap(), vec!["details:dQw4w9WgXcQ"]);
    }

    #[tokio::test]
    async fn test_search_takes_first_result() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(FakeSource {
            search_result: Some("firstHit01".to_string()),
            ..FakeSource::default()
        });
        let (fetcher, store) = fetcher_with(Some(source.clone()), &dir);

        let path = fetcher.fetch("async rust").await.unwrap();
        let record = store.read_record(&path).await.unwrap();

        assert_eq!(record.video_id, "firstHit01");
        assert_eq!(record.channel_title, "Jon Gjengset");
        assert_eq!(record.source, RecordSource::Api);
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec!["search:async rust", "details:firstHit01"]
        );
    }

    #[tokio::test]
    async fn test_empty_search_result() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, _) = fetcher_with(Some(Arc::new(FakeSource::default())), &dir);

        let result = fetcher.fetch("zzzz no such video").await;
        assert!(matches!(result, Err(Error::EmptyResult(_))));
        assert_eq!(written_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_failed_search_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(FakeSource {
            fail_search: true,
            ..FakeSource::default()
        });
        let (fetcher, _) = fetcher_with(Some(source), &dir);

        assert!(matches!(fetcher.fetch("anything").await, Err(Error::Api(_))));
    }

    #[tokio::test]
    async fn test_unresolvable_link() {
        let dir = tempfile::tempdir().unwrap();
        let (fetcher, _) = fetcher_with(None, &dir);

        let result = fetcher.fetch("https://www.youtube.com/watch?v=").await;
        assert!(matches!(result, Err(Error::ResolutionFailed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_still_yields_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonRecordStore::new(dir.path()));
        let client = YouTubeClient::new("test-key").with_base_url("http://127.0.0.1:9");
        let fetcher = MetadataFetcher::new(Some(Arc::new(client)), store.clone());

        let path = fetcher.fetch("https://youtu.be/offline42").await.unwrap();
        let record = store.read_record(&path).await.unwrap();
        assert_eq!(record.video_id, "offline42");
        assert!(record.is_placeholder());
    }
}
