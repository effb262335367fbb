use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tp_core::{Error, Result, VideoDetails, VideoSource};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const SEARCH_MAX_RESULTS: &str = "5";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    channel_title: String,
    published_at: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

impl From<VideoItem> for VideoDetails {
    fn from(item: VideoItem) -> Self {
        Self {
            title: item.snippet.title,
            description: item.snippet.description,
            channel_title: item.snippet.channel_title,
            published_at: item.snippet.published_at,
            view_count: item.statistics.view_count.unwrap_or_else(|| "0".to_string()),
            tags: item.snippet.tags,
        }
    }
}

/// Client for the YouTube Data API v3 (`search.list` and `videos.list`).
pub struct YouTubeClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn search_first(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "id,snippet"),
                ("q", query),
                ("maxResults", SEARCH_MAX_RESULTS),
                ("type", "video"),
            ])
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id))
    }

    async fn video_details(&self, video_id: &str) -> Result<VideoDetails> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,statistics"),
                ("id", video_id),
            ])
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await?
            .error_for_status()?
            .json::<VideosResponse>()
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(VideoDetails::from)
            .ok_or_else(|| Error::Api(format!("no video found for id {}", video_id)))
    }
}
