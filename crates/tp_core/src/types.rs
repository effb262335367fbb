use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format of `VideoRecord::search_date`.
pub const SEARCH_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for synthesized `VideoRecord::upload_date` values.
pub const UPLOAD_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Where the descriptive fields of a record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    /// Returned by the YouTube Data API.
    #[default]
    Api,
    /// Synthesized because the API was unavailable or failed.
    Placeholder,
}

/// Metadata for one video, persisted as a JSON file and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub upload_date: String,
    pub view_count: String,
    pub tags: Vec<String>,
    pub search_date: String,
    #[serde(default)]
    pub source: RecordSource,
}

impl VideoRecord {
    /// Builds a record from service details, stamped with the fetch time.
    pub fn from_details(video_id: &str, details: VideoDetails, fetched_at: DateTime<Local>) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: details.title,
            description: details.description,
            channel_title: details.channel_title,
            upload_date: details.published_at,
            view_count: details.view_count,
            tags: details.tags,
            search_date: fetched_at.format(SEARCH_DATE_FORMAT).to_string(),
            source: RecordSource::Api,
        }
    }

    /// Builds a placeholder record for a video whose details are unavailable.
    pub fn placeholder(video_id: &str, description: &str, fetched_at: DateTime<Local>) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: format!("YouTube 영상 ({})", video_id),
            description: description.to_string(),
            channel_title: "YouTube 채널".to_string(),
            upload_date: fetched_at.format(UPLOAD_DATE_FORMAT).to_string(),
            view_count: "0".to_string(),
            tags: Vec::new(),
            search_date: fetched_at.format(SEARCH_DATE_FORMAT).to_string(),
            source: RecordSource::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == RecordSource::Placeholder
    }

    /// Short link to the video.
    pub fn video_url(&self) -> String {
        format!("https://youtu.be/{}", self.video_id)
    }
}

/// Descriptive fields the metadata service returns for one video id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
    pub view_count: String,
    pub tags: Vec<String>,
}

/// A generated article ready for the editor. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub body_markup: String,
}
