use std::fmt;

use async_trait::async_trait;
use crate::types::{VideoDetails, VideoRecord};
use crate::Result;

/// A generative-text service that writes blog articles.
#[async_trait]
pub trait ArticleGenerator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Generates a markdown article for the given video. One request, no retry.
    async fn generate_article(&self, record: &VideoRecord) -> Result<String>;
}

/// A video metadata service.
#[async_trait]
pub trait VideoSource: Send + Sync + fmt::Debug {
    /// Returns the id of the first video matching `query`, if any.
    async fn search_first(&self, query: &str) -> Result<Option<String>>;

    /// Looks up the details of a single video.
    async fn video_details(&self, video_id: &str) -> Result<VideoDetails>;
}
