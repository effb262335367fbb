use std::path::PathBuf;

use crate::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_BLOG: &str = "yourblog";
pub const DEFAULT_CATEGORY: &str = "IT";
pub const DEFAULT_RECORDS_DIR: &str = "json";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_PROFILE_DIR: &str = "ChromeProfile";

/// Everything the pipeline needs, read once at start-up and passed by reference.
#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub kakao_id: Option<String>,
    pub kakao_pw: Option<String>,
    /// Account id in `https://<blog>.tistory.com`.
    pub blog: String,
    pub category: String,
    pub records_dir: PathBuf,
    pub webdriver_url: String,
    pub profile_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            kakao_id: None,
            kakao_pw: None,
            blog: DEFAULT_BLOG.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            records_dir: PathBuf::from(DEFAULT_RECORDS_DIR),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            profile_dir: PathBuf::from(DEFAULT_PROFILE_DIR),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_deref().map(|_| "<redacted>");
        f.debug_struct("AppConfig")
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("kakao_id", &self.kakao_id)
            .field("kakao_pw", &redact(&self.kakao_pw))
            .field("blog", &self.blog)
            .field("category", &self.category)
            .field("records_dir", &self.records_dir)
            .field("webdriver_url", &self.webdriver_url)
            .field("profile_dir", &self.profile_dir)
            .finish()
    }
}

impl AppConfig {
    pub fn blog_url(&self) -> String {
        format!("https://{}.tistory.com", self.blog)
    }

    pub fn youtube_key(&self) -> Option<&str> {
        non_blank(&self.youtube_api_key)
    }

    pub fn gemini_key(&self) -> Option<&str> {
        non_blank(&self.gemini_api_key)
    }

    /// Kakao id and password, when both are set.
    pub fn kakao_credentials(&self) -> Option<(&str, &str)> {
        Some((non_blank(&self.kakao_id)?, non_blank(&self.kakao_pw)?))
    }

    /// Checks the keys the run cannot do without.
    ///
    /// A missing YouTube key only produces a warning: direct URLs still work in degraded mode.
    pub fn validate(&self) -> Result<()> {
        if self.youtube_key().is_none() {
            tracing::warn!("⚠️ YOUTUBE_API_KEY is not set; only video URLs can be posted");
        }
        if self.gemini_key().is_none() {
            return Err(Error::ConfigMissing(
                "GEMINI_API_KEY is not set; content generation is impossible".to_string(),
            ));
        }
        if self.kakao_credentials().is_none() {
            return Err(Error::ConfigMissing(
                "KAKAO_ID/KAKAO_PW are not set; Tistory login is impossible".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
