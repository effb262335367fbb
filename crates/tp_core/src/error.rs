use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Never carries the request URL, which may hold an API key.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    #[error("Browser session could not start: {0}")]
    DriverInit(String),

    #[error("Login was not confirmed within {0} seconds")]
    LoginTimeout(u64),

    #[error("Could not resolve a video id from: {0}")]
    ResolutionFailed(String),

    #[error("Search returned no videos for: {0}")]
    EmptyResult(String),

    #[error("YouTube API key is not configured; search is unavailable")]
    NoCredential,

    #[error("API error: {0}")]
    Api(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("{step} failed: {message}")]
    UiStep { step: String, message: String },

    #[error("Timed out waiting for {0}")]
    WaitTimeout(String),

    #[error("Save was not confirmed within {0} seconds")]
    SaveTimeout(u64),

    #[error("Browser error: {0}")]
    Browser(String),
}

impl Error {
    pub fn ui_step(step: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::UiStep {
            step: step.into(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
