pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use models::{ArticleGenerator, VideoSource};
pub use storage::RecordStore;
pub use types::{ArticleDraft, RecordSource, VideoDetails, VideoRecord};
