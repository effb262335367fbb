pub mod fetcher;
pub mod query;
pub mod youtube;

pub use fetcher::MetadataFetcher;
pub use query::{parse_query, VideoQuery};
pub use youtube::YouTubeClient;

pub mod prelude {
    pub use super::fetcher::MetadataFetcher;
    pub use tp_core::{Error, Result, VideoRecord};
}
