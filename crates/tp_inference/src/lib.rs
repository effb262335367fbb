pub mod markup;
pub mod models;
pub mod prompt;

pub use markup::convert;
pub use models::create_model;

pub mod prelude {
    pub use super::markup::convert;
    pub use super::models::{create_model, GeminiModel};
    pub use tp_core::{ArticleDraft, ArticleGenerator, Error, Result, VideoRecord};
}
