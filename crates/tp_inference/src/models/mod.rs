use std::sync::Arc;

use tp_core::{AppConfig, ArticleGenerator, Error, Result};

pub mod gemini;

pub use gemini::GeminiModel;

/// Builds the generator named by `config.gemini_model`.
pub fn create_model(config: &AppConfig) -> Result<Arc<dyn ArticleGenerator>> {
    let model_name = config.gemini_model.trim();
    if !model_name.starts_with("gemini") {
        return Err(Error::Generation(format!("Unsupported model: {}", model_name)));
    }
    let model = GeminiModel::new(config.gemini_key().map(str::to_string), model_name)?;
    tracing::info!("🧠 Using model {}", model_name);
    Ok(Arc::new(model))
}
