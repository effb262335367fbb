use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tp_core::{ArticleGenerator, Error, Result, VideoRecord};

use crate::prompt::build_prompt;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Joined text of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiModel {
    client: Arc<Client>,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Generation("Gemini API key is required".to_string()))?;
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        response
            .into_text()
            .ok_or_else(|| Error::Generation("Gemini returned an empty response".to_string()))
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ArticleGenerator for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_article(&self, record: &VideoRecord) -> Result<String> {
        let prompt = build_prompt(record);
        tracing::debug!("🧠 Sending {} character prompt to {}", prompt.chars().count(), self.model);
        self.complete(prompt).await.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })
    }
}
