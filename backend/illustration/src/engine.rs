//! Image-generation provider. Returns raw image bytes.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use reqwest::Client;
use tracing::info;

use cardforge_core::CardError;

/// Generated illustrations are square.
const IMAGE_SIZE: &str = "1024x1024";

/// Turns a text prompt into image bytes.
#[async_trait]
pub trait IllustrationProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Bytes, CardError>;
}

/// OpenAI image-generation provider.
pub struct OpenAiImages {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl OpenAiImages {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gpt-image-1".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl IllustrationProvider for OpenAiImages {
    async fn generate(&self, prompt: &str) -> Result<Bytes, CardError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "size": IMAGE_SIZE,
        });

        info!(model = %self.model, "Generating summary illustration");
        let resp = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CardError::provider("openai-images", e.to_string()))?;

        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CardError::provider("openai-images", message));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CardError::provider("openai-images", e.to_string()))?;
        let b64 = json["data"][0]["b64_json"].as_str().ok_or_else(|| {
            CardError::provider("openai-images", "no image payload in response")
        })?;

        let bytes = STANDARD
            .decode(b64)
            .map_err(|e| CardError::provider("openai-images", e.to_string()))?;
        Ok(Bytes::from(bytes))
    }
}
