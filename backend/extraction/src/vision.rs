//! Vision provider — send a card image to a vision LLM and demand a
//! JSON-shaped reply.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use tracing::info;

use cardforge_core::CardError;

use crate::parse::{ExtractedFields, parse_json_blob};

const SYSTEM_PROMPT: &str = "You extract business card details. Respond with JSON only and \
     include the keys: first_name, last_name, company, company_logo_description, email, \
     phone, address.";

const USER_PROMPT: &str = "Extract the contact details from this business card. Use empty \
     strings for missing values and keep phone numbers exactly as shown.";

/// Extracts contact fields from raw image bytes.
#[async_trait]
pub trait CardExtractor: Send + Sync {
    async fn extract(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<ExtractedFields, CardError>;
}

/// OpenAI chat-completions vision extractor.
pub struct OpenAiVision {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl OpenAiVision {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
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
impl CardExtractor for OpenAiVision {
    async fn extract(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<ExtractedFields, CardError> {
        let b64 = STANDARD.encode(image_bytes);
        let data_url = format!("data:{};base64,{}", mime_type, b64);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "text", "text": USER_PROMPT },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]}
            ],
            "temperature": 0,
            "response_format": { "type": "json_object" }
        });

        info!(model = %self.model, bytes = image_bytes.len(), "Extracting card via vision model");
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CardError::provider("openai-vision", e.to_string()))?;

        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CardError::provider("openai-vision", message));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CardError::provider("openai-vision", e.to_string()))?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("");

        parse_json_blob(content).map_err(|e| CardError::provider("openai-vision", e.to_string()))
    }
}
