use crate::config::ProviderConfig;
use crate::error::ChefError;
use crate::image::ImageData;
use crate::model::Recipe;
use crate::providers::{build_client, parse_recipes, prompt, RecipeProvider};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    ///
    /// A missing key is not fatal here: it is logged, and every call fails.
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ChefError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            warn!("GEMINI_API_KEY not set. Gemini API calls will fail.");
        }

        Ok(GoogleProvider {
            client: build_client(timeout)?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key: Some(api_key),
            base_url,
            model,
            temperature: 0.4,
            max_tokens: 8192,
        }
    }

    fn request_body(&self, image: &ImageData) -> Value {
        json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.to_base64()
                        }
                    },
                    { "text": prompt::RECIPE_PROMPT }
                ]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_tokens,
                "responseMimeType": "application/json",
                "responseSchema": prompt::gemini_response_schema()
            }
        })
    }
}

#[async_trait]
impl RecipeProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn suggest_recipes(&self, image: &ImageData) -> Result<Vec<Recipe>, ChefError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ChefError::Inference("GEMINI_API_KEY is not set".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(image))
            .send()
            .await?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChefError::Inference(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ChefError::Inference(
                    "Failed to extract content from Google Gemini response".to_string(),
                )
            })?;

        parse_recipes(text)
    }
}
