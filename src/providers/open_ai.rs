use crate::config::ProviderConfig;
use crate::error::ChefError;
use crate::image::ImageData;
use crate::model::Recipe;
use crate::providers::{build_client, prompt, RecipeProvider};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Strict structured outputs need an object root
#[derive(Debug, Deserialize)]
struct RecipeEnvelope {
    recipes: Vec<Recipe>,
}

pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ChefError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            warn!("OPENAI_API_KEY not set. OpenAI API calls will fail.");
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: build_client(timeout)?,
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
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
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt::RECIPE_PROMPT },
                    { "type": "image_url", "image_url": { "url": image.to_data_url() } }
                ]
            }],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "recipes",
                    "strict": true,
                    "schema": prompt::openai_response_schema()
                }
            },
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        })
    }
}

#[async_trait]
impl RecipeProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn suggest_recipes(&self, image: &ImageData) -> Result<Vec<Recipe>, ChefError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ChefError::Inference("OPENAI_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.request_body(image))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChefError::Inference(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ChefError::Inference("Failed to extract content from response".to_string())
            })?;

        let envelope: RecipeEnvelope = serde_json::from_str(content.trim())?;
        Ok(envelope.recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn openai_reply(content: &str) -> String {
        json!({
            "choices": [{ "message": { "content": content } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_suggest_recipes_unwraps_envelope() {
        let mut server = Server::new_async().await;
        let content = json!({
            "recipes": [{
                "recipeName": "Greek Salad",
                "difficulty": "Easy",
                "prepTime": "10 minutes",
                "calories": 250,
                "ingredients": ["cucumber", "feta"],
                "instructions": ["Chop", "Toss"],
                "dietaryRestrictions": ["Vegetarian", "Keto"]
            }]
        })
        .to_string();

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(openai_reply(&content))
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );
        let image = ImageData::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg");

        let recipes = provider.suggest_recipes(&image).await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].recipe_name, "Greek Salad");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bare_array_is_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(openai_reply("[]"))
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );
        let image = ImageData::new(vec![1], "image/png");

        let result = provider.suggest_recipes(&image).await;
        assert!(matches!(result, Err(ChefError::Inference(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "quota exceeded"}"#)
            .create_async()
            .await;

        let provider = OpenAIProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4o-mini".to_string(),
        );
        let image = ImageData::new(vec![1], "image/png");

        let err = provider.suggest_recipes(&image).await.unwrap_err();
        assert!(err.to_string().contains("429"));
        mock.assert_async().await;
    }

    #[test]
    fn test_request_uses_data_url() {
        let provider = OpenAIProvider::with_base_url(
            "k".to_string(),
            "http://localhost".to_string(),
            "gpt-4o-mini".to_string(),
        );
        let body = provider.request_body(&ImageData::new(vec![1, 2], "image/png"));
        let url = body["messages"][0]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }
}
