mod factory;
mod google;
mod open_ai;
pub mod prompt;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::RECIPE_PROMPT;

use crate::error::ChefError;
use crate::image::ImageData;
use crate::model::Recipe;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Unified trait for all multimodal inference providers
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Send one photo and return the recipes the model proposes.
    ///
    /// Exactly one request per call; no retry, no partial result.
    async fn suggest_recipes(&self, image: &ImageData) -> Result<Vec<Recipe>, ChefError>;
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, ChefError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ChefError::Inference(format!("Failed to build HTTP client: {}", e)))
}

/// Parse the model's structured output. Any schema violation rejects the
/// whole payload.
pub(crate) fn parse_recipes(text: &str) -> Result<Vec<Recipe>, ChefError> {
    Ok(serde_json::from_str(text.trim())?)
}
