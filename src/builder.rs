use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::ChefError;
use crate::image::ImageSource;
use crate::model::Recipe;
use crate::pipeline;
use crate::providers::ProviderFactory;

/// Optional inference provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    OpenAI,
}

impl ProviderKind {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAI => "openai",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ChefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(ProviderKind::Google),
            "openai" => Ok(ProviderKind::OpenAI),
            other => Err(ChefError::UnknownProvider(other.to_string())),
        }
    }
}

/// Builder for configuring and executing a recipe suggestion
#[derive(Debug, Default)]
pub struct RecipeSuggesterBuilder {
    source: Option<ImageSource>,
    provider: Option<ProviderKind>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl RecipeSuggesterBuilder {
    /// Set the input source to an image file
    ///
    /// # Example
    /// ```
    /// use fridge_chef::RecipeSuggester;
    ///
    /// let builder = RecipeSuggester::builder()
    ///     .image("/path/to/fridge.jpg");
    /// ```
    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(ImageSource::Path(path.into()));
        self
    }

    /// Set the input source to raw image bytes
    ///
    /// The MIME type is sniffed from the bytes when not given.
    pub fn image_bytes(mut self, data: Vec<u8>, mime_type: Option<String>) -> Self {
        self.source = Some(ImageSource::Bytes { data, mime_type });
        self
    }

    /// Set any image source
    pub fn source(mut self, source: ImageSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the inference provider
    ///
    /// # Example
    /// ```
    /// use fridge_chef::{ProviderKind, RecipeSuggester};
    ///
    /// let builder = RecipeSuggester::builder()
    ///     .image("/path/to/fridge.jpg")
    ///     .provider(ProviderKind::OpenAI);
    /// ```
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set a timeout for the inference request
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the API key for the provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Point the provider at a custom or proxy endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build and execute the suggestion
    ///
    /// # Errors
    /// Returns `ChefError` if:
    /// - No image source was specified
    /// - The image cannot be read
    /// - The provider is unknown or disabled
    /// - The inference call fails or its response does not match the schema
    ///
    /// # Example
    /// ```no_run
    /// # use fridge_chef::RecipeSuggester;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipes = RecipeSuggester::builder()
    ///     .image("fridge.jpg")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Vec<Recipe>, ChefError> {
        let source = self.source.ok_or_else(|| {
            ChefError::Builder(
                "No image source specified. Use .image() or .image_bytes()".to_string(),
            )
        })?;

        let config = AppConfig::load()?;
        let provider_name = self
            .provider
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| config.default_provider.clone());

        let mut provider_config = config
            .provider(&provider_name)
            .ok_or_else(|| ChefError::UnknownProvider(provider_name.clone()))?;

        if let Some(api_key) = self.api_key {
            provider_config.api_key = Some(api_key);
        }
        if let Some(model) = self.model {
            provider_config.model = model;
        }
        if let Some(base_url) = self.base_url {
            provider_config.base_url = Some(base_url);
        }

        let timeout = self
            .timeout
            .unwrap_or_else(|| Duration::from_secs(config.timeout));
        let provider = ProviderFactory::create(&provider_name, &provider_config, timeout)?;

        pipeline::analyze(provider.as_ref(), &source).await
    }
}

/// Main entry point for the builder API
pub struct RecipeSuggester;

impl RecipeSuggester {
    /// Creates a new builder for suggesting recipes
    ///
    /// # Example
    /// ```
    /// use fridge_chef::RecipeSuggester;
    ///
    /// let builder = RecipeSuggester::builder();
    /// ```
    pub fn builder() -> RecipeSuggesterBuilder {
        RecipeSuggesterBuilder::default()
    }
}
