use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used when none is specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Read-aloud settings
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Configuration for a specific inference provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-2.5-flash", "gpt-4o-mini").
    /// Empty means the built-in default for the provider.
    #[serde(default)]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Settings for the read-aloud synthesizer
#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    /// BCP 47 locale passed to the synthesizer. Read once at startup and
    /// used for every utterance in the session.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Text-to-speech command used by the desktop synthesizer
    #[serde(default = "default_speech_command")]
    pub command: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            command: default_speech_command(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            timeout: default_timeout(),
            speech: SpeechConfig::default(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert("google".to_string(), ProviderConfig::google_default());
    providers
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_timeout() -> u64 {
    60
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

impl ProviderConfig {
    pub fn google_default() -> Self {
        Self {
            enabled: true,
            model: "gemini-2.5-flash".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }

    pub fn openai_default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            ..Self::google_default()
        }
    }

    /// Built-in settings for a provider that has no entry in the configuration
    pub fn default_for(provider_name: &str) -> Option<Self> {
        match provider_name {
            "google" => Some(Self::google_default()),
            "openai" => Some(Self::openai_default()),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FRIDGE_CHEF__ prefix
    /// 2. fridge-chef.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FRIDGE_CHEF__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Provider settings by name, falling back to the built-in defaults
    pub fn provider(&self, name: &str) -> Option<ProviderConfig> {
        let builtin = ProviderConfig::default_for(name);
        let Some(configured) = self.providers.get(name) else {
            return builtin;
        };

        let mut config = configured.clone();
        if config.model.trim().is_empty() {
            if let Some(builtin) = builtin {
                config.model = builtin.model;
            }
        }
        Some(config)
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("fridge-chef").required(false))
        // Use double underscore for nested: FRIDGE_CHEF__PROVIDERS__GOOGLE__API_KEY
        .add_source(
            Environment::with_prefix("FRIDGE_CHEF")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
