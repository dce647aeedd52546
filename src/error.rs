use thiserror::Error;

/// Shown when the selected photo could not be turned into transmittable bytes.
pub const IMAGE_READ_ERROR: &str = "The image could not be processed.";

/// Shown for every failure while asking the model for recipes.
pub const ANALYSIS_ERROR: &str =
    "Something went wrong while fetching recipes. Please try a clearer photo.";

/// Errors that can occur while turning a fridge photo into recipes
#[derive(Error, Debug)]
pub enum ChefError {
    /// The selected image could not be read or decoded
    #[error("Failed to read image: {0}")]
    ImageRead(String),

    /// The inference call failed (network, status, credential or schema)
    #[error("Could not retrieve recipes: {0}")]
    Inference(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Provider name is not one we know how to construct
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ChefError {
    /// Fixed text for the error view. The underlying cause is logged, never shown.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChefError::ImageRead(_) => IMAGE_READ_ERROR,
            _ => ANALYSIS_ERROR,
        }
    }
}

impl From<reqwest::Error> for ChefError {
    fn from(err: reqwest::Error) -> Self {
        ChefError::Inference(err.to_string())
    }
}

impl From<serde_json::Error> for ChefError {
    fn from(err: serde_json::Error) -> Self {
        ChefError::Inference(format!("response did not match recipe schema: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_distinguishes_image_errors() {
        let err = ChefError::ImageRead("empty file".to_string());
        assert_eq!(err.user_message(), IMAGE_READ_ERROR);

        let err = ChefError::Inference("HTTP 503".to_string());
        assert_eq!(err.user_message(), ANALYSIS_ERROR);
        assert_eq!(
            ChefError::Builder("no source".to_string()).user_message(),
            ANALYSIS_ERROR
        );
    }

    #[test]
    fn test_schema_errors_become_inference_errors() {
        let parse = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: ChefError = parse.into();
        assert!(matches!(err, ChefError::Inference(_)));
        assert!(err.to_string().contains("recipe schema"));
    }
}
