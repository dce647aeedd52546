//! UniFFI bindings for fridge-chef
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::time::Duration;

use crate::{ChefError, DietaryTag, Difficulty, ProviderKind, Recipe};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiDifficulty {
    Easy,
    Medium,
    Hard,
}

impl From<Difficulty> for FfiDifficulty {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => FfiDifficulty::Easy,
            Difficulty::Medium => FfiDifficulty::Medium,
            Difficulty::Hard => FfiDifficulty::Hard,
        }
    }
}

impl From<FfiDifficulty> for Difficulty {
    fn from(difficulty: FfiDifficulty) -> Self {
        match difficulty {
            FfiDifficulty::Easy => Difficulty::Easy,
            FfiDifficulty::Medium => Difficulty::Medium,
            FfiDifficulty::Hard => Difficulty::Hard,
        }
    }
}

/// FFI-compatible recipe structure. Dietary tags are carried by id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub recipe_name: String,
    pub difficulty: FfiDifficulty,
    pub prep_time: String,
    pub calories: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub dietary_restrictions: Vec<String>,
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            recipe_name: recipe.recipe_name,
            difficulty: recipe.difficulty.into(),
            prep_time: recipe.prep_time,
            calories: recipe.calories,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            dietary_restrictions: recipe
                .dietary_restrictions
                .iter()
                .map(|tag| tag.id().to_string())
                .collect(),
        }
    }
}

/// FFI-compatible dietary filter catalog entry
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiDietaryFilter {
    pub id: String,
    pub label: String,
}

/// FFI-compatible provider enum
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiProvider {
    Google,
    OpenAI,
}

impl From<FfiProvider> for ProviderKind {
    fn from(provider: FfiProvider) -> Self {
        match provider {
            FfiProvider::Google => ProviderKind::Google,
            FfiProvider::OpenAI => ProviderKind::OpenAI,
        }
    }
}

/// FFI-compatible error type. `message` is the fixed text meant for the user.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiSuggestError {
    /// The image could not be read
    ImageRead { message: String },
    /// The model could not produce recipes
    Analysis { message: String },
    /// Unknown dietary tag passed to a filter
    InvalidInput { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiSuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiSuggestError::ImageRead { message } => write!(f, "Image error: {}", message),
            FfiSuggestError::Analysis { message } => write!(f, "Analysis error: {}", message),
            FfiSuggestError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiSuggestError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiSuggestError {}

impl From<ChefError> for FfiSuggestError {
    fn from(err: ChefError) -> Self {
        log::error!("{}", err);
        let message = err.user_message().to_string();
        match err {
            ChefError::ImageRead(_) => FfiSuggestError::ImageRead { message },
            _ => FfiSuggestError::Analysis { message },
        }
    }
}

/// Configuration for a suggestion call
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSuggestConfig {
    /// Optional provider (uses default if not specified)
    pub provider: Option<FfiProvider>,
    /// Optional API key (uses environment variable if not specified)
    pub api_key: Option<String>,
    /// Optional model name (uses provider default if not specified)
    pub model: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiSuggestError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiSuggestError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Suggest recipes for a fridge photo on disk
///
/// Blocks the calling thread until the model answers.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn suggest_recipes_from_path(
    path: String,
    config: Option<FfiSuggestConfig>,
) -> Result<Vec<FfiRecipe>, FfiSuggestError> {
    let rt = create_runtime()?;
    rt.block_on(async { suggest_recipes_async(path, config).await })
}

async fn suggest_recipes_async(
    path: String,
    config: Option<FfiSuggestConfig>,
) -> Result<Vec<FfiRecipe>, FfiSuggestError> {
    let config = config.unwrap_or_default();

    let mut builder = crate::RecipeSuggester::builder().image(path);

    if let Some(provider) = config.provider {
        builder = builder.provider(provider.into());
    }

    if let Some(api_key) = config.api_key {
        builder = builder.api_key(api_key);
    }

    if let Some(model) = config.model {
        builder = builder.model(model);
    }

    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    let recipes = builder.build().await?;
    Ok(recipes.into_iter().map(FfiRecipe::from).collect())
}

/// Keep the recipes carrying every given dietary tag id
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn filter_recipes(
    recipes: Vec<FfiRecipe>,
    tags: Vec<String>,
) -> Result<Vec<FfiRecipe>, FfiSuggestError> {
    let active: Vec<DietaryTag> = tags
        .iter()
        .map(|t| t.parse())
        .collect::<Result<_, String>>()
        .map_err(|message| FfiSuggestError::InvalidInput { message })?;

    Ok(recipes
        .into_iter()
        .filter(|recipe| {
            active
                .iter()
                .all(|tag| recipe.dietary_restrictions.iter().any(|id| id == tag.id()))
        })
        .collect())
}

/// The fixed dietary filter catalog
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn dietary_filters() -> Vec<FfiDietaryFilter> {
    crate::DIETARY_FILTERS
        .iter()
        .map(|f| FfiDietaryFilter {
            id: f.id.to_string(),
            label: f.label.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_recipe(name: &str, tags: &[&str]) -> FfiRecipe {
        FfiRecipe {
            recipe_name: name.to_string(),
            difficulty: FfiDifficulty::Easy,
            prep_time: "5 minutes".to_string(),
            calories: 100,
            ingredients: vec![],
            instructions: vec![],
            dietary_restrictions: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_filter_recipes_ands_tags() {
        let recipes = vec![
            ffi_recipe("A", &["Vegan", "Vegetarian"]),
            ffi_recipe("B", &["Vegetarian"]),
        ];
        let result = filter_recipes(
            recipes,
            vec!["vegetarian".to_string(), "Vegan".to_string()],
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].recipe_name, "A");
    }

    #[test]
    fn test_filter_recipes_rejects_unknown_tag() {
        let result = filter_recipes(vec![], vec!["Paleo".to_string()]);
        assert!(matches!(result, Err(FfiSuggestError::InvalidInput { .. })));
    }

    #[test]
    fn test_error_conversion_uses_fixed_messages() {
        let err: FfiSuggestError = ChefError::ImageRead("bad".to_string()).into();
        match err {
            FfiSuggestError::ImageRead { message } => {
                assert_eq!(message, crate::IMAGE_READ_ERROR)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_dietary_filters_catalog() {
        let filters = dietary_filters();
        assert_eq!(filters.len(), 4);
        assert_eq!(filters[2].id, "Gluten-Free");
    }
}
