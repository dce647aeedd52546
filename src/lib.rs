pub mod app;
pub mod builder;
pub mod config;
pub mod error;
pub mod filter;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod shopping_list;
pub mod speech;

pub mod uniffi_bindings;

pub use app::{Action, App, Failure, Tab, UploadTicket, ViewState, NO_RECIPES_FOUND};
pub use builder::{ProviderKind, RecipeSuggester, RecipeSuggesterBuilder};
pub use config::{AppConfig, ProviderConfig, SpeechConfig};
pub use error::{ChefError, ANALYSIS_ERROR, IMAGE_READ_ERROR};
pub use filter::{filter_recipes, ActiveFilters};
pub use image::{ImageData, ImageSource};
pub use model::{DietaryFilter, DietaryTag, Difficulty, Recipe, DIETARY_FILTERS};
pub use providers::{ProviderFactory, RecipeProvider};
pub use shopping_list::ShoppingList;
pub use speech::{
    CommandSynthesizer, ReadAloudController, ReadAloudLabels, ReadAloudState, SpeechEvent,
    SpeechSynthesizer, Utterance,
};

use std::path::Path;

/// Suggest recipes for a fridge photo on disk using the configured provider
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = fridge_chef::suggest_recipes_from_file("fridge.jpg").await?;
/// for recipe in &recipes {
///     println!("{} ({})", recipe.recipe_name, recipe.difficulty);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn suggest_recipes_from_file(path: impl AsRef<Path>) -> Result<Vec<Recipe>, ChefError> {
    RecipeSuggester::builder()
        .image(path.as_ref())
        .build()
        .await
}

/// Suggest recipes for raw image bytes using the configured provider
pub async fn suggest_recipes(
    image_bytes: Vec<u8>,
    mime_type: impl Into<String>,
) -> Result<Vec<Recipe>, ChefError> {
    RecipeSuggester::builder()
        .image_bytes(image_bytes, Some(mime_type.into()))
        .build()
        .await
}
