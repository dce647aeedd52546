use log::{info, warn};

use crate::app::App;
use crate::error::ChefError;
use crate::image::{self, ImageSource};
use crate::model::Recipe;
use crate::providers::RecipeProvider;

/// Read the photo, then ask the provider for recipes
pub async fn analyze(
    provider: &dyn RecipeProvider,
    source: &ImageSource,
) -> Result<Vec<Recipe>, ChefError> {
    let image = image::read(source).await?;
    info!(
        "Analyzing {} image ({} bytes) with {}",
        image.mime_type,
        image.bytes.len(),
        provider.provider_name()
    );
    provider.suggest_recipes(&image).await
}

/// Drive one upload through the app: `NoImage -> Loading -> Ready | Error`.
///
/// Returns false if the upload was refused or its result was superseded.
pub async fn run_upload(
    app: &mut App,
    provider: &dyn RecipeProvider,
    source: &ImageSource,
) -> bool {
    run_upload_with_progress(app, provider, source, |_| {}).await
}

/// Like [`run_upload`], calling `on_loading` once the app is in `Loading`
/// and before the provider is awaited, so a front end can show its
/// loading indicator for the whole call.
pub async fn run_upload_with_progress<F>(
    app: &mut App,
    provider: &dyn RecipeProvider,
    source: &ImageSource,
    on_loading: F,
) -> bool
where
    F: FnOnce(&App),
{
    let Some(ticket) = app.begin_upload() else {
        warn!("Upload refused outside the upload screen");
        return false;
    };
    on_loading(&*app);

    let result = analyze(provider, source).await;
    app.complete_upload(ticket, result)
}
