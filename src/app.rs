//! Application state machine.
//!
//! [`App`] is the single owner of all view state. Every change goes through
//! [`App::dispatch`] or the upload pair [`App::begin_upload`] /
//! [`App::complete_upload`], so the whole flow can be driven and tested
//! without a UI.

use log::{debug, error, info};
use std::sync::Arc;

use crate::error::{ChefError, ANALYSIS_ERROR, IMAGE_READ_ERROR};
use crate::filter::{filter_recipes, ActiveFilters};
use crate::model::{DietaryTag, Recipe};
use crate::shopping_list::ShoppingList;
use crate::speech::{
    ReadAloudController, ReadAloudLabels, ReadAloudState, SpeechEvent, SpeechSynthesizer,
};

/// Shown on the recipes tab when nothing passes the active filters
pub const NO_RECIPES_FOUND: &str = "No recipes match your filters.";

/// Why the last upload failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    ImageRead,
    Analysis,
}

impl Failure {
    pub fn message(&self) -> &'static str {
        match self {
            Failure::ImageRead => IMAGE_READ_ERROR,
            Failure::Analysis => ANALYSIS_ERROR,
        }
    }
}

impl From<&ChefError> for Failure {
    fn from(err: &ChefError) -> Self {
        match err {
            ChefError::ImageRead(_) => Failure::ImageRead,
            _ => Failure::Analysis,
        }
    }
}

/// Top-level view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    NoImage,
    Loading,
    Error(Failure),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Recipes,
    ShoppingList,
}

/// Identifies one upload. Results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct UploadTicket {
    generation: u64,
}

/// User and platform events the app reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Return to the upload screen
    Reset,
    /// Same as reset; offered from the error view
    Retry,
    /// Open the detail modal for the n-th visible recipe
    SelectRecipe(usize),
    CloseRecipe,
    SwitchTab(Tab),
    ToggleFilter(DietaryTag),
    AddToShoppingList(String),
    RemoveFromShoppingList(String),
    ClearShoppingList,
    ToggleReadAloud,
    Speech(SpeechEvent),
    /// The hosting page is going away
    Unload,
}

/// Detail view for one recipe, with its own read-aloud toggle
struct DetailModal {
    index: usize,
    reader: ReadAloudController,
}

pub struct App {
    view: ViewState,
    tab: Tab,
    recipes: Vec<Recipe>,
    filters: ActiveFilters,
    shopping_list: ShoppingList,
    modal: Option<DetailModal>,
    generation: u64,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    labels: ReadAloudLabels,
    locale: String,
}

impl App {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, locale: impl Into<String>) -> Self {
        Self {
            view: ViewState::NoImage,
            tab: Tab::Recipes,
            recipes: Vec::new(),
            filters: ActiveFilters::new(),
            shopping_list: ShoppingList::new(),
            modal: None,
            generation: 0,
            synthesizer,
            labels: ReadAloudLabels::default(),
            locale: locale.into(),
        }
    }

    pub fn with_labels(mut self, labels: ReadAloudLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn active_filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn shopping_list(&self) -> &ShoppingList {
        &self.shopping_list
    }

    /// Recipes passing the active dietary filters, in their original order
    pub fn visible_recipes(&self) -> Vec<&Recipe> {
        filter_recipes(&self.recipes, &self.filters)
    }

    /// Recipe shown in the detail modal, if it is open
    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.modal
            .as_ref()
            .and_then(|modal| self.recipes.get(modal.index))
    }

    pub fn read_aloud_state(&self) -> Option<ReadAloudState> {
        self.modal.as_ref().map(|modal| modal.reader.state())
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self.view {
            ViewState::Error(failure) => Some(failure.message()),
            _ => None,
        }
    }

    /// Uploads are accepted only on the upload screen
    pub fn is_upload_enabled(&self) -> bool {
        self.view == ViewState::NoImage
    }

    pub fn shows_empty_state(&self) -> bool {
        self.view == ViewState::Ready
            && self.tab == Tab::Recipes
            && self.visible_recipes().is_empty()
    }

    /// An image was selected. Only the upload screen accepts one; from
    /// `Ready` or `Error` the user has to reset first.
    pub fn begin_upload(&mut self) -> Option<UploadTicket> {
        if self.view != ViewState::NoImage {
            debug!("Ignoring upload in {:?}", self.view);
            return None;
        }

        self.generation += 1;
        self.recipes.clear();
        self.view = ViewState::Loading;
        Some(UploadTicket {
            generation: self.generation,
        })
    }

    /// Apply the outcome of an upload pipeline. Returns false if the ticket is stale.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<Vec<Recipe>, ChefError>,
    ) -> bool {
        if ticket.generation != self.generation || self.view != ViewState::Loading {
            debug!("Discarding result of superseded upload #{}", ticket.generation);
            return false;
        }

        match result {
            Ok(recipes) => {
                info!("Received {} recipe suggestions", recipes.len());
                self.recipes = recipes;
                self.tab = Tab::Recipes;
                self.view = ViewState::Ready;
            }
            Err(e) => {
                error!("{}", e);
                self.view = ViewState::Error(Failure::from(&e));
            }
        }
        true
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Reset | Action::Retry => self.reset(),
            Action::SelectRecipe(position) => self.open_recipe(position),
            Action::CloseRecipe => self.modal = None,
            Action::SwitchTab(tab) => {
                if self.view == ViewState::Ready {
                    self.tab = tab;
                }
            }
            Action::ToggleFilter(tag) => self.filters.toggle(tag),
            Action::AddToShoppingList(item) => {
                self.shopping_list.add(item);
            }
            Action::RemoveFromShoppingList(item) => {
                self.shopping_list.remove(&item);
            }
            Action::ClearShoppingList => self.shopping_list.clear(),
            Action::ToggleReadAloud => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.reader.toggle();
                }
            }
            Action::Speech(event) => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.reader.handle_event(event);
                }
            }
            Action::Unload => {
                self.modal = None;
                self.synthesizer.cancel();
            }
        }
    }

    /// Pull pending speech signals into the open modal
    pub fn refresh_speech(&mut self) {
        if let Some(modal) = self.modal.as_mut() {
            modal.reader.refresh();
        }
    }

    fn reset(&mut self) {
        // Invalidate any in-flight upload
        self.generation += 1;
        self.modal = None;
        self.recipes.clear();
        self.filters.clear();
        self.shopping_list.clear();
        self.tab = Tab::Recipes;
        self.view = ViewState::NoImage;
    }

    fn open_recipe(&mut self, position: usize) {
        if self.view != ViewState::Ready {
            return;
        }

        let filters = &self.filters;
        let Some((index, recipe)) = self
            .recipes
            .iter()
            .enumerate()
            .filter(|(_, recipe)| filters.matches(recipe))
            .nth(position)
        else {
            debug!("No visible recipe at position {}", position);
            return;
        };

        let reader = ReadAloudController::new(
            self.synthesizer.clone(),
            recipe,
            &self.labels,
            self.locale.clone(),
        );
        // Replacing an open modal drops its reader, which stops its speech
        self.modal = Some(DetailModal { index, reader });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use crate::speech::{SpeechError, Utterance};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingSynthesizer {
        speaking: Mutex<bool>,
    }

    impl SpeechSynthesizer for CountingSynthesizer {
        fn speak(&self, _utterance: &Utterance) -> Result<(), SpeechError> {
            *self.speaking.lock().unwrap() = true;
            Ok(())
        }

        fn cancel(&self) {
            *self.speaking.lock().unwrap() = false;
        }
    }

    fn recipe(name: &str, tags: &[DietaryTag]) -> Recipe {
        Recipe {
            recipe_name: name.to_string(),
            difficulty: Difficulty::Easy,
            prep_time: "5 minutes".to_string(),
            calories: 100,
            ingredients: vec!["onion".to_string()],
            instructions: vec!["Cook".to_string()],
            dietary_restrictions: tags.to_vec(),
        }
    }

    fn ready_app(synth: Arc<CountingSynthesizer>) -> App {
        let mut app = App::new(synth, "en-US");
        let ticket = app.begin_upload().unwrap();
        assert!(app.complete_upload(
            ticket,
            Ok(vec![
                recipe("Soup", &[DietaryTag::Vegan]),
                recipe("Steak", &[DietaryTag::Keto]),
            ])
        ));
        app
    }

    #[test]
    fn test_starts_on_upload_screen() {
        let app = App::new(Arc::new(CountingSynthesizer::default()), "en-US");
        assert_eq!(app.view(), ViewState::NoImage);
        assert_eq!(app.tab(), Tab::Recipes);
        assert!(app.recipes().is_empty());
        assert!(app.is_upload_enabled());
    }

    #[test]
    fn test_second_upload_while_loading_is_ignored() {
        let mut app = App::new(Arc::new(CountingSynthesizer::default()), "en-US");
        let _first = app.begin_upload().unwrap();
        assert!(!app.is_upload_enabled());
        assert!(app.begin_upload().is_none());
    }

    #[test]
    fn test_upload_only_from_upload_screen() {
        let mut app = ready_app(Arc::new(CountingSynthesizer::default()));
        assert!(!app.is_upload_enabled());
        assert!(app.begin_upload().is_none());
        assert_eq!(app.view(), ViewState::Ready);
        assert_eq!(app.recipes().len(), 2);

        app.dispatch(Action::Reset);
        let ticket = app.begin_upload().unwrap();
        app.complete_upload(ticket, Err(ChefError::Inference("down".to_string())));
        assert!(app.begin_upload().is_none());
        assert_eq!(app.view(), ViewState::Error(Failure::Analysis));

        app.dispatch(Action::Retry);
        assert!(app.begin_upload().is_some());
        assert_eq!(app.view(), ViewState::Loading);
    }

    #[test]
    fn test_stale_result_after_reset_is_dropped() {
        let mut app = App::new(Arc::new(CountingSynthesizer::default()), "en-US");
        let stale = app.begin_upload().unwrap();
        app.dispatch(Action::Reset);
        let fresh = app.begin_upload().unwrap();

        assert!(!app.complete_upload(stale, Ok(vec![recipe("Old", &[])])));
        assert_eq!(app.view(), ViewState::Loading);

        assert!(app.complete_upload(fresh, Ok(vec![])));
        assert_eq!(app.view(), ViewState::Ready);
        assert!(app.shows_empty_state());
    }

    #[test]
    fn test_image_read_failure_has_own_message() {
        let mut app = App::new(Arc::new(CountingSynthesizer::default()), "en-US");
        let ticket = app.begin_upload().unwrap();
        app.complete_upload(ticket, Err(ChefError::ImageRead("bad file".to_string())));
        assert_eq!(app.view(), ViewState::Error(Failure::ImageRead));
        assert_eq!(app.error_message(), Some(IMAGE_READ_ERROR));
    }

    #[test]
    fn test_select_uses_visible_position() {
        let mut app = ready_app(Arc::new(CountingSynthesizer::default()));
        app.dispatch(Action::ToggleFilter(DietaryTag::Keto));
        app.dispatch(Action::SelectRecipe(0));
        assert_eq!(app.selected_recipe().unwrap().recipe_name, "Steak");

        app.dispatch(Action::SelectRecipe(5));
        assert_eq!(app.selected_recipe().unwrap().recipe_name, "Steak");
    }

    #[test]
    fn test_selection_follows_visible_list() {
        let mut app = ready_app(Arc::new(CountingSynthesizer::default()));
        for tag in DietaryTag::ALL {
            app.dispatch(Action::ToggleFilter(tag));
            let visible: Vec<String> = app
                .visible_recipes()
                .iter()
                .map(|r| r.recipe_name.clone())
                .collect();
            for (position, name) in visible.iter().enumerate() {
                app.dispatch(Action::SelectRecipe(position));
                assert_eq!(&app.selected_recipe().unwrap().recipe_name, name);
            }
            app.dispatch(Action::CloseRecipe);
            app.dispatch(Action::ToggleFilter(tag));
        }
    }

    #[test]
    fn test_select_outside_ready_is_noop() {
        let mut app = App::new(Arc::new(CountingSynthesizer::default()), "en-US");
        app.dispatch(Action::SelectRecipe(0));
        assert!(app.selected_recipe().is_none());
    }

    #[test]
    fn test_tab_switch_only_when_ready() {
        let mut app = App::new(Arc::new(CountingSynthesizer::default()), "en-US");
        app.dispatch(Action::SwitchTab(Tab::ShoppingList));
        assert_eq!(app.tab(), Tab::Recipes);

        let mut app = ready_app(Arc::new(CountingSynthesizer::default()));
        app.dispatch(Action::SwitchTab(Tab::ShoppingList));
        assert_eq!(app.tab(), Tab::ShoppingList);
        assert_eq!(app.view(), ViewState::Ready);
        assert!(!app.shows_empty_state());
    }

    #[test]
    fn test_reset_clears_everything_and_stops_speech() {
        let synth = Arc::new(CountingSynthesizer::default());
        let mut app = ready_app(synth.clone());
        app.dispatch(Action::ToggleFilter(DietaryTag::Vegan));
        app.dispatch(Action::AddToShoppingList("onion".to_string()));
        app.dispatch(Action::SelectRecipe(0));
        app.dispatch(Action::ToggleReadAloud);
        assert!(*synth.speaking.lock().unwrap());

        app.dispatch(Action::Reset);
        assert_eq!(app.view(), ViewState::NoImage);
        assert!(app.recipes().is_empty());
        assert!(app.active_filters().is_empty());
        assert!(app.shopping_list().is_empty());
        assert!(app.selected_recipe().is_none());
        assert!(!*synth.speaking.lock().unwrap());
    }

    #[test]
    fn test_unload_stops_speech() {
        let synth = Arc::new(CountingSynthesizer::default());
        let mut app = ready_app(synth.clone());
        app.dispatch(Action::SelectRecipe(1));
        app.dispatch(Action::ToggleReadAloud);
        assert_eq!(app.read_aloud_state(), Some(ReadAloudState::Speaking));

        app.dispatch(Action::Unload);
        assert!(!*synth.speaking.lock().unwrap());
        assert_eq!(app.read_aloud_state(), None);
    }

    #[test]
    fn test_speech_end_event_reaches_modal() {
        let mut app = ready_app(Arc::new(CountingSynthesizer::default()));
        app.dispatch(Action::SelectRecipe(0));
        app.dispatch(Action::ToggleReadAloud);
        app.dispatch(Action::Speech(SpeechEvent::Ended));
        assert_eq!(app.read_aloud_state(), Some(ReadAloudState::Idle));
    }
}
