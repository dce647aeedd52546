//! Read-aloud support.
//!
//! The platform speech service is an external collaborator behind
//! [`SpeechSynthesizer`]. [`ReadAloudController`] turns it into a start/stop
//! toggle bound to one recipe, and cancels synthesis when it is dropped.

mod command;

pub use command::CommandSynthesizer;

use log::{debug, error};
use std::sync::Arc;
use thiserror::Error;

use crate::model::Recipe;

/// Text plus the locale it should be spoken in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
}

/// Signals emitted by the platform while speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    Started,
    Ended,
    Error,
}

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Failed to start speech synthesis: {0}")]
    Start(String),
}

/// Platform text-to-speech capability.
///
/// Methods take `&self`: the platform service is a process-wide singleton and
/// implementations keep their own interior state.
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking, replacing anything currently being spoken
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stop any in-progress speech. Must be safe to call when idle.
    fn cancel(&self);

    /// Next pending start/end/error signal, if any
    fn poll_event(&self) -> Option<SpeechEvent> {
        None
    }
}

/// Section headings spoken between the parts of a recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAloudLabels {
    pub ingredients: String,
    pub instructions: String,
}

impl Default for ReadAloudLabels {
    fn default() -> Self {
        Self {
            ingredients: "Ingredients".to_string(),
            instructions: "Instructions".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadAloudState {
    #[default]
    Idle,
    Speaking,
}

/// Start/stop toggle for reading one recipe aloud
pub struct ReadAloudController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    utterance: Utterance,
    state: ReadAloudState,
}

impl ReadAloudController {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        recipe: &Recipe,
        labels: &ReadAloudLabels,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            synthesizer,
            utterance: Utterance {
                text: recipe.read_aloud_text(&labels.ingredients, &labels.instructions),
                locale: locale.into(),
            },
            state: ReadAloudState::Idle,
        }
    }

    pub fn state(&self) -> ReadAloudState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == ReadAloudState::Speaking
    }

    pub fn utterance(&self) -> &Utterance {
        &self.utterance
    }

    /// Start reading when idle, stop when speaking. Returns the new state.
    pub fn toggle(&mut self) -> ReadAloudState {
        match self.state {
            ReadAloudState::Speaking => self.stop(),
            ReadAloudState::Idle => match self.synthesizer.speak(&self.utterance) {
                Ok(()) => {
                    debug!("Reading recipe aloud ({})", self.utterance.locale);
                    self.state = ReadAloudState::Speaking;
                }
                Err(e) => error!("{}", e),
            },
        }
        self.state
    }

    /// Cancel synthesis and return to idle
    pub fn stop(&mut self) {
        self.synthesizer.cancel();
        self.state = ReadAloudState::Idle;
    }

    /// Apply a platform signal. Natural completion and errors end speaking.
    pub fn handle_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Started => {}
            SpeechEvent::Ended => self.state = ReadAloudState::Idle,
            SpeechEvent::Error => {
                error!("Speech synthesis reported an error");
                self.state = ReadAloudState::Idle;
            }
        }
    }

    /// Drain pending platform signals
    pub fn refresh(&mut self) -> ReadAloudState {
        while let Some(event) = self.synthesizer.poll_event() {
            self.handle_event(event);
        }
        self.state
    }
}

impl Drop for ReadAloudController {
    // Closing the hosting view must never leave audio playing
    fn drop(&mut self) {
        self.synthesizer.cancel();
    }
}
