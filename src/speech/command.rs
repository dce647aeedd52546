use log::{debug, warn};
use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use tokio::process::{Child, Command};

use super::{SpeechError, SpeechEvent, SpeechSynthesizer, Utterance};

/// Speaks through an external TTS program such as `espeak-ng`.
///
/// The program is invoked as `<program> -v <voice> <text>`, where the voice is
/// the lowercased locale. Must be used from within a tokio runtime.
pub struct CommandSynthesizer {
    program: String,
    child: Mutex<Option<Child>>,
    events: Mutex<VecDeque<SpeechEvent>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: Mutex::new(None),
            events: Mutex::new(VecDeque::new()),
        }
    }

    fn kill_current(&self) {
        if let Some(mut child) = lock(&self.child).take() {
            if let Err(e) = child.start_kill() {
                debug!("Speech process already gone: {}", e);
            }
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.kill_current();

        let voice = utterance.locale.to_lowercase();
        let child = Command::new(&self.program)
            .arg("-v")
            .arg(&voice)
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Start(format!("{}: {}", self.program, e)))?;

        *lock(&self.child) = Some(child);
        lock(&self.events).push_back(SpeechEvent::Started);
        Ok(())
    }

    fn cancel(&self) {
        self.kill_current();
        lock(&self.events).clear();
    }

    fn poll_event(&self) -> Option<SpeechEvent> {
        if let Some(event) = lock(&self.events).pop_front() {
            return Some(event);
        }

        let mut slot = lock(&self.child);
        let child = slot.as_mut()?;
        match child.try_wait() {
            Ok(None) => None,
            Ok(Some(status)) => {
                *slot = None;
                if status.success() {
                    Some(SpeechEvent::Ended)
                } else {
                    warn!("{} exited with {}", self.program, status);
                    Some(SpeechEvent::Error)
                }
            }
            Err(e) => {
                warn!("Failed to poll speech process: {}", e);
                *slot = None;
                Some(SpeechEvent::Error)
            }
        }
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.kill_current();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn utterance() -> Utterance {
        Utterance {
            text: "hello".to_string(),
            locale: "en-US".to_string(),
        }
    }

    async fn wait_for_exit(synth: &CommandSynthesizer) -> Option<SpeechEvent> {
        for _ in 0..100 {
            match synth.poll_event() {
                Some(SpeechEvent::Started) | None => {
                    tokio::time::sleep(Duration::from_millis(20)).await
                }
                other => return other,
            }
        }
        None
    }

    #[tokio::test]
    async fn test_natural_exit_reports_ended() {
        let synth = CommandSynthesizer::new("true");
        synth.speak(&utterance()).unwrap();
        assert_eq!(synth.poll_event(), Some(SpeechEvent::Started));
        assert_eq!(wait_for_exit(&synth).await, Some(SpeechEvent::Ended));
    }

    #[tokio::test]
    async fn test_failing_program_reports_error() {
        let synth = CommandSynthesizer::new("false");
        synth.speak(&utterance()).unwrap();
        assert_eq!(wait_for_exit(&synth).await, Some(SpeechEvent::Error));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_start() {
        let synth = CommandSynthesizer::new("definitely-not-a-tts-binary");
        assert!(synth.speak(&utterance()).is_err());
        assert_eq!(synth.poll_event(), None);
    }

    #[tokio::test]
    async fn test_cancel_clears_pending_signals() {
        let synth = CommandSynthesizer::new("true");
        synth.speak(&utterance()).unwrap();
        synth.cancel();
        assert_eq!(synth.poll_event(), None);
    }
}
