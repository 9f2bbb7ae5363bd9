use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{prelude::CrosstermBackend, Terminal};

use super::event::{self, AppEvent};
use super::ui;
use crate::error::TaskError;
use crate::session::{Effect, FeedbackTone, Phase, SessionState};
use crate::trial::Difficulty;

/// Upper bound on the event-loop poll timeout; keeps the UI responsive
/// even with no timer outstanding.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

/// View state for the session UI.
///
/// The session core never touches the terminal; this struct mirrors its
/// [`Effect`] stream into plain fields that `ui::draw` renders each frame.
pub struct App {
    session: SessionState,
    pub instructions: String,
    /// Participant-id entry buffer (only before the session starts).
    pub input: String,
    /// Validation message under the id entry, cleared on the next key.
    pub input_error: Option<String>,
    pub prompt: Option<Difficulty>,
    pub choices_enabled: bool,
    pub selected_choice: Option<u8>,
    pub consumed: usize,
    pub total: usize,
    /// Processing bar value while the "Checking results..." pane is shown.
    pub processing: Option<u16>,
    pub feedback: Option<(&'static str, FeedbackTone)>,
    pub show_acknowledgment: bool,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(session: SessionState, instructions: String) -> Self {
        Self {
            session,
            instructions,
            input: String::new(),
            input_error: None,
            prompt: None,
            choices_enabled: false,
            selected_choice: None,
            consumed: 0,
            total: 0,
            processing: None,
            feedback: None,
            show_acknowledgment: false,
            should_quit: false,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // Sleep until the next timer deadline, capped at 100 ms.
            let now = Instant::now();
            let timeout = self
                .session
                .next_deadline()
                .map_or(POLL_TIMEOUT, |deadline| {
                    deadline.saturating_duration_since(now).min(POLL_TIMEOUT)
                });

            if let AppEvent::Key(key) = event::next_event(timeout)? {
                self.handle_key(key.code, key.modifiers);
            }

            let effects = self.session.poll(Instant::now());
            self.apply(effects);
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        // Abort keys work in every phase. An aborted session saves nothing.
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.session.phase() {
            Phase::AwaitingParticipantId => self.handle_id_entry_key(code),
            Phase::AwaitingChoice => match code {
                KeyCode::Char(c @ '1'..='6') => {
                    // Keys 1-6 map onto ratings 0-5.
                    #[allow(clippy::cast_possible_truncation)]
                    let option = (u32::from(c) - u32::from('1')) as u8;
                    match self.session.choose(option, Instant::now()) {
                        Ok(effects) => self.apply(effects),
                        // Buttons are shown as disabled; late keys are dropped.
                        Err(_) => {}
                    }
                }
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Phase::Acknowledging => {
                if matches!(code, KeyCode::Enter | KeyCode::Char(' ')) {
                    let effects = self.session.dismiss_acknowledgment();
                    self.apply(effects);
                }
            }
            Phase::Processing | Phase::ShowingFeedback | Phase::Finished => {
                if code == KeyCode::Esc {
                    self.should_quit = true;
                }
            }
        }
    }

    fn handle_id_entry_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.input_error = None;
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input_error = None;
                self.input.pop();
            }
            KeyCode::Enter => {
                let id = self.input.clone();
                match self.session.submit_participant_id(&id) {
                    Ok(effects) => self.apply(effects),
                    Err(err) => self.input_error = Some(err.to_string()),
                }
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    /// Mirror session effects into view state.
    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowPrompt(difficulty) => {
                    self.prompt = Some(difficulty);
                    self.feedback = None;
                }
                Effect::SetChoicesEnabled { enabled, selected } => {
                    self.choices_enabled = enabled;
                    self.selected_choice = selected;
                }
                Effect::UpdateRemaining { consumed, total } => {
                    self.consumed = consumed;
                    self.total = total;
                }
                Effect::ShowProcessing => self.processing = Some(0),
                Effect::UpdateProcessing(value) => self.processing = Some(value),
                Effect::HideProcessing => self.processing = None,
                Effect::ShowFeedback { text, tone } => {
                    self.processing = None;
                    self.feedback = Some((text, tone));
                }
                Effect::ShowAcknowledgment => {
                    self.processing = None;
                    self.feedback = None;
                    self.show_acknowledgment = true;
                }
                Effect::Terminate => self.should_quit = true,
            }
        }
    }

    /// Store failure recorded at session end, surfaced after the terminal
    /// is restored.
    pub fn take_save_error(&mut self) -> Option<TaskError> {
        self.session.take_save_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ResultSink, SessionRecord};
    use crate::trial::TrialQueue;

    struct NullSink;

    impl ResultSink for NullSink {
        fn append(&mut self, _record: &SessionRecord) -> Result<(), TaskError> {
            Ok(())
        }
    }

    fn app() -> App {
        let session = SessionState::new(TrialQueue::standard(), Box::new(NullSink));
        App::new(session, "instructions".to_owned())
    }

    #[test]
    fn id_entry_collects_keys_and_submits_on_enter() {
        let mut app = app();
        for c in ['P', '0', '0', '1'] {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert_eq!(app.input, "P001");

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.phase(), Phase::AwaitingChoice);
        assert_eq!(app.prompt, Some(Difficulty::Easy));
        assert!(app.choices_enabled);
        assert_eq!((app.consumed, app.total), (1, 30));
    }

    #[test]
    fn empty_id_shows_error_and_stays_put() {
        let mut app = app();
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.phase(), Phase::AwaitingParticipantId);
        assert!(app.input_error.is_some());

        // Next keystroke clears the error.
        app.handle_key(KeyCode::Char('P'), KeyModifiers::NONE);
        assert!(app.input_error.is_none());
    }

    #[test]
    fn rating_keys_map_one_through_six_onto_zero_through_five() {
        let mut app = app();
        for c in ['P', '1'] {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        app.handle_key(KeyCode::Char('4'), KeyModifiers::NONE);
        assert_eq!(app.selected_choice, Some(3));
        assert!(!app.choices_enabled);
        assert!(app.processing.is_some());
        assert_eq!(app.phase(), Phase::Processing);

        // Further rating keys are dropped while processing.
        app.handle_key(KeyCode::Char('6'), KeyModifiers::NONE);
        assert_eq!(app.selected_choice, Some(3));
    }
}
