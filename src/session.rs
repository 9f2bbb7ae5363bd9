//! The per-trial session state machine.
//!
//! [`SessionState`] owns the participant identifier, the trial queue, the
//! accumulated choice history, and the timer clock. It is driven by two
//! inputs — discrete participant events from the presentation layer and
//! timer events from [`TrialClock`] — and responds with [`Effect`] requests
//! the presentation applies. No rendering concern lives here, which is what
//! lets the integration tests run the whole session headless.
//!
//! Lifecycle: `AwaitingParticipantId → AwaitingChoice → Processing →
//! ShowingFeedback → AwaitingChoice → … → Acknowledging → Finished`.
//! The 9th, 18th, and 30th consumed trials carry scripted outcomes
//! (success / failure / session-end acknowledgment) regardless of the
//! participant's rating; every other trial resolves to a generic "Done!".

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::clock::TrialClock;
use crate::error::TaskError;
use crate::results::{ResultSink, SessionRecord};
use crate::trial::{Difficulty, TrialQueue};

/// Processing-bar maximum; the animation stops when it is reached.
pub const PROGRESS_MAX: u16 = 100;

/// Interval between processing-bar animation ticks.
const PROGRESS_TICK: Duration = Duration::from_millis(300);

/// Scripted feedback trials resolve after a fixed 5 s, not the
/// difficulty-keyed delay.
const SCRIPTED_DELAY: Duration = Duration::from_millis(5000);

/// How long scripted success/failure text stays on screen.
const SCRIPTED_HOLD: Duration = Duration::from_millis(5000);

/// How long the generic "Done!" text stays on screen.
const GENERIC_HOLD: Duration = Duration::from_millis(3000);

/// How long the end-of-session acknowledgment stays up before the session
/// finishes on its own.
const ACK_HOLD: Duration = Duration::from_millis(5000);

// ---------------------------------------------------------------------------
// Outcomes and feedback
// ---------------------------------------------------------------------------

/// What a trial resolves to once its processing delay elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Ordinary trial: generic acknowledgment.
    Generic,
    /// Scripted: the robotic arm succeeded (9th trial).
    Succeeded,
    /// Scripted: the robotic arm failed (18th trial).
    Failed,
    /// Scripted: end-of-session acknowledgment (30th trial).
    SessionEnd,
}

impl Outcome {
    /// Outcome for the trial at zero-based position `index`.
    ///
    /// Positions are fixed by the study protocol: the 9th, 18th, and 30th
    /// consumed trials are scripted, independent of difficulty or rating.
    #[must_use]
    pub const fn for_trial(index: usize) -> Self {
        match index {
            8 => Self::Succeeded,
            17 => Self::Failed,
            29 => Self::SessionEnd,
            _ => Self::Generic,
        }
    }

    /// Feedback text shown to the participant. `SessionEnd` has no inline
    /// feedback text; it goes through the acknowledgment flow instead.
    #[must_use]
    pub const fn feedback_text(self) -> &'static str {
        match self {
            Self::Generic => "Done!",
            Self::Succeeded => "The robotic arm SUCCEEDED!",
            Self::Failed => "The robotic arm FAILED",
            Self::SessionEnd => "",
        }
    }

    #[must_use]
    pub const fn tone(self) -> FeedbackTone {
        match self {
            Self::Generic | Self::SessionEnd => FeedbackTone::Neutral,
            Self::Succeeded => FeedbackTone::Positive,
            Self::Failed => FeedbackTone::Negative,
        }
    }

    /// How long the feedback text stays on screen before the next trial.
    #[must_use]
    pub const fn hold_delay(self) -> Duration {
        match self {
            Self::Generic => GENERIC_HOLD,
            Self::Succeeded | Self::Failed => SCRIPTED_HOLD,
            Self::SessionEnd => ACK_HOLD,
        }
    }
}

/// Color register for feedback text; the theme maps tones to colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackTone {
    Neutral,
    Positive,
    Negative,
}

// ---------------------------------------------------------------------------
// Timer events and presentation effects
// ---------------------------------------------------------------------------

/// Payloads scheduled on the [`TrialClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// The processing delay elapsed; resolve the trial.
    ProcessingDone(Outcome),
    /// 300 ms animation tick for the processing bar.
    ProgressTick(Difficulty),
    /// Feedback text has been on screen long enough; advance.
    FeedbackElapsed,
    /// The acknowledgment hold elapsed; finish the session.
    AckElapsed,
}

/// Requests from the session core to the presentation layer.
///
/// The presentation applies these in order; it never inspects session
/// internals directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Show the trust prompt for the given difficulty.
    ShowPrompt(Difficulty),
    /// Enable or disable the six choice controls. `selected` highlights
    /// the rating that was just pressed.
    SetChoicesEnabled {
        enabled: bool,
        selected: Option<u8>,
    },
    /// Update the trials-remaining indicator. Emitted synchronously with
    /// each pop, never from a timer.
    UpdateRemaining { consumed: usize, total: usize },
    /// Show the "Checking results..." caption and an empty processing bar.
    ShowProcessing,
    /// Set the processing bar to `value` (out of [`PROGRESS_MAX`]).
    UpdateProcessing(u16),
    /// Hide the processing caption and bar.
    HideProcessing,
    /// Show feedback text with a tone.
    ShowFeedback {
        text: &'static str,
        tone: FeedbackTone,
    },
    /// Show the modal end-of-session acknowledgment.
    ShowAcknowledgment,
    /// Stop the event loop.
    Terminate,
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingParticipantId,
    AwaitingChoice,
    Processing,
    ShowingFeedback,
    Acknowledging,
    Finished,
}

impl Phase {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AwaitingParticipantId => "awaiting the participant identifier",
            Self::AwaitingChoice => "awaiting a trust rating",
            Self::Processing => "processing a rating",
            Self::ShowingFeedback => "showing feedback",
            Self::Acknowledging => "showing the end-of-session acknowledgment",
            Self::Finished => "finished",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The session core: one participant, one pass through the trial queue.
pub struct SessionState {
    phase: Phase,
    participant: String,
    queue: TrialQueue,
    choices: Vec<u8>,
    current: Option<Difficulty>,
    progress: u16,
    clock: TrialClock<TimerEvent>,
    sink: Box<dyn ResultSink>,
    saved: bool,
    save_error: Option<TaskError>,
}

impl SessionState {
    #[must_use]
    pub fn new(queue: TrialQueue, sink: Box<dyn ResultSink>) -> Self {
        Self {
            phase: Phase::AwaitingParticipantId,
            participant: String::new(),
            queue,
            choices: Vec::new(),
            current: None,
            progress: 0,
            clock: TrialClock::new(),
            sink,
            saved: false,
            save_error: None,
        }
    }

    // ------------------------------------------------------------------
    // Participant events
    // ------------------------------------------------------------------

    /// Record the participant identifier and advance to the first trial.
    ///
    /// Valid only in `AwaitingParticipantId`; the identifier is immutable
    /// once set.
    pub fn submit_participant_id(&mut self, id: &str) -> Result<Vec<Effect>, TaskError> {
        if self.phase != Phase::AwaitingParticipantId {
            return Err(TaskError::InvalidPhase {
                action: "submit_participant_id",
                phase: self.phase.name(),
            });
        }
        let id = id.trim();
        if id.is_empty() {
            return Err(TaskError::InvalidParticipantId {
                reason: "identifier is empty".to_owned(),
            });
        }

        self.participant = id.to_owned();
        info!(participant = %self.participant, trials = self.queue.total(), "session started");
        Ok(self.advance())
    }

    /// Record a trust rating for the current trial and start processing.
    ///
    /// Valid only in `AwaitingChoice`; `option` must be in `[0,5]`. Any
    /// rejection leaves the session unchanged.
    pub fn choose(&mut self, option: u8, now: Instant) -> Result<Vec<Effect>, TaskError> {
        if self.phase != Phase::AwaitingChoice {
            return Err(TaskError::InvalidPhase {
                action: "choose",
                phase: self.phase.name(),
            });
        }
        if option > 5 {
            return Err(TaskError::InvalidChoice { option });
        }
        let Some(difficulty) = self.current else {
            return Err(TaskError::InvalidPhase {
                action: "choose",
                phase: "between trials",
            });
        };

        // The scripted-feedback policy keys on the pre-increment count:
        // index 8 is the 9th consumed trial.
        let outcome = Outcome::for_trial(self.choices.len());
        self.choices.push(option);
        self.phase = Phase::Processing;

        debug!(
            trial = self.choices.len(),
            %difficulty,
            rating = option,
            ?outcome,
            "rating recorded"
        );

        let delay = match outcome {
            Outcome::Generic => difficulty.processing_delay(),
            _ => SCRIPTED_DELAY,
        };
        self.clock.schedule(now, delay, TimerEvent::ProcessingDone(outcome));

        // The bar animates on its own tick: first increment immediately,
        // then every 300 ms until full. It shares the difficulty parameter
        // with the processing delay but is otherwise independent of it.
        self.progress = difficulty.progress_step().min(PROGRESS_MAX);
        self.clock
            .schedule(now, PROGRESS_TICK, TimerEvent::ProgressTick(difficulty));

        Ok(vec![
            Effect::SetChoicesEnabled {
                enabled: false,
                selected: Some(option),
            },
            Effect::ShowProcessing,
            Effect::UpdateProcessing(self.progress),
        ])
    }

    /// Dismiss the end-of-session acknowledgment early. No-op outside
    /// `Acknowledging`.
    pub fn dismiss_acknowledgment(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Acknowledging {
            self.finish()
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------
    // Trial sequencing
    // ------------------------------------------------------------------

    /// Pop the next trial, or finish when the queue is exhausted.
    ///
    /// Queue exhaustion is the normal terminal signal. Calling this after
    /// `Finished` is an idempotent no-op: the record is never appended
    /// twice.
    pub fn advance(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Finished {
            return Vec::new();
        }

        match self.queue.pop_next() {
            Some(difficulty) => {
                self.current = Some(difficulty);
                self.phase = Phase::AwaitingChoice;
                debug!(trial = self.queue.consumed(), %difficulty, "trial presented");
                vec![
                    Effect::ShowPrompt(difficulty),
                    Effect::SetChoicesEnabled {
                        enabled: true,
                        selected: None,
                    },
                    Effect::UpdateRemaining {
                        consumed: self.queue.consumed(),
                        total: self.queue.total(),
                    },
                ]
            }
            None => self.finish(),
        }
    }

    /// Persist the record (once) and request termination.
    fn finish(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Finished {
            return Vec::new();
        }
        self.phase = Phase::Finished;

        if !self.saved {
            self.saved = true;
            let record = self.record();
            if let Err(err) = self.sink.append(&record) {
                // Fatal but not retried: the session still terminates and
                // the host surfaces the error after the loop stops.
                warn!(error = %err, "failed to persist session record");
                self.save_error = Some(err);
            }
        }

        info!(
            participant = %self.participant,
            choices = self.choices.len(),
            "session finished"
        );
        vec![Effect::Terminate]
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Drain every timer due at `now` and apply it, collecting the
    /// resulting presentation effects.
    pub fn poll(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        for event in self.clock.poll(now) {
            effects.extend(self.on_timer(event, now));
        }
        effects
    }

    /// Earliest outstanding timer deadline, for the event-loop timeout.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.clock.next_deadline()
    }

    /// Handle one fired timer. Timers are never cancelled, so an event may
    /// arrive after the phase it belonged to has passed; stale events are
    /// dropped without touching state.
    fn on_timer(&mut self, event: TimerEvent, now: Instant) -> Vec<Effect> {
        match event {
            TimerEvent::ProgressTick(difficulty) => {
                if self.phase != Phase::Processing {
                    return Vec::new();
                }
                self.progress =
                    (self.progress + difficulty.progress_step()).min(PROGRESS_MAX);
                if self.progress < PROGRESS_MAX {
                    self.clock
                        .schedule(now, PROGRESS_TICK, TimerEvent::ProgressTick(difficulty));
                    vec![Effect::UpdateProcessing(self.progress)]
                } else {
                    vec![Effect::HideProcessing]
                }
            }
            TimerEvent::ProcessingDone(outcome) => {
                if self.phase != Phase::Processing {
                    debug!(?event, phase = self.phase.name(), "stale timer dropped");
                    return Vec::new();
                }
                self.resolve_trial(outcome, now)
            }
            TimerEvent::FeedbackElapsed => {
                if self.phase != Phase::ShowingFeedback {
                    debug!(?event, phase = self.phase.name(), "stale timer dropped");
                    return Vec::new();
                }
                self.advance()
            }
            TimerEvent::AckElapsed => {
                if self.phase != Phase::Acknowledging {
                    return Vec::new();
                }
                self.finish()
            }
        }
    }

    fn resolve_trial(&mut self, outcome: Outcome, now: Instant) -> Vec<Effect> {
        if outcome == Outcome::SessionEnd {
            self.phase = Phase::Acknowledging;
            self.clock
                .schedule(now, outcome.hold_delay(), TimerEvent::AckElapsed);
            return vec![Effect::HideProcessing, Effect::ShowAcknowledgment];
        }

        self.phase = Phase::ShowingFeedback;
        self.clock
            .schedule(now, outcome.hold_delay(), TimerEvent::FeedbackElapsed);
        vec![
            Effect::HideProcessing,
            Effect::ShowFeedback {
                text: outcome.feedback_text(),
                tone: outcome.tone(),
            },
        ]
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn participant(&self) -> &str {
        &self.participant
    }

    #[must_use]
    pub fn choices(&self) -> &[u8] {
        &self.choices
    }

    #[must_use]
    pub const fn current_difficulty(&self) -> Option<Difficulty> {
        self.current
    }

    /// Snapshot of the record as it would be persisted.
    #[must_use]
    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            participant: self.participant.clone(),
            choices: self.choices.clone(),
        }
    }

    /// Take the store failure, if persisting the record failed.
    pub fn take_save_error(&mut self) -> Option<TaskError> {
        self.save_error.take()
    }
}
