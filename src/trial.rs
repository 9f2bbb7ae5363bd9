//! Trial difficulties and the fixed trial queue.
//!
//! A session consumes exactly 30 trials: the block (EASY, MEDIUM, HARD)
//! repeated 10 times, in order, never shuffled and never re-inserted.
//! [`Difficulty`] carries every difficulty-keyed constant as an exhaustive
//! match so a new variant cannot silently fall through to a default.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// How many trials a standard session presents.
pub const TRIALS_PER_SESSION: usize = 30;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Obstacle-course difficulty for a single trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Display label shown in the trust prompt.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    /// Simulated "checking results" delay before a generic acknowledgment.
    #[must_use]
    pub const fn processing_delay(self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(3000),
            Self::Medium => Duration::from_millis(4000),
            Self::Hard => Duration::from_millis(5000),
        }
    }

    /// Progress-bar increment applied every animation tick while processing.
    ///
    /// The animation runs on its own 300 ms tick and is deliberately not
    /// synchronized with [`Self::processing_delay`]; harder courses fill
    /// the bar more slowly.
    #[must_use]
    pub const fn progress_step(self) -> u16 {
        match self {
            Self::Easy => 10,
            Self::Medium => 8,
            Self::Hard => 6,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// TrialQueue
// ---------------------------------------------------------------------------

/// Ordered queue of upcoming trial difficulties.
///
/// The queue only shrinks: trials are popped from the front and never
/// re-inserted. An exhausted queue is the normal end-of-session signal,
/// not an error.
#[derive(Clone, Debug)]
pub struct TrialQueue {
    trials: VecDeque<Difficulty>,
    total: usize,
}

impl TrialQueue {
    /// Build a queue from an explicit trial order (used by tests and
    /// shortened pilot sessions).
    pub fn new(trials: impl IntoIterator<Item = Difficulty>) -> Self {
        let trials: VecDeque<Difficulty> = trials.into_iter().collect();
        let total = trials.len();
        Self { trials, total }
    }

    /// The standard session: (EASY, MEDIUM, HARD) repeated 10 times.
    #[must_use]
    pub fn standard() -> Self {
        let block = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
        Self::new(block.iter().copied().cycle().take(TRIALS_PER_SESSION))
    }

    /// Remove and return the next trial, or `None` when the session is over.
    pub fn pop_next(&mut self) -> Option<Difficulty> {
        self.trials.pop_front()
    }

    /// Count of unconsumed trials.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.trials.len()
    }

    /// Number of trials the queue was constructed with.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Trials consumed so far, for the progress indicator.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.total - self.trials.len()
    }
}

impl Default for TrialQueue {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_queue_holds_thirty_trials_in_grouped_order() {
        let mut queue = TrialQueue::standard();
        assert_eq!(queue.total(), TRIALS_PER_SESSION);

        let mut popped = Vec::new();
        while let Some(t) = queue.pop_next() {
            popped.push(t);
        }
        assert_eq!(popped.len(), TRIALS_PER_SESSION);

        for chunk in popped.chunks(3) {
            assert_eq!(
                chunk,
                [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            );
        }

        let easy = popped.iter().filter(|d| **d == Difficulty::Easy).count();
        let medium = popped.iter().filter(|d| **d == Difficulty::Medium).count();
        let hard = popped.iter().filter(|d| **d == Difficulty::Hard).count();
        assert_eq!((easy, medium, hard), (10, 10, 10));
    }

    #[test]
    fn pop_past_end_stays_empty() {
        let mut queue = TrialQueue::new([Difficulty::Hard]);
        assert_eq!(queue.pop_next(), Some(Difficulty::Hard));
        assert_eq!(queue.pop_next(), None);
        assert_eq!(queue.pop_next(), None);
        assert_eq!(queue.remaining(), 0);
        assert_eq!(queue.consumed(), 1);
    }

    #[test]
    fn consumed_tracks_pops() {
        let mut queue = TrialQueue::standard();
        assert_eq!(queue.consumed(), 0);
        queue.pop_next();
        queue.pop_next();
        assert_eq!(queue.consumed(), 2);
        assert_eq!(queue.remaining(), 28);
    }

    #[test]
    fn difficulty_mappings_match_protocol() {
        assert_eq!(Difficulty::Easy.processing_delay(), Duration::from_secs(3));
        assert_eq!(Difficulty::Medium.processing_delay(), Duration::from_secs(4));
        assert_eq!(Difficulty::Hard.processing_delay(), Duration::from_secs(5));
        assert_eq!(Difficulty::Easy.progress_step(), 10);
        assert_eq!(Difficulty::Medium.progress_step(), 8);
        assert_eq!(Difficulty::Hard.progress_step(), 6);
    }
}
