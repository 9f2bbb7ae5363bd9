//! Shared helpers for trustcourse integration tests.
//!
//! All tests write to temp directories — no side effects on a real
//! results store. Sessions are driven headless through the library; no
//! terminal is involved.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use trustcourse::results::CsvSink;
use trustcourse::session::{Effect, SessionState};
use trustcourse::trial::TrialQueue;

/// A results store in its own temp directory.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("data.csv")
    }

    pub fn sink(&self) -> CsvSink {
        CsvSink::new(self.path())
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(self.path()).expect("results store should exist")
    }
}

/// Drive one trial to completion: submit the rating, then poll in 300 ms
/// steps until processing and feedback have elapsed. Returns every effect
/// emitted along the way.
pub fn run_one_trial(session: &mut SessionState, now: &mut Instant, rating: u8) -> Vec<Effect> {
    let mut effects = session
        .choose(rating, *now)
        .expect("rating should be accepted");
    // 12 s covers the longest processing delay plus the longest hold.
    for _ in 0..40 {
        *now += Duration::from_millis(300);
        effects.extend(session.poll(*now));
    }
    effects
}

/// Run a complete standard session (30 trials, same rating throughout)
/// against the given sink. Returns all effects in emission order.
pub fn run_full_session(sink: CsvSink, participant: &str, rating: u8) -> Vec<Effect> {
    let mut session = SessionState::new(TrialQueue::standard(), Box::new(sink));
    let mut effects = session
        .submit_participant_id(participant)
        .expect("id should be accepted");

    let mut now = Instant::now();
    for _ in 0..30 {
        effects.extend(run_one_trial(&mut session, &mut now, rating));
    }
    effects
}
