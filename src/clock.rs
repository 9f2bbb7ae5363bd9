//! Cooperative one-shot timer scheduler.
//!
//! The session runs on a single thread: the TUI event loop alternates
//! between crossterm input and draining this clock. Entries are one-shot
//! and never cancelled; handlers that outlive their phase are expected to
//! drop stale events themselves.

use std::time::{Duration, Instant};

/// A pending one-shot entry.
#[derive(Debug)]
struct Entry<E> {
    deadline: Instant,
    /// Insertion order, the tie-break for equal deadlines.
    seq: u64,
    event: E,
}

/// Deadline scheduler for delayed session events.
///
/// `poll` drains everything due at `now` in deadline order (ties resolved
/// by insertion order), so multiple outstanding entries may coexist — the
/// processing delay and the progress-animation tick run side by side.
#[derive(Debug)]
pub struct TrialClock<E> {
    entries: Vec<Entry<E>>,
    next_seq: u64,
}

impl<E> Default for TrialClock<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<E> TrialClock<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-shot event to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) {
        self.entries.push(Entry {
            deadline: now + delay,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Remove and return every event whose deadline has passed, in
    /// deadline order.
    pub fn poll(&mut self, now: Instant) -> Vec<E> {
        let mut due: Vec<Entry<E>> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|e| (e.deadline, e.seq));
        due.into_iter().map(|e| e.event).collect()
    }

    /// Earliest outstanding deadline, for sizing the event-loop timeout.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Count of outstanding entries.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
