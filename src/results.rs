//! Session records and the shared CSV results store.
//!
//! One participant session produces exactly one [`SessionRecord`], appended
//! as one row at session end. The store is shared across sessions: the
//! header row is written only when the file does not yet exist, and rows
//! are never rewritten. A crash mid-session loses that participant's
//! progress — accepted for this research tool.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::TaskError;

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// One participant's full session: identifier plus choices in trial order.
///
/// Created fresh per run and never mutated after it is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    /// Free-text participant identifier, set once at session start.
    pub participant: String,
    /// Trust ratings (0-5), one per consumed trial, in consumption order.
    pub choices: Vec<u8>,
}

impl SessionRecord {
    /// Header row for a store holding sessions of `trials` trials:
    /// `participant_number,obstacle 1,…,obstacle N`.
    #[must_use]
    pub fn header(trials: usize) -> String {
        let mut header = String::from("participant_number");
        for i in 1..=trials {
            header.push_str(&format!(",obstacle {i}"));
        }
        header
    }

    /// Serialize this record as one CSV row (no trailing newline).
    #[must_use]
    pub fn to_row(&self) -> String {
        let mut row = csv_field(&self.participant);
        for choice in &self.choices {
            row.push_str(&format!(",{choice}"));
        }
        row
    }
}

/// Quote a CSV field if it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

// ---------------------------------------------------------------------------
// ResultSink
// ---------------------------------------------------------------------------

/// Append-only destination for finished session records.
///
/// The session core only needs this contract; the CSV store is the one
/// production implementation, tests substitute their own.
pub trait ResultSink {
    /// Append one record. The only failure mode is an unwritable store,
    /// which is fatal for the session.
    fn append(&mut self, record: &SessionRecord) -> Result<(), TaskError>;
}

/// CSV-backed store at a fixed path, shared across sessions.
#[derive(Clone, Debug)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unwritable(&self, source: std::io::Error) -> TaskError {
        TaskError::StoreUnwritable {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultSink for CsvSink {
    fn append(&mut self, record: &SessionRecord) -> Result<(), TaskError> {
        // Header decision is made before opening: the open itself creates
        // the file, so a fresh store gets exactly one header row.
        let is_new = !self.path.exists();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unwritable(e))?;

        let mut payload = String::new();
        if is_new {
            payload.push_str(&SessionRecord::header(record.choices.len()));
            payload.push('\n');
        }
        payload.push_str(&record.to_row());
        payload.push('\n');

        file.write_all(payload.as_bytes())
            .map_err(|e| self.unwritable(e))?;
        file.flush().map_err(|e| self.unwritable(e))?;

        info!(
            participant = %record.participant,
            choices = record.choices.len(),
            store = %self.path.display(),
            "session record appended"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lists_every_obstacle_column() {
        let header = SessionRecord::header(3);
        assert_eq!(header, "participant_number,obstacle 1,obstacle 2,obstacle 3");
    }

    #[test]
    fn row_serializes_choices_in_order() {
        let record = SessionRecord {
            participant: "P001".to_owned(),
            choices: vec![0, 5, 3],
        };
        assert_eq!(record.to_row(), "P001,0,5,3");
    }

    #[test]
    fn participant_field_is_quoted_when_needed() {
        let record = SessionRecord {
            participant: "pilot, morning \"A\"".to_owned(),
            choices: vec![1],
        };
        assert_eq!(record.to_row(), "\"pilot, morning \"\"A\"\"\",1");
    }
}
