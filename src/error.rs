//! Error types for the trust task.
//!
//! Defines [`TaskError`], the unified error type for session operations.
//! Each variant carries enough context for the researcher running the
//! session to understand what happened and what to do next; queue
//! exhaustion is deliberately not here — it is the normal end-of-session
//! signal, not a failure.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// TaskError
// ---------------------------------------------------------------------------

/// Unified error type for session operations.
#[derive(Debug)]
pub enum TaskError {
    /// A trust rating outside the six-level scale was submitted.
    InvalidChoice {
        /// The rejected option value.
        option: u8,
    },

    /// An operation was invoked in a phase where it is not valid
    /// (e.g. `choose` while feedback is on screen).
    InvalidPhase {
        /// The operation that was attempted.
        action: &'static str,
        /// The phase the session was in.
        phase: &'static str,
    },

    /// The participant identifier failed validation.
    InvalidParticipantId {
        /// Why the identifier was rejected.
        reason: String,
    },

    /// The shared results store could not be written. Fatal for the
    /// session: the record is lost and there is no retry.
    StoreUnwritable {
        /// Path to the results store.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file could not be loaded or parsed.
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// An I/O error outside the results store.
    Io(std::io::Error),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChoice { option } => {
                write!(
                    f,
                    "invalid trust rating {option}: ratings are encoded 0-5 (0%, 20%, 40%, 60%, 80%, 100%).\n  The session state is unchanged; submit a rating in range."
                )
            }
            Self::InvalidPhase { action, phase } => {
                write!(
                    f,
                    "'{action}' is not valid while the session is {phase}.\n  The session state is unchanged."
                )
            }
            Self::InvalidParticipantId { reason } => {
                write!(
                    f,
                    "invalid participant identifier: {reason}\n  To fix: enter a non-empty identifier, e.g. P001."
                )
            }
            Self::StoreUnwritable { path, source } => {
                write!(
                    f,
                    "results store '{}' is not writable: {source}\n  The session record was NOT saved.\n  To fix: check permissions and disk space, or point results.path in trustcourse.toml at a writable location, then re-run the participant.",
                    path.display()
                )
            }
            Self::Config { path, detail } => {
                write!(
                    f,
                    "configuration error in '{}': {}\n  To fix: edit the config file and correct the issue, or delete it to use defaults.",
                    path.display(),
                    detail
                )
            }
            Self::Io(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl std::error::Error for TaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreUnwritable { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TaskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_choice_message_names_the_scale() {
        let err = TaskError::InvalidChoice { option: 9 };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains("0-5"));
    }

    #[test]
    fn store_unwritable_warns_that_record_is_lost() {
        let err = TaskError::StoreUnwritable {
            path: PathBuf::from("/nope/data.csv"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/data.csv"));
        assert!(msg.contains("NOT saved"));
    }
}
