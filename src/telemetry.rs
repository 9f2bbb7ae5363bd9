//! Telemetry initialization.
//!
//! Controlled by `TRUSTCOURSE_LOG`:
//! - unset → no-op (tracing disabled, zero overhead)
//! - `"stderr"` → JSON events to stderr (only sensible outside the TUI,
//!   e.g. under `doctor` or when stderr is redirected)
//! - anything else → treated as a file path; JSON events are appended
//!   there, which keeps the terminal free for the session UI
//!
//! `RUST_LOG` filters as usual (default `info`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Initialize telemetry based on `TRUSTCOURSE_LOG`.
pub fn init() {
    let target = std::env::var("TRUSTCOURSE_LOG").ok();

    match target.as_deref() {
        None | Some("") => {}
        Some("stderr") => init_stderr(),
        Some(path) => init_file(path),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// JSON events to stderr via tracing-subscriber's JSON formatter.
fn init_stderr() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// JSON events appended to a log file. The TUI owns the terminal, so this
/// is the usual sink during a live session.
fn init_file(path: &str) {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("warning: cannot open log file '{path}': {e}; logging disabled");
            return;
        }
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file)),
        )
        .init();
}
