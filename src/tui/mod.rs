//! Terminal presentation layer.
//!
//! Owns raw-mode setup/teardown and the event loop; all session logic
//! lives in [`crate::session`]. The store failure, if any, is surfaced
//! only after the terminal is restored so the message is readable.

mod app;
mod event;
mod theme;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::config::TaskConfig;
use crate::results::CsvSink;
use crate::session::SessionState;
use crate::trial::TrialQueue;

pub use app::App;

/// Run one full participant session.
pub fn run(config: &TaskConfig, sink: CsvSink) -> Result<()> {
    let session = SessionState::new(TrialQueue::standard(), Box::new(sink));
    let mut app = App::new(session, config.instructions().to_owned());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result?;
    if let Some(err) = app.take_save_error() {
        return Err(err.into());
    }
    Ok(())
}
