use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use trustcourse::config::{TaskConfig, DEFAULT_CONFIG_FILE};
use trustcourse::doctor;
use trustcourse::results::CsvSink;
use trustcourse::telemetry;
use trustcourse::tui;

/// Obstacle-course trust rating task
///
/// Presents a participant with 30 simulated obstacle-course trials (10
/// easy, 10 medium, 10 hard) and records one trust rating per trial.
/// Scripted feedback appears on trials 9, 18, and 30. At session end the
/// full choice history is appended as one row to the shared CSV results
/// store.
///
/// TYPICAL STUDY FLOW:
///
///   # before seating the participant
///   trustcourse doctor
///
///   # one invocation per participant
///   trustcourse run
///
/// The results store location comes from trustcourse.toml (results.path,
/// default data.csv) and can be overridden with --results.
#[derive(Parser)]
#[command(name = "trustcourse")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'trustcourse <command> --help' for more information on a specific command.")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the results store path from the config
    #[arg(long, global = true)]
    results: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one participant session
    ///
    /// Takes over the terminal until the session finishes or is aborted.
    /// An aborted session saves nothing; a finished session appends
    /// exactly one row to the results store.
    Run,

    /// Check configuration and results store health
    ///
    /// Verifies the config parses, the results store is appendable (or its
    /// directory writable), and the terminal can host the session UI.
    Doctor {
        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: doctor::ReportFormat,
    },
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = TaskConfig::load(&cli.config)?;
            let store = cli.results.unwrap_or_else(|| config.results.path.clone());
            tui::run(&config, CsvSink::new(store))
        }
        Commands::Doctor { format } => doctor::run(&cli.config, cli.results.as_deref(), format),
    }
}
