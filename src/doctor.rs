//! Pre-session environment checks.
//!
//! Run before seating a participant: verifies the config parses, the
//! results store is writable, and the terminal can host the session UI.
//! The store check matters most — an unwritable store is only discovered
//! at session end otherwise, after the participant's 30 trials are done.

use std::io::IsTerminal as _;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::TaskConfig;

/// Output format for the doctor report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct DoctorEnvelope {
    checks: Vec<DoctorCheck>,
    all_ok: bool,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<String>,
}

fn print_check(check: &DoctorCheck) {
    let prefix = match check.status.as_str() {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "fail" => "[FAIL]",
        _ => "[???]",
    };
    println!("{} {}", prefix, check.message);
    if let Some(fix) = &check.fix {
        println!("       {fix}");
    }
}

/// Check configuration and results store health.
pub fn run(config_path: &Path, results_override: Option<&Path>, format: ReportFormat) -> Result<()> {
    let mut checks = Vec::new();

    let (config, config_check) = check_config(config_path);
    checks.push(config_check);

    let store_path = results_override.unwrap_or_else(|| config.results.path.as_path());
    checks.push(check_store(store_path));
    checks.push(check_terminal());

    let all_ok = checks.iter().all(|c| c.status == "ok");

    match format {
        ReportFormat::Json => {
            let envelope = DoctorEnvelope { checks, all_ok };
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        ReportFormat::Text => {
            println!("trustcourse doctor");
            println!("==================");
            println!();
            for check in &checks {
                print_check(check);
            }
            println!();
            if all_ok {
                println!("Ready to run a session.");
            } else {
                println!("Some checks failed. See above for details.");
            }
        }
    }

    Ok(())
}

fn check_config(path: &Path) -> (TaskConfig, DoctorCheck) {
    match TaskConfig::load(path) {
        Ok(config) => {
            let message = if path.exists() {
                format!("config: loaded {}", path.display())
            } else {
                format!("config: {} absent, using defaults", path.display())
            };
            (
                config,
                DoctorCheck {
                    name: "config".to_owned(),
                    status: "ok".to_owned(),
                    message,
                    fix: None,
                },
            )
        }
        Err(err) => (
            TaskConfig::default(),
            DoctorCheck {
                name: "config".to_owned(),
                status: "fail".to_owned(),
                message: format!("config: {err}"),
                fix: Some("Fix or delete the config file.".to_owned()),
            },
        ),
    }
}

/// Verify the store can be appended to without creating it — creating an
/// empty file here would suppress the header row on the first real append.
fn check_store(path: &Path) -> DoctorCheck {
    let name = "results store".to_owned();

    if path.exists() {
        match std::fs::OpenOptions::new().append(true).open(path) {
            Ok(_) => DoctorCheck {
                name,
                status: "ok".to_owned(),
                message: format!("results store: {} exists and is appendable", path.display()),
                fix: None,
            },
            Err(e) => DoctorCheck {
                name,
                status: "fail".to_owned(),
                message: format!("results store: {} is not appendable: {e}", path.display()),
                fix: Some("Check file permissions, or point results.path elsewhere.".to_owned()),
            },
        }
    } else {
        // Probe the parent directory with a throwaway file.
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        let probe = parent
            .unwrap_or_else(|| Path::new("."))
            .join(".trustcourse-probe");
        match std::fs::write(&probe, b"") {
            Ok(()) => {
                let _ = std::fs::remove_file(&probe);
                DoctorCheck {
                    name,
                    status: "ok".to_owned(),
                    message: format!(
                        "results store: {} will be created on first save",
                        path.display()
                    ),
                    fix: None,
                }
            }
            Err(e) => DoctorCheck {
                name,
                status: "fail".to_owned(),
                message: format!(
                    "results store: directory for {} is not writable: {e}",
                    path.display()
                ),
                fix: Some("Create the directory or point results.path elsewhere.".to_owned()),
            },
        }
    }
}

fn check_terminal() -> DoctorCheck {
    if std::io::stdout().is_terminal() {
        DoctorCheck {
            name: "terminal".to_owned(),
            status: "ok".to_owned(),
            message: "terminal: stdout is a tty".to_owned(),
            fix: None,
        }
    } else {
        DoctorCheck {
            name: "terminal".to_owned(),
            status: "warn".to_owned(),
            message: "terminal: stdout is not a tty; the session UI needs one".to_owned(),
            fix: Some("Run from an interactive terminal.".to_owned()),
        }
    }
}
