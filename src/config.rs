//! Task configuration (`trustcourse.toml`).
//!
//! Missing file → all defaults (no error). Unknown keys are rejected so a
//! typo in a study setup fails loudly at startup instead of silently
//! running with defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TaskError;

/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "trustcourse.toml";

/// Built-in study instructions shown above the trust prompt.
pub const DEFAULT_INSTRUCTIONS: &str = "\
Now, you will play a game with the robotic arm you just worked with. \
Pay attention carefully, because your decisions will affect how much money you will win. \
The robotic arm moved through several obstacle courses earlier today. \
The robotic arm moved toy balls to the other side of the table, but this time with obstacles in the way. \
Each obstacle course had a difficulty of easy, medium, or hard. \
For easy obstacle courses, the robotic arm moved around one obstacle, for medium, 2 obstacles, and for hard, 3 obstacles. \
In this game, you will rate your level of trust that the robotic arm completed the course without hitting any obstacles from 0% trust to 100% trust. \
If you are correct, easy obstacles will win you up to $0.25, medium obstacles will win you up to $0.50, and hard obstacles $1.00. \
The level of trust you have in the robotic arm will relate directly to your reward. \
That means, if you have high trust in the robotic arm and it succeeds, you will win more money. \
If you have low trust in the robotic arm and it fails, you will win more money. \
However, if you have low trust in the robotic arm and it succeeds, you will win less money, and vice versa. \
You will get feedback about whether the robotic arm succeeded for two random hard obstacles.";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level task configuration.
///
/// Parsed from `trustcourse.toml`. Missing fields use defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Results store settings.
    #[serde(default)]
    pub results: ResultsConfig,

    /// Session presentation settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl TaskConfig {
    /// Load from `path`. A missing file yields the default configuration;
    /// an unreadable or invalid file is a fatal [`TaskError::Config`].
    pub fn load(path: &Path) -> Result<Self, TaskError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| TaskError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Instructions text, configured or built-in.
    #[must_use]
    pub fn instructions(&self) -> &str {
        self.session
            .instructions
            .as_deref()
            .unwrap_or(DEFAULT_INSTRUCTIONS)
    }
}

// ---------------------------------------------------------------------------
// ResultsConfig
// ---------------------------------------------------------------------------

/// Where the shared results store lives.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultsConfig {
    /// Path to the CSV store (default: `data.csv` in the working
    /// directory). Sessions append; the file is shared across participants.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data.csv")
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Presentation text overrides.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Replacement for the built-in study instructions.
    #[serde(default)]
    pub instructions: Option<String>,
}
