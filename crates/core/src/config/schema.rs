//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of matches to show
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    3
}

/// Diagnostic database location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Explicit database path; skips discovery when set
    #[serde(default)]
    pub path: Option<String>,

    /// Paths probed in order when no explicit path is given
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            candidates: default_candidates(),
        }
    }
}

fn default_candidates() -> Vec<String> {
    vec![
        "données/diagnostics_complet.json",
        "données/diagnostics.json",
        "data/diagnostics.json",
        "../données/diagnostics_complet.json",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Print event targets
    #[serde(default)]
    pub show_target: bool,

    /// One JSON object per log line instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            show_target: false,
            json: false,
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}
