//! Logger component configuration
//!
//! Settings consumed by `cmdlog_core::InputEventLogger`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest rendered run kept in memory before characters are dropped
pub const DEFAULT_MAX_RUN_LEN: usize = 511;

/// Key code the editor reports for the backspace key
pub const BACKSPACE_CODE: u32 = 0xFFFF_9D95;

/// Key code the editor reports for the delete key
pub const DELETE_CODE: u32 = 0xFFFF_9395;

/// A non-ASCII key code with a fixed display label
///
/// Rendered as `<label>` in the log. The code is stored as the unsigned bit
/// pattern the editor hands out, so `0xFFFF9D95` can be written as-is in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialKey {
    /// Raw key code
    pub code: u32,
    /// Label without angle brackets (e.g. `BS`)
    pub label: String,
}

impl SpecialKey {
    /// Create a special key entry
    pub fn new(code: u32, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory holding `cmd<pid>.log` files. Logging is disabled when unset
    /// or empty.
    pub log_dir: Option<PathBuf>,

    /// Whether text typed in insert mode is logged
    pub log_insert_text: bool,

    /// Maximum rendered length of one run
    pub max_run_len: usize,

    /// Version announced in the header line of every new log file
    pub version_string: String,

    /// Hand the log file to the sudo-invoking user when running as root
    pub fix_ownership: bool,

    /// Codes outside the ASCII table that get a named rendering
    pub special_keys: Vec<SpecialKey>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_insert_text: false,
            max_run_len: DEFAULT_MAX_RUN_LEN,
            version_string: default_version_string(),
            fix_ownership: true,
            special_keys: default_special_keys(),
        }
    }
}

impl LoggerConfig {
    /// Config with logging enabled into `dir`, everything else default
    pub fn with_log_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// The log directory, if logging is enabled
    pub fn enabled_dir(&self) -> Option<&Path> {
        self.log_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

fn default_version_string() -> String {
    format!("cmdlog {}", env!("CARGO_PKG_VERSION"))
}

/// Backspace and delete, as reported by the editor's key decoder
pub fn default_special_keys() -> Vec<SpecialKey> {
    vec![
        SpecialKey::new(BACKSPACE_CODE, "BS"),
        SpecialKey::new(DELETE_CODE, "DEL"),
    ]
}
