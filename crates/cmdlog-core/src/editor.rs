//! Editor integration
//!
//! [`EditorMode`] names the states of a vi-style editor's input loop, and
//! [`EditorTap`] sits in that loop deciding which keystrokes reach the
//! logger: keys replayed from a register are never logged, and insert-mode
//! text is only logged when the user opted in.

use crate::escape::KeyCode;
use crate::logger::{FlushOutcome, InputEventLogger};
use crate::state::StateTag;
use cmdlog_config::LoggerConfig;
use std::fmt;
use std::str::FromStr;

/// Input states of the editor, as written in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorMode {
    Normal,
    Visual,
    OpPending,
    Cmdline,
    Insert,
    Langmap,
    ReplaceFlag,
    Replace,
    VreplaceFlag,
    Vreplace,
    Lreplace,
    NormalBusy,
    HitReturn,
    AskMore,
    SetWsize,
    Abbrev,
    ExternCmd,
    ShowMatch,
    Confirm,
    SelectMode,
}

impl EditorMode {
    /// Every mode, in declaration order
    pub const ALL: [EditorMode; 20] = [
        EditorMode::Normal,
        EditorMode::Visual,
        EditorMode::OpPending,
        EditorMode::Cmdline,
        EditorMode::Insert,
        EditorMode::Langmap,
        EditorMode::ReplaceFlag,
        EditorMode::Replace,
        EditorMode::VreplaceFlag,
        EditorMode::Vreplace,
        EditorMode::Lreplace,
        EditorMode::NormalBusy,
        EditorMode::HitReturn,
        EditorMode::AskMore,
        EditorMode::SetWsize,
        EditorMode::Abbrev,
        EditorMode::ExternCmd,
        EditorMode::ShowMatch,
        EditorMode::Confirm,
        EditorMode::SelectMode,
    ];

    /// Log name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Normal => "NORMAL",
            EditorMode::Visual => "VISUAL",
            EditorMode::OpPending => "OP_PENDING",
            EditorMode::Cmdline => "CMDLINE",
            EditorMode::Insert => "INSERT",
            EditorMode::Langmap => "LANGMAP",
            EditorMode::ReplaceFlag => "REPLACE_FLAG",
            EditorMode::Replace => "REPLACE",
            EditorMode::VreplaceFlag => "VREPLACE_FLAG",
            EditorMode::Vreplace => "VREPLACE",
            EditorMode::Lreplace => "LREPLACE",
            EditorMode::NormalBusy => "NORMAL_BUSY",
            EditorMode::HitReturn => "HITRETURN",
            EditorMode::AskMore => "ASKMORE",
            EditorMode::SetWsize => "SETWSIZE",
            EditorMode::Abbrev => "ABBREV",
            EditorMode::ExternCmd => "EXTERNCMD",
            EditorMode::ShowMatch => "SHOWMATCH",
            EditorMode::Confirm => "CONFIRM",
            EditorMode::SelectMode => "SELECTMODE",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditorMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown editor mode: {s}"))
    }
}

impl StateTag for EditorMode {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Filters editor keystrokes before they reach the logger
#[derive(Debug)]
pub struct EditorTap {
    logger: InputEventLogger<EditorMode>,
    log_insert_text: bool,
}

impl EditorTap {
    /// Build a tap and its logger from configuration
    pub fn new(config: &LoggerConfig) -> Self {
        Self::with_logger(InputEventLogger::create(config), config.log_insert_text)
    }

    /// Wrap an existing logger
    pub fn with_logger(logger: InputEventLogger<EditorMode>, log_insert_text: bool) -> Self {
        Self {
            logger,
            log_insert_text,
        }
    }

    /// Whether a key typed in `mode` would be logged
    pub fn should_log(&self, mode: EditorMode, replaying: bool) -> bool {
        if replaying {
            return false;
        }
        self.log_insert_text || mode != EditorMode::Insert
    }

    /// Feed one keystroke from the input loop
    ///
    /// A mode change always completes the previous run, even when this
    /// keystroke itself is filtered out.
    pub fn on_key(&mut self, mode: EditorMode, code: KeyCode, filetype: &str, replaying: bool) {
        if self.should_log(mode, replaying) {
            self.logger.record(mode, code, filetype);
        } else if self.logger.is_enabled() {
            self.logger.observe(mode, filetype);
        }
    }

    /// Force the current run out, e.g. before running an Ex command
    pub fn flush(&mut self, mode: EditorMode, filetype: &str) -> FlushOutcome {
        self.logger.flush(mode, filetype)
    }

    /// The wrapped logger
    pub fn logger(&self) -> &InputEventLogger<EditorMode> {
        &self.logger
    }

    /// Flush the pending run and close the log file
    pub fn close(self) -> FlushOutcome {
        self.logger.close()
    }
}
