//! Event scripts for `cmdlog feed`
//!
//! ```text
//! # mode    filetype  keys
//! NORMAL    rust      dd
//! NORMAL    rust      i
//! INSERT    rust      hello<ESC>
//! !NORMAL   rust      jdd        <- replayed from a macro
//! ```
//!
//! Fields are separated by single spaces; everything after the second space
//! is the key sequence, so a space key is just a space.

use cmdlog_core::{EditorMode, EscapeTable, KeyCode};
use thiserror::Error;

/// Errors from parsing a script line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Mode name not recognised
    #[error("unknown mode '{0}'")]
    UnknownMode(String),

    /// Line has no filetype field
    #[error("expected '<MODE> <filetype|-> <keys>'")]
    MissingFiletype,
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// Mode the keys are typed in
    pub mode: EditorMode,
    /// Buffer file type, empty for `-`
    pub filetype: String,
    /// Key codes in order
    pub codes: Vec<KeyCode>,
    /// Whether the keys come from macro playback
    pub replaying: bool,
}

impl ScriptLine {
    /// Parse one line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str, table: &EscapeTable) -> Result<Option<Self>, ScriptError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            return Ok(None);
        }

        let line = line.trim_start();
        let (replaying, line) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let mut fields = line.splitn(3, ' ');
        let mode_name = fields.next().unwrap_or_default();
        let mode: EditorMode = mode_name
            .parse()
            .map_err(|_| ScriptError::UnknownMode(mode_name.to_string()))?;
        let filetype = match fields.next() {
            Some("-") => String::new(),
            Some(ft) if !ft.is_empty() => ft.to_string(),
            _ => return Err(ScriptError::MissingFiletype),
        };
        let keys = fields.next().unwrap_or_default();

        Ok(Some(Self {
            mode,
            filetype,
            codes: decode_keys(keys, table),
            replaying,
        }))
    }
}

/// Turn escape notation into key codes
///
/// Tokens the table does not produce (non-ASCII characters) map to their
/// Unicode scalar value.
pub fn decode_keys(keys: &str, table: &EscapeTable) -> Vec<KeyCode> {
    table
        .split_tokens(keys)
        .into_iter()
        .map(|token| {
            table.unescape(token).unwrap_or_else(|| {
                token.chars().next().map(|c| c as KeyCode).unwrap_or_default()
            })
        })
        .collect()
}

/// Parse a key code given as decimal or `0x` hex
///
/// Hex values are taken as 32-bit patterns, so `0xFFFF9D95` is accepted.
pub fn parse_code(text: &str) -> Option<KeyCode> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok().map(|v| v as KeyCode),
        None => text.parse().ok(),
    }
}
