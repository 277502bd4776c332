//! Log line format
//!
//! Each completed run becomes one line:
//!
//! ```text
//! <epoch_seconds>.<epoch_micros> <context> <STATE> <escaped keys>
//! 1767539400.004211 rust NORMAL dd
//! ```
//!
//! and every freshly opened file starts with a header:
//!
//! ```text
//! 1767539400.000017 none VIM-LOGGING cmdlog 0.1.0
//! ```
//!
//! Microseconds are always six digits so the timestamp reads as a decimal.
//! The payload is the last field and may itself contain spaces.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Context written when the caller supplies none
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Context column of the header line
pub const HEADER_CONTEXT: &str = "none";

/// State column of the header line
pub const HEADER_TAG: &str = "VIM-LOGGING";

/// Errors from parsing a log line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// Fewer than the four space-separated fields
    #[error("expected 4 fields, found {0}")]
    MissingFields(usize),

    /// Timestamp is not `<seconds>.<6-digit micros>`
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Line is a header, not a keystroke run
    #[error("line is a file header")]
    Header,
}

/// Wall-clock time of a log line, at microsecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    /// Seconds since the Unix epoch
    pub secs: i64,
    /// Microseconds within the second (`0..1_000_000`)
    pub micros: u32,
}

impl Timestamp {
    /// Current time
    pub fn now() -> Self {
        Self::from(Utc::now())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self {
            secs: time.timestamp(),
            // Leap seconds report >= 1_000_000
            micros: time.timestamp_subsec_micros().min(999_999),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.secs, self.micros)
    }
}

impl FromStr for Timestamp {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LineError::InvalidTimestamp(s.to_string());
        let (secs, micros) = s.split_once('.').ok_or_else(invalid)?;
        if micros.len() != 6 || !micros.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        Ok(Self {
            secs: secs.parse().map_err(|_| invalid())?,
            micros: micros.parse().map_err(|_| invalid())?,
        })
    }
}

/// One keystroke run as written to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// When the run was flushed
    pub timestamp: Timestamp,
    /// Caller context, typically the buffer's file type
    pub context: String,
    /// State name the run was typed in
    pub state: String,
    /// Escaped keystrokes
    pub keys: String,
}

impl LogLine {
    /// Build a line, substituting [`UNKNOWN_CONTEXT`] for an empty context
    pub fn new(
        timestamp: Timestamp,
        context: &str,
        state: impl Into<String>,
        keys: impl Into<String>,
    ) -> Self {
        let context = if context.is_empty() {
            UNKNOWN_CONTEXT
        } else {
            context
        };
        Self {
            timestamp,
            context: context.to_string(),
            state: state.into(),
            keys: keys.into(),
        }
    }

    /// Parse a keystroke line (trailing newline optional)
    ///
    /// Header lines are rejected with [`LineError::Header`].
    pub fn parse(line: &str) -> Result<Self, LineError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let fields: Vec<&str> = line.splitn(4, ' ').collect();
        if fields.len() != 4 {
            return Err(LineError::MissingFields(fields.len()));
        }

        let timestamp: Timestamp = fields[0].parse()?;
        if fields[1] == HEADER_CONTEXT && fields[2] == HEADER_TAG {
            return Err(LineError::Header);
        }

        Ok(Self {
            timestamp,
            context: fields[1].to_string(),
            state: fields[2].to_string(),
            keys: fields[3].to_string(),
        })
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.timestamp, self.context, self.state, self.keys
        )
    }
}

/// First line of every freshly opened log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// When the file was opened
    pub timestamp: Timestamp,
    /// Logger version string
    pub version: String,
}

impl HeaderLine {
    /// Build a header for `version`
    pub fn new(timestamp: Timestamp, version: impl Into<String>) -> Self {
        Self {
            timestamp,
            version: version.into(),
        }
    }

    /// Parse a header line, returning `None` for anything else
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let mut fields = line.splitn(4, ' ');
        let timestamp = fields.next()?.parse().ok()?;
        if fields.next()? != HEADER_CONTEXT || fields.next()? != HEADER_TAG {
            return None;
        }
        Some(Self {
            timestamp,
            version: fields.next()?.to_string(),
        })
    }
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.timestamp, HEADER_CONTEXT, HEADER_TAG, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ts(secs: i64, micros: u32) -> Timestamp {
        Timestamp { secs, micros }
    }

    #[test]
    fn timestamp_pads_micros() {
        assert_eq!(ts(1700000000, 42).to_string(), "1700000000.000042");
        assert_eq!(ts(5, 999_999).to_string(), "5.999999");
    }

    #[test]
    fn timestamp_from_datetime() {
        let time = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(Timestamp::from(time), ts(1_700_000_000, 123_456));
    }

    #[test]
    fn timestamp_rejects_short_micros() {
        assert!("12.5".parse::<Timestamp>().is_err());
        assert!("12".parse::<Timestamp>().is_err());
        assert!("x.000001".parse::<Timestamp>().is_err());
    }

    #[test]
    fn empty_context_becomes_unknown() {
        let line = LogLine::new(ts(1, 0), "", "NORMAL", "dd");
        assert_eq!(line.to_string(), "1.000000 unknown NORMAL dd");
    }

    #[test]
    fn payload_may_contain_spaces() {
        let parsed = LogLine::parse("10.000001 text INSERT hello world\n").unwrap();
        assert_eq!(parsed.keys, "hello world");
        assert_eq!(parsed.state, "INSERT");
        assert_eq!(parsed.context, "text");
    }

    #[test]
    fn header_is_not_a_run() {
        let header = HeaderLine::new(ts(3, 7), "cmdlog 0.1.0");
        let text = header.to_string();
        assert_eq!(text, "3.000007 none VIM-LOGGING cmdlog 0.1.0");
        assert_eq!(LogLine::parse(&text), Err(LineError::Header));
        assert_eq!(HeaderLine::parse(&text), Some(header));
    }

    #[test]
    fn run_is_not_a_header() {
        assert_eq!(HeaderLine::parse("3.000007 rust NORMAL x"), None);
    }

    #[test]
    fn short_line_is_rejected() {
        assert_eq!(
            LogLine::parse("1.000000 rust NORMAL"),
            Err(LineError::MissingFields(3))
        );
    }

    proptest! {
        #[test]
        fn display_then_parse(
            secs in 0i64..4_000_000_000,
            micros in 0u32..1_000_000,
            context in "[a-z]{1,10}",
            state in "[A-Z_]{1,12}",
            keys in "[ -~]{0,80}",
        ) {
            prop_assume!(!(context == HEADER_CONTEXT && state == HEADER_TAG));
            let line = LogLine::new(ts(secs, micros), &context, state, keys);
            let parsed = LogLine::parse(&format!("{line}\n")).unwrap();
            prop_assert_eq!(parsed, line);
        }
    }
}
