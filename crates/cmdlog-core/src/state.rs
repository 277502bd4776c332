//! State tags
//!
//! The logger groups keystrokes by an opaque, comparable state supplied by the
//! caller. It only needs equality and a name to print.

/// A discrete input state the logger can group keystrokes by
pub trait StateTag: Clone + PartialEq {
    /// Name written in the state column of a log line
    ///
    /// Must not contain spaces, or the line can no longer be split into
    /// fields.
    fn name(&self) -> &str;
}

impl StateTag for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl StateTag for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
