//! User-visible warnings
//!
//! The logger never fails the host, but when the log file cannot be opened
//! the user should hear about it a few times. Warnings go through a
//! [`MessageSink`] (the host's message area in an editor) and are rationed by
//! an [`ErrorBudget`].

use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Number of "cannot open" warnings shown before going quiet
pub const DEFAULT_WARNING_CAP: u32 = 3;

/// Final notice emitted once the budget is spent
pub const SUPPRESSION_NOTICE: &str = "Suppressing further cmdlog messages.";

/// Destination for user-visible warnings
pub trait MessageSink: Send {
    /// Show one warning to the user
    fn warn(&mut self, message: &str);
}

/// Sink that forwards warnings to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn warn(&mut self, message: &str) {
        warn!(target: "cmdlog", "{}", message);
    }
}

/// Sink that keeps warnings in memory
///
/// Clones share the same list, so a host can hand one clone to the logger
/// and drain the other when it redraws its message area.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all warnings received so far
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove and return all warnings received so far
    pub fn drain(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl MessageSink for MemorySink {
    fn warn(&mut self, message: &str) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

/// Rations open-failure warnings over the life of a logger
///
/// The first `cap` failures each produce a warning naming the path, the next
/// failure produces [`SUPPRESSION_NOTICE`], and every later failure is silent.
#[derive(Debug, Clone)]
pub struct ErrorBudget {
    failures: u32,
    cap: u32,
}

impl ErrorBudget {
    /// Create a budget allowing `cap` path warnings
    pub fn new(cap: u32) -> Self {
        Self { failures: 0, cap }
    }

    /// Record one open failure and return the warning to show, if any
    pub fn on_failure(&mut self, path: &Path) -> Option<String> {
        self.failures = self.failures.saturating_add(1);
        if self.failures <= self.cap {
            Some(format!("Cannot open cmdlog {}", path.display()))
        } else if self.failures == self.cap + 1 {
            Some(SUPPRESSION_NOTICE.to_string())
        } else {
            None
        }
    }

    /// Open failures seen so far
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Whether no further warnings will be produced
    pub fn is_exhausted(&self) -> bool {
        self.failures > self.cap
    }
}

impl Default for ErrorBudget {
    fn default() -> Self {
        Self::new(DEFAULT_WARNING_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_warnings_then_notice_then_silence() {
        let mut budget = ErrorBudget::default();
        let path = Path::new("/nope/cmd1.log");

        for _ in 0..3 {
            assert_eq!(
                budget.on_failure(path).as_deref(),
                Some("Cannot open cmdlog /nope/cmd1.log")
            );
        }
        assert_eq!(budget.on_failure(path).as_deref(), Some(SUPPRESSION_NOTICE));
        assert!(budget.is_exhausted());
        assert_eq!(budget.on_failure(path), None);
        assert_eq!(budget.on_failure(path), None);
        assert_eq!(budget.failures(), 6);
    }

    #[test]
    fn zero_cap_goes_straight_to_notice() {
        let mut budget = ErrorBudget::new(0);
        let path = Path::new("x");
        assert_eq!(budget.on_failure(path).as_deref(), Some(SUPPRESSION_NOTICE));
        assert_eq!(budget.on_failure(path), None);
    }

    #[test]
    fn memory_sink_clones_share_messages() {
        let sink = MemorySink::new();
        let mut handle = sink.clone();
        handle.warn("one");
        handle.warn("two");

        assert_eq!(sink.messages(), vec!["one", "two"]);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.messages().is_empty());
    }
}
