//! The input event logger
//!
//! Keystrokes are grouped into runs by state. A run ends when a keystroke
//! arrives in a different state (or on an explicit flush) and is then written
//! as one line. The first state ever seen only primes the logger; nothing is
//! written for it until a run has actually been typed.

use crate::buffer::RunBuffer;
use crate::escape::{EscapeTable, KeyCode};
use crate::file::LogFile;
use crate::line::{LogLine, Timestamp};
use crate::ownership::{NoopHook, PostCreateHook, SudoOwnership};
use crate::sink::{MessageSink, TracingSink};
use crate::state::StateTag;
use cmdlog_config::LoggerConfig;
use std::path::PathBuf;
use tracing::{debug, warn};

/// What a flush did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// No state had been seen yet; the new state was adopted
    WarmUp,
    /// Nothing was buffered, so no line was written
    Empty,
    /// One line was appended
    Written,
    /// The log file could not be opened (or logging is disabled); the run was dropped
    Unavailable,
    /// The write itself failed; the run was dropped
    WriteFailed,
}

/// Per-state keystroke logger writing to `<dir>/cmd<pid>.log`
///
/// Driven synchronously from the host's input loop. Every method is
/// infallible from the host's point of view: failures are logged, rationed
/// warnings go to the [`MessageSink`], and the affected run is dropped.
#[derive(Debug)]
pub struct InputEventLogger<S> {
    table: EscapeTable,
    buffer: RunBuffer,
    last_state: Option<S>,
    last_context: String,
    file: LogFile,
    lines_written: u64,
}

impl<S: StateTag> InputEventLogger<S> {
    /// Create a logger from configuration
    ///
    /// Warnings go to `tracing`; the sudo ownership hook is installed when
    /// `fix_ownership` is set. Nothing touches the filesystem until the first
    /// run is flushed.
    pub fn create(config: &LoggerConfig) -> Self {
        let hook: Box<dyn PostCreateHook> = if config.fix_ownership {
            Box::new(SudoOwnership::from_env())
        } else {
            Box::new(NoopHook)
        };
        Self::with_parts(config, Box::new(TracingSink), hook)
    }

    /// Create a logger with an explicit warning sink and post-create hook
    pub fn with_parts(
        config: &LoggerConfig,
        sink: Box<dyn MessageSink>,
        hook: Box<dyn PostCreateHook>,
    ) -> Self {
        let dir = config.enabled_dir().map(PathBuf::from);
        Self {
            table: EscapeTable::new(&config.special_keys),
            buffer: RunBuffer::new(config.max_run_len),
            last_state: None,
            last_context: String::new(),
            file: LogFile::new(dir, config.version_string.as_str(), sink, hook),
            lines_written: 0,
        }
    }

    /// Use a different process id in the log file name
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.file = self.file.with_pid(pid);
        self
    }

    /// Whether a log directory is configured
    pub fn is_enabled(&self) -> bool {
        self.file.is_enabled()
    }

    /// Path of the log file, if logging is enabled
    pub fn log_path(&self) -> Option<PathBuf> {
        self.file.path()
    }

    /// The escape table used for rendering
    pub fn escape_table(&self) -> &EscapeTable {
        &self.table
    }

    /// State of the run currently being buffered
    pub fn last_state(&self) -> Option<&S> {
        self.last_state.as_ref()
    }

    /// Escaped keystrokes buffered so far
    pub fn buffered(&self) -> String {
        self.buffer.contents()
    }

    /// Lines written since creation, header lines excluded
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Record one keystroke typed in `state`
    ///
    /// A state change first completes the previous run. The rendered key is
    /// then appended to the buffer, silently truncated at the bound.
    pub fn record(&mut self, state: S, code: KeyCode, context: &str) {
        if !self.is_enabled() {
            return;
        }

        self.observe(state, context);
        let rendered = self.table.escape(code);
        self.buffer.push(&rendered);
    }

    /// Complete the current run if `state` differs from the last one seen
    ///
    /// Returns the flush outcome when a flush happened. `context` becomes the
    /// one `close` uses for the pending run.
    pub fn observe(&mut self, state: S, context: &str) -> Option<FlushOutcome> {
        let outcome = if self.last_state.as_ref() == Some(&state) {
            None
        } else {
            Some(self.flush(state, context))
        };
        if self.last_context != context {
            self.last_context.clear();
            self.last_context.push_str(context);
        }
        outcome
    }

    /// Write the buffered run (if any) and start over under `state`
    ///
    /// The buffer is cleared and `state` adopted whatever happens, so a run
    /// that fails to write is dropped rather than retried.
    pub fn flush(&mut self, state: S, context: &str) -> FlushOutcome {
        let outcome = self.write_run(context);
        self.buffer.clear();
        self.last_state = Some(state);
        outcome
    }

    fn write_run(&mut self, context: &str) -> FlushOutcome {
        let Some(last) = self.last_state.as_ref() else {
            return FlushOutcome::WarmUp;
        };
        if self.buffer.is_empty() {
            return FlushOutcome::Empty;
        }
        if !self.file.ensure_open() {
            return FlushOutcome::Unavailable;
        }

        let truncated = self.buffer.is_truncated();
        let line = LogLine::new(Timestamp::now(), context, last.name(), self.buffer.take());
        match self.file.append(&line.to_string()) {
            Ok(()) => {
                self.lines_written += 1;
                debug!(
                    "Logged {} chars in {}{}",
                    line.keys.chars().count(),
                    line.state,
                    if truncated { " (truncated)" } else { "" }
                );
                FlushOutcome::Written
            }
            Err(e) => {
                warn!("Dropping {} run: {}", line.state, e);
                FlushOutcome::WriteFailed
            }
        }
    }

    /// Make sure the log file is open
    ///
    /// Returns false when logging is disabled or the file cannot be opened.
    pub fn ensure_file_open(&mut self) -> bool {
        self.file.ensure_open()
    }

    /// Flush the pending run under its own state and close the file
    pub fn close(mut self) -> FlushOutcome {
        let outcome = match self.last_state.clone() {
            Some(state) => {
                let context = std::mem::take(&mut self.last_context);
                self.flush(state, &context)
            }
            None => FlushOutcome::WarmUp,
        };
        self.file.close();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use tempfile::TempDir;

    fn logger(dir: &TempDir) -> InputEventLogger<&'static str> {
        InputEventLogger::with_parts(
            &LoggerConfig::with_log_dir(dir.path()),
            Box::new(MemorySink::new()),
            Box::new(NoopHook),
        )
        .with_pid(1)
    }

    fn runs(dir: &TempDir) -> Vec<LogLine> {
        let content = std::fs::read_to_string(dir.path().join("cmd1.log")).unwrap_or_default();
        content.lines().filter_map(|l| LogLine::parse(l).ok()).collect()
    }

    #[test]
    fn example_run() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        log.record("STATE_A", 'a' as KeyCode, "rust");
        log.record("STATE_A", 1, "rust");
        assert_eq!(log.buffered(), "a<C-A>");

        assert_eq!(log.flush("STATE_A", "rust"), FlushOutcome::Written);
        let lines = runs(&tmp);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].to_string().ends_with("STATE_A a<C-A>"));
    }

    #[test]
    fn flush_before_any_record_is_warm_up() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        assert_eq!(log.flush("NORMAL", ""), FlushOutcome::WarmUp);
        assert_eq!(log.last_state(), Some(&"NORMAL"));
        assert_eq!(log.flush("INSERT", ""), FlushOutcome::Empty);
        assert_eq!(log.last_state(), Some(&"INSERT"));
        assert!(!tmp.path().join("cmd1.log").exists());
    }

    #[test]
    fn state_change_flushes_previous_run() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        log.record("NORMAL", 'i' as KeyCode, "c");
        log.record("INSERT", 'x' as KeyCode, "c");

        let lines = runs(&tmp);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].state, "NORMAL");
        assert_eq!(lines[0].keys, "i");
        assert_eq!(log.buffered(), "x");
    }

    #[test]
    fn empty_context_is_unknown() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        log.record("NORMAL", 'x' as KeyCode, "");
        log.flush("NORMAL", "");
        assert_eq!(runs(&tmp)[0].context, "unknown");
    }

    #[test]
    fn disabled_logger_records_nothing() {
        let mut log: InputEventLogger<&'static str> = InputEventLogger::with_parts(
            &LoggerConfig::default(),
            Box::new(MemorySink::new()),
            Box::new(NoopHook),
        );

        log.record("NORMAL", 'x' as KeyCode, "");
        assert_eq!(log.buffered(), "");
        assert!(!log.ensure_file_open());
        assert_eq!(log.log_path(), None);
    }

    #[test]
    fn close_flushes_pending_run() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        log.record("CMDLINE", 'w' as KeyCode, "md");
        log.record("CMDLINE", 'q' as KeyCode, "md");
        assert_eq!(log.close(), FlushOutcome::Written);

        let lines = runs(&tmp);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].context, "md");
        assert_eq!(lines[0].keys, "wq");
    }

    #[test]
    fn observe_updates_close_context() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        log.record("NORMAL", 'x' as KeyCode, "rust");
        assert_eq!(log.observe("NORMAL", "toml"), None);
        assert_eq!(log.close(), FlushOutcome::Written);

        let lines = runs(&tmp);
        assert_eq!(lines[0].context, "toml");
        assert_eq!(lines[0].keys, "x");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_disk_warns_and_drops_runs() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink("/dev/full", tmp.path().join("cmd1.log")).unwrap();
        let sink = MemorySink::new();
        let mut log: InputEventLogger<&'static str> = InputEventLogger::with_parts(
            &LoggerConfig::with_log_dir(tmp.path()),
            Box::new(sink.clone()),
            Box::new(NoopHook),
        )
        .with_pid(1);

        log.flush("NORMAL", "");
        for _ in 0..5 {
            log.record("NORMAL", 'x' as KeyCode, "");
            assert_eq!(log.flush("NORMAL", ""), FlushOutcome::Unavailable);
        }
        assert_eq!(log.lines_written(), 0);
        assert_eq!(sink.messages().len(), 4);
    }

    #[test]
    fn close_without_activity() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(logger(&tmp).close(), FlushOutcome::WarmUp);
    }

    #[test]
    fn observe_same_state_is_noop() {
        let tmp = TempDir::new().unwrap();
        let mut log = logger(&tmp);

        assert_eq!(log.observe("NORMAL", ""), Some(FlushOutcome::WarmUp));
        assert_eq!(log.observe("NORMAL", ""), None);
    }
}
