//! Lazily opened per-process log file

use crate::error::{CmdlogError, CmdlogResult};
use crate::line::{HeaderLine, Timestamp};
use crate::ownership::PostCreateHook;
use crate::sink::{ErrorBudget, MessageSink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of the log file for process `pid` inside `dir`
pub fn log_path(dir: &Path, pid: u32) -> PathBuf {
    dir.join(format!("cmd{pid}.log"))
}

/// Append handle to `<dir>/cmd<pid>.log`, opened on first use
///
/// Open failures are retried on every call while the file is closed; the
/// [`ErrorBudget`] only limits how often the user hears about them.
pub struct LogFile {
    dir: Option<PathBuf>,
    pid: u32,
    version: String,
    file: Option<File>,
    budget: ErrorBudget,
    sink: Box<dyn MessageSink>,
    hook: Box<dyn PostCreateHook>,
}

impl LogFile {
    /// Create a closed log file handle
    ///
    /// `dir` of `None` (or an empty path) disables logging.
    pub fn new(
        dir: Option<PathBuf>,
        version: impl Into<String>,
        sink: Box<dyn MessageSink>,
        hook: Box<dyn PostCreateHook>,
    ) -> Self {
        Self {
            dir: dir.filter(|d| !d.as_os_str().is_empty()),
            pid: std::process::id(),
            version: version.into(),
            file: None,
            budget: ErrorBudget::default(),
            sink,
            hook,
        }
    }

    /// Use a different process id in the file name
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Replace the warning budget
    #[cfg(test)]
    pub(crate) fn with_budget(mut self, budget: ErrorBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Whether a log directory is configured
    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Whether the file is currently open
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Where the log file lives, if logging is enabled
    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_deref().map(|dir| log_path(dir, self.pid))
    }

    /// Open failures so far
    pub fn failures(&self) -> u32 {
        self.budget.failures()
    }

    /// Make sure the file is open, reporting failures through the sink
    ///
    /// Returns whether the file can be written to.
    pub fn ensure_open(&mut self) -> bool {
        match self.open() {
            Ok(()) => true,
            Err(CmdlogError::Disabled) => false,
            Err(CmdlogError::Open { path, source }) => {
                debug!("Failed to open {}: {}", path.display(), source);
                match self.budget.on_failure(&path) {
                    Some(message) => self.sink.warn(&message),
                    None if self.budget.is_exhausted() => {
                        debug!("cmdlog warnings suppressed after {} failures", self.failures())
                    }
                    None => {}
                }
                false
            }
            Err(e) => {
                debug!("Failed to prepare cmdlog: {}", e);
                false
            }
        }
    }

    fn open(&mut self) -> CmdlogResult<()> {
        if self.file.is_some() {
            return Ok(());
        }
        let path = self.path().ok_or(CmdlogError::Disabled)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| CmdlogError::Open {
                path: path.clone(),
                source,
            })?;

        if let Err(e) = self.hook.after_open(&file, &path) {
            debug!("Post-create hook failed for {}: {}", path.display(), e);
        }

        let header = HeaderLine::new(Timestamp::now(), self.version.as_str());
        // A header that cannot be written (disk full) counts as a failed open.
        write_line(&mut file, &header.to_string())
            .map_err(|source| CmdlogError::Open { path: path.clone(), source })?;

        debug!("Opened cmdlog {}", path.display());
        self.file = Some(file);
        Ok(())
    }

    /// Append one line; a newline is added
    pub fn append(&mut self, line: &str) -> CmdlogResult<()> {
        let file = self.file.as_mut().ok_or(CmdlogError::Disabled)?;
        write_line(file, line)?;
        Ok(())
    }

    /// Close the handle; the next `ensure_open` reopens and writes a new header
    pub fn close(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.sync_all() {
                debug!("Failed to sync cmdlog on close: {}", e);
            }
        }
    }
}

/// Write `line` and its newline with a single `write_all`
fn write_line(file: &mut File, line: &str) -> std::io::Result<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes())
}

impl std::fmt::Debug for LogFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFile")
            .field("dir", &self.dir)
            .field("pid", &self.pid)
            .field("open", &self.file.is_some())
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}
