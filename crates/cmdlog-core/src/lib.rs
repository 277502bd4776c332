//! Per-mode keystroke audit logging
//!
//! This crate records what a user types into a modal editor, grouped into
//! runs by input state, as one timestamped text line per run in
//! `<log_dir>/cmd<pid>.log`.
//!
//! # Architecture
//!
//! - [`InputEventLogger`] - buffers a run and writes it when the state changes
//! - [`EscapeTable`] - renders key codes (`<C-A>`, `<ESC>`, `<BS>`, `<0x80>`)
//! - [`RunBuffer`] - bounded run storage with silent truncation
//! - [`LogFile`] - lazily opened append handle with rationed open warnings
//! - [`EditorTap`] - editor-side filtering (macro replay, insert text)
//!
//! # Example
//!
//! ```no_run
//! use cmdlog_config::LoggerConfig;
//! use cmdlog_core::InputEventLogger;
//!
//! let config = LoggerConfig::with_log_dir("/tmp/cmdlog");
//! let mut logger: InputEventLogger<&'static str> = InputEventLogger::create(&config);
//!
//! logger.record("NORMAL", 'd' as i32, "rust");
//! logger.record("NORMAL", 'd' as i32, "rust");
//! logger.record("INSERT", 'x' as i32, "rust"); // writes "... rust NORMAL dd"
//! logger.close();
//! ```

pub mod buffer;
pub mod editor;
pub mod error;
pub mod escape;
pub mod file;
pub mod line;
pub mod logger;
pub mod ownership;
pub mod sink;
pub mod state;

// Re-exports for convenience
pub use buffer::RunBuffer;
pub use editor::{EditorMode, EditorTap};
pub use error::{CmdlogError, CmdlogResult};
pub use escape::{escape_ascii, EscapeTable, KeyCode};
pub use file::{log_path, LogFile};
pub use line::{HeaderLine, LineError, LogLine, Timestamp, UNKNOWN_CONTEXT};
pub use logger::{FlushOutcome, InputEventLogger};
pub use ownership::{NoopHook, OwnerIds, PostCreateHook, SudoOwnership};
pub use sink::{ErrorBudget, MemorySink, MessageSink, TracingSink, SUPPRESSION_NOTICE};
pub use state::StateTag;
