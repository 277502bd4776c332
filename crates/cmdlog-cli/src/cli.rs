use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "cmdlog")]
#[command(about = "cmdlog - per-mode keystroke audit log for modal editors")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/cmdlog/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for cmd<pid>.log files (overrides config and CMDLOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Effective diagnostic level from --log-level / --verbose
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive the logger from an event script
    ///
    /// Each line is `[!]<MODE> <filetype|-> <keys>`, where keys use the log's
    /// escape notation (e.g. `ia<ESC>:wq<C-M>`) and a leading `!` marks keys
    /// replayed from a macro.
    Feed {
        /// Script file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Also log text typed in insert mode
        #[arg(long)]
        insert_text: bool,
    },

    /// Show how key codes are rendered in the log
    Escape {
        /// Key codes, decimal or 0x-prefixed hex
        #[arg(required = true, allow_hyphen_values = true)]
        codes: Vec<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}
