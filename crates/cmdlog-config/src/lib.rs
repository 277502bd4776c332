//! # cmdlog Configuration
//!
//! Typed configuration for the cmdlog keystroke logger.
//!
//! Configuration lives in a single TOML file, by default
//! `~/.config/cmdlog/config.toml`. Every field has a default, so a missing
//! file (or a missing section) is never an error.
//!
//! ```toml
//! [logger]
//! log_dir = "/var/log/cmdlog"
//! log_insert_text = false
//! max_run_len = 511
//!
//! [[logger.special_keys]]
//! code = 0xFFFF9D95
//! label = "BS"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmdlog_config::CmdlogConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = CmdlogConfig::load_or_default(None)?;
//! config.apply_env_overrides();
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logger;

pub use config::*;
pub use logger::*;
