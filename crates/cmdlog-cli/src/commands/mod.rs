//! Subcommand implementations

pub mod config;
pub mod escape;
pub mod feed;
