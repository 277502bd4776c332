//! Command-line driver for the cmdlog keystroke logger

pub mod cli;
pub mod commands;
pub mod script;
