//! Carelog CLI library
//!
//! Argument definitions, configuration, output formatting, and command
//! execution for the `carelog` binary. Split from `main.rs` so parsing
//! and configuration stay unit-testable.

#![warn(clippy::all)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use output::Formatter;
