//! Command line interface for ypack.
//!
//! Argument parsing, command execution and colored user feedback.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, ConvertArgs, RuntimeConfig, ValidateArgs};
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    commands::execute_command(args).await
}
