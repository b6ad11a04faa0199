//! CLI layer: built-in tool command, argument parsing and terminal output

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{Cli, Commands};
pub use commands::{register_builtins, AppfrontCommand, APPFRONT_CLASS};
pub use error::{CliError, CliResult};
