//! Presentation layer for parley
//!
//! This crate contains the CLI definition, the console formatter and the
//! interactive chat REPL.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatRepl, CommandResult, ReplCommand};
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
