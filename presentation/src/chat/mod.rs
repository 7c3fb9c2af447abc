//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for parley.

mod repl;

pub use repl::{ChatRepl, CommandResult, ReplCommand};
