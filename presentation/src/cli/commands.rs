//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Chat with a webhook-backed assistant from the terminal")]
#[command(long_about = r#"
Parley keeps a chat session (message history, typing state, last error) and a
small set of persisted display preferences (theme, model, font size, sounds).

Messages are sent to the configured responder: an authenticated HTTP webhook,
or a canned offline responder for demos.

Configuration files are loaded from (in priority order):
1. PARLEY_* environment variables (e.g. PARLEY_RESPONDER__TOKEN)
2. --config <path>                      Explicit config file
3. ./parley.toml or ./.parley.toml      Project-level config
4. ~/.config/parley/config.toml         Global config

Example:
  parley "What's the weather like on Mars?"
  parley --model gpt-4 --chat
  PARLEY_RESPONDER__PROVIDER=canned parley --chat
"#)]
pub struct Cli {
    /// Message to send (not required in chat mode)
    pub message: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Select the model to use (must be in the catalog)
    #[arg(short, long, value_name = "ID")]
    pub model: Option<String>,

    /// Flip the dark mode preference
    #[arg(long)]
    pub toggle_dark_mode: bool,

    /// Set the font size
    #[arg(long, value_name = "N")]
    pub font_size: Option<u32>,

    /// Enable or disable notification sounds
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub sounds: Option<bool>,

    /// Print the current settings
    #[arg(long)]
    pub show_settings: bool,

    /// Reset the conversation and delete the remote history
    #[arg(long)]
    pub clear_history: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the bot reply
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether any settings flag was given
    pub fn changes_settings(&self) -> bool {
        self.toggle_dark_mode
            || self.model.is_some()
            || self.font_size.is_some()
            || self.sounds.is_some()
    }
}
