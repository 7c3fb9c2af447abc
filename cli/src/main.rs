//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use parley_application::{ChatSession, SendOutcome, SettingsStore, SkipReason};
use parley_domain::SEND_FAILURE_MESSAGE;
use parley_infrastructure::{
    ConfigLoader, FileConfig, JsonFileStore, JsonlConversationLogger, build_responder,
};
use parley_presentation::{ChatRepl, Cli, ConsoleFormatter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting parley");

    let config = load_config(&cli)?;

    // === Dependency Injection ===
    let mut settings = open_settings(&config)?;
    apply_settings_flags(&cli, &mut settings)?;

    if cli.show_settings {
        print!(
            "{}",
            ConsoleFormatter::format_settings(settings.settings())
        );
    }

    let wants_session = cli.chat || cli.clear_history || cli.message.is_some();
    if !wants_session {
        if cli.changes_settings() || cli.show_settings {
            return Ok(());
        }
        bail!("Message is required. Use --chat for interactive mode.");
    }

    let session = Arc::new(open_session(&config)?);

    if cli.clear_history {
        match session.clear_messages().await {
            Ok(_) => {
                if !cli.quiet {
                    println!("Conversation cleared.");
                }
            }
            Err(e) => eprintln!(
                "{}",
                ConsoleFormatter::format_warning(&format!(
                    "Remote history was not deleted: {}",
                    e
                ))
            ),
        }
    }

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(session, settings).with_verbose(cli.verbose > 0);
        repl.run().await?;
        return Ok(());
    }

    let Some(message) = cli.message else {
        return Ok(());
    };

    match session.send_message(&message).await {
        SendOutcome::Replied(payload) => {
            if cli.quiet {
                if let Some(reply) = session.messages().last() {
                    println!("{}", reply.text);
                }
            } else {
                print!(
                    "{}",
                    ConsoleFormatter::format_transcript(&session.messages())
                );
                if cli.verbose > 0 {
                    println!("{}", ConsoleFormatter::format_payload(&payload));
                }
            }
            Ok(())
        }
        SendOutcome::Failed { error } => bail!("{} ({})", SEND_FAILURE_MESSAGE, error),
        SendOutcome::Skipped(SkipReason::EmptyMessage) => bail!("Message is empty."),
        SendOutcome::Skipped(SkipReason::SendInFlight) => {
            bail!("A message is already being sent.")
        }
    }
}

/// Load and validate configuration, honoring --config and --no-config.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_env_only()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_settings(config: &FileConfig) -> Result<SettingsStore> {
    let dir = config
        .settings
        .data_dir
        .as_deref()
        .map(PathBuf::from)
        .or_else(JsonFileStore::default_dir)
        .context("Could not determine a data directory; set settings.data_dir")?;
    info!("Settings stored in {}", dir.display());

    let store = Arc::new(JsonFileStore::new(dir));
    SettingsStore::load(store, config.settings.models.clone()).context("Failed to load settings")
}

/// Settings flags are applied and persisted before anything else runs.
fn apply_settings_flags(cli: &Cli, settings: &mut SettingsStore) -> Result<()> {
    if let Some(model) = &cli.model {
        settings.set_model(model)?;
    }
    if cli.toggle_dark_mode {
        settings.toggle_dark_mode()?;
    }
    if let Some(size) = cli.font_size {
        settings.set_font_size(size)?;
    }
    if let Some(enabled) = cli.sounds {
        settings.set_enable_sounds(enabled)?;
    }
    Ok(())
}

fn open_session(config: &FileConfig) -> Result<ChatSession> {
    let responder = build_responder(&config.responder)?;
    let mut session = ChatSession::new(responder);

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::create(path) {
            Ok(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                session = session.with_conversation_logger(Arc::new(logger));
            }
            Err(e) => warn!("Could not open transcript {}: {}", path, e),
        }
    }

    Ok(session)
}
