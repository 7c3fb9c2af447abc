//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use colored::Colorize;
use parley_application::{ChatSession, SendOutcome, SettingsStore, SkipReason};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tracing::debug;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Clear,
    History,
    Settings,
    Models,
    Model(String),
    Dark,
    Font(u32),
    Sounds,
    Error,
    Quit,
}

impl ReplCommand {
    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.trim().splitn(2, ' ');
        let command = parts.next().unwrap_or("");
        let args = parts.next().unwrap_or("").trim();

        let parsed = match command {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/clear" => ReplCommand::Clear,
            "/history" => ReplCommand::History,
            "/settings" => ReplCommand::Settings,
            "/models" => ReplCommand::Models,
            "/dark" => ReplCommand::Dark,
            "/sounds" => ReplCommand::Sounds,
            "/error" => ReplCommand::Error,
            "/model" => {
                if args.is_empty() {
                    return Err("Usage: /model <id>".to_string());
                }
                ReplCommand::Model(args.to_string())
            }
            "/font" => {
                let size = args
                    .parse::<u32>()
                    .map_err(|_| "Usage: /font <size>".to_string())?;
                ReplCommand::Font(size)
            }
            other => return Err(format!("Unknown command: {}", other)),
        };
        Ok(parsed)
    }
}

/// Result of handling a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    session: Arc<ChatSession>,
    settings: SettingsStore,
    verbose: bool,
}

impl ChatRepl {
    pub fn new(session: Arc<ChatSession>, settings: SettingsStore) -> Self {
        Self {
            session,
            settings,
            verbose: false,
        }
    }

    /// Print raw responder payloads after each reply
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("parley").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    if input.starts_with('/') {
                        if self.handle_command(input).await == CommandResult::Exit {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(input);
                    // The raw line goes to the responder untrimmed.
                    self.process_message(&line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "╭─────────────────────────────────────────────╮".cyan());
        println!("{}", "│               Parley - Chat                 │".cyan());
        println!("{}", "╰─────────────────────────────────────────────╯".cyan());
        println!();
        println!("{} {}", "Responder:".bold(), self.session.responder_name());
        println!("{} {}", "Model:".bold(), self.settings.selected_model());
        println!();
        print!(
            "{}",
            ConsoleFormatter::format_transcript(&self.session.messages())
        );
        println!();
        println!("Type {} for available commands", "/help".cyan());
        println!();
    }

    fn print_help() {
        println!();
        println!("{}", "Commands:".bold());
        println!("  /help, /h, /?     - Show this help");
        println!("  /clear            - Reset the conversation and delete remote history");
        println!("  /history          - Show the conversation so far");
        println!("  /settings         - Show current settings");
        println!("  /models           - List available models");
        println!("  /model <id>       - Select a model");
        println!("  /dark             - Toggle dark mode");
        println!("  /font <size>      - Set the font size");
        println!("  /sounds           - Toggle notification sounds");
        println!("  /error            - Show and dismiss the last error");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle a slash command. Returns whether to continue or exit.
    pub async fn handle_command(&mut self, line: &str) -> CommandResult {
        let command = match ReplCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{} {}", "?".yellow(), message);
                println!("Type {} for available commands", "/help".cyan());
                return CommandResult::Continue;
            }
        };
        debug!("REPL command: {:?}", command);

        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return CommandResult::Exit;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Clear => {
                let result = self.session.clear_messages().await;
                println!("{}", "Conversation cleared.".green());
                if let Err(e) = result {
                    println!(
                        "{}",
                        ConsoleFormatter::format_warning(&format!(
                            "Remote history was not deleted: {}",
                            e
                        ))
                    );
                }
            }
            ReplCommand::History => {
                print!(
                    "{}",
                    ConsoleFormatter::format_transcript(&self.session.messages())
                );
            }
            ReplCommand::Settings => {
                print!(
                    "{}",
                    ConsoleFormatter::format_settings(self.settings.settings())
                );
            }
            ReplCommand::Models => {
                print!(
                    "{}",
                    ConsoleFormatter::format_models(self.settings.settings())
                );
            }
            ReplCommand::Model(id) => match self.settings.set_model(&id) {
                Ok(()) => println!("Model set to {}", id.green()),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Dark => match self.settings.toggle_dark_mode() {
                Ok(on) => println!("Dark mode {}", if on { "on" } else { "off" }),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Font(size) => match self.settings.set_font_size(size) {
                Ok(()) => println!("Font size set to {}", size),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Sounds => match self.settings.toggle_sounds() {
                Ok(on) => println!("Sounds {}", if on { "on" } else { "off" }),
                Err(e) => println!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Error => {
                let error = self.session.error_message();
                if error.is_empty() {
                    println!("{}", "No error.".dimmed());
                } else {
                    println!("{}", ConsoleFormatter::format_error(&error));
                    self.session.clear_error();
                }
            }
        }
        CommandResult::Continue
    }

    async fn process_message(&self, text: &str) {
        println!("{}", ConsoleFormatter::typing_indicator());

        match self.session.send_message(text).await {
            SendOutcome::Replied(payload) => {
                if let Some(reply) = self.session.messages().last() {
                    println!("{}", ConsoleFormatter::format_message(reply));
                }
                if self.verbose {
                    println!("{}", ConsoleFormatter::format_payload(&payload));
                }
            }
            SendOutcome::Failed { error } => {
                println!(
                    "{}",
                    ConsoleFormatter::format_error(&self.session.error_message())
                );
                if self.verbose {
                    println!("{}", error.dimmed());
                }
            }
            SendOutcome::Skipped(SkipReason::SendInFlight) => {
                println!(
                    "{}",
                    ConsoleFormatter::format_warning("Still waiting for the previous reply.")
                );
            }
            SendOutcome::Skipped(SkipReason::EmptyMessage) => {}
        }
        println!();
    }
}
