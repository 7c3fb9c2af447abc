//! Console output formatter for chat transcripts and settings

use colored::Colorize;
use parley_domain::{Message, Sender, Settings};
use serde_json::Value;

/// Formats session and settings state for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a single message as `HH:MM:SS  You: text`
    pub fn format_message(message: &Message) -> String {
        let time = message.timestamp.format("%H:%M:%S").to_string();
        let label = match message.sender {
            Sender::User => "You:".green().bold(),
            Sender::Bot => "Bot:".cyan().bold(),
        };
        let body = Self::indent(&message.text, "      ");
        format!("{} {} {}", time.dimmed(), label, body.trim_start())
    }

    /// Format the whole message history
    pub fn format_transcript(messages: &[Message]) -> String {
        let mut output = String::new();
        for message in messages {
            output.push_str(&Self::format_message(message));
            output.push('\n');
        }
        output
    }

    /// Typing indicator shown while a reply is pending
    pub fn typing_indicator() -> String {
        format!("{}", "Bot is typing...".dimmed().italic())
    }

    pub fn format_error(error: &str) -> String {
        format!("{} {}", "Error:".red().bold(), error)
    }

    pub fn format_warning(warning: &str) -> String {
        format!("{} {}", "Warning:".yellow().bold(), warning)
    }

    /// Format the current settings snapshot
    pub fn format_settings(settings: &Settings) -> String {
        let model = match settings.selected_option() {
            Some(option) => format!("{} ({})", option.name, option.id),
            None => settings.selected_model().to_string(),
        };

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Settings:".bold().cyan()));
        output.push_str(&format!(
            "  Dark mode:  {}\n",
            Self::on_off(settings.dark_mode())
        ));
        output.push_str(&format!("  Model:      {}\n", model));
        output.push_str(&format!("  Font size:  {}\n", settings.font_size()));
        output.push_str(&format!(
            "  Sounds:     {}\n",
            Self::on_off(settings.enable_sounds())
        ));
        output
    }

    /// List the model catalog, marking the selected entry
    pub fn format_models(settings: &Settings) -> String {
        let mut output = format!("{}\n", "Available models:".bold().cyan());
        for option in settings.available_models() {
            let selected = option.id == settings.selected_model();
            let marker = if selected { "*" } else { " " };
            let line = format!("  {} {:<16} {}", marker, option.id, option.name);
            if selected {
                output.push_str(&line.green().to_string());
            } else {
                output.push_str(&line);
            }
            output.push('\n');
        }
        output
    }

    /// Render a responder payload for verbose output
    pub fn format_payload(payload: &Value) -> String {
        match payload {
            Value::Null => "(empty)".dimmed().to_string(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }

    fn on_off(value: bool) -> String {
        if value {
            "on".green().to_string()
        } else {
            "off".dimmed().to_string()
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
