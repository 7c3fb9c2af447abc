//! Session domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text of the bot message every session starts with.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Bot reply used when the responder answers without a `response` field.
pub const FALLBACK_REPLY: &str = "Sorry, I could not process your message.";

/// User-facing description stored when a send fails.
pub const SEND_FAILURE_MESSAGE: &str = "Failed to get a response. Please try again.";

/// Author of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("unknown sender: {}", other)),
        }
    }
}

/// A single entry in the chat history (Entity)
///
/// Messages are never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User, Utc::now())
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot, Utc::now())
    }

    /// The default first message of a session.
    pub fn greeting() -> Self {
        Self::bot(GREETING)
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
