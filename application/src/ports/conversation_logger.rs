//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording chat events
//! (user messages, bot replies, failed sends, history resets) to a
//! transcript log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the transcript in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// Event type names used by the chat session.
pub mod event_types {
    pub const USER_MESSAGE: &str = "user_message";
    pub const BOT_REPLY: &str = "bot_reply";
    pub const SEND_FAILED: &str = "send_failed";
    pub const HISTORY_CLEARED: &str = "history_cleared";
}

/// A structured conversation event for logging.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (see [`event_types`]).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible: a broken transcript must never break
/// the chat, so implementations swallow their own errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
