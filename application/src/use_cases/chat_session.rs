//! Chat session use case.
//!
//! [`ChatSession`] drives a [`ChatState`] around calls to a [`Responder`]:
//!
//! 1. Check-and-set the in-flight guard, append the user message
//! 2. Call the responder with the raw text
//! 3. Append the reply (or the fallback), or record the failure
//! 4. Release the guard on every exit path, including a dropped future
//!
//! The state lives behind a mutex that is never held across an `.await`, so
//! readers observe the user message and the loading flags while the
//! responder call is pending.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, event_types,
};
use crate::ports::responder::{Responder, ResponderError};
use chrono::{DateTime, Utc};
use parley_domain::util::preview;
use parley_domain::{ChatState, FALLBACK_REPLY, Message, SendTicket, Sender};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Why a send was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The text was empty after trimming.
    EmptyMessage,
    /// Another send of this session is still waiting for its reply.
    SendInFlight,
}

/// Result of [`ChatSession::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The responder answered; carries its parsed payload.
    Replied(Value),
    /// The responder call failed; carries the underlying description.
    Failed { error: String },
    /// Nothing was sent and the state is unchanged.
    Skipped(SkipReason),
}

/// Conversation state of one chat widget plus its responder.
pub struct ChatSession {
    state: Mutex<ChatState>,
    responder: Arc<dyn Responder>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatSession {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            state: Mutex::new(ChatState::new()),
            responder,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn responder_name(&self) -> &str {
        self.responder.name()
    }

    /// Copy of the whole state.
    pub fn snapshot(&self) -> ChatState {
        self.state().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().messages().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn is_typing(&self) -> bool {
        self.state().is_typing()
    }

    pub fn error_message(&self) -> String {
        self.state().error_message().to_string()
    }

    /// Send a user message and wait for the bot's reply.
    ///
    /// Blank text, or a call made while another send is pending, returns
    /// [`SendOutcome::Skipped`] without touching the state.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            debug!("Ignoring empty message");
            return SendOutcome::Skipped(SkipReason::EmptyMessage);
        }

        let ticket = self.state().begin_send(text);
        let Some(ticket) = ticket else {
            debug!("Send already in flight, rejecting: {}", preview(text, 60));
            return SendOutcome::Skipped(SkipReason::SendInFlight);
        };
        let mut guard = InFlight {
            session: self,
            ticket,
            armed: true,
        };

        info!(
            "Sending message via {}: {}",
            self.responder.name(),
            preview(text, 100)
        );
        self.log_event(event_types::USER_MESSAGE, json!({ "text": text }));

        let result = self.responder.respond(text).await;
        let ticket = guard.disarm();

        match result {
            Ok(reply) => {
                let reply_text = match reply.response() {
                    Some(text) => text.to_string(),
                    None => {
                        warn!("Responder payload has no usable `response` field, using fallback");
                        FALLBACK_REPLY.to_string()
                    }
                };

                let applied = self.state().complete_send(ticket, reply_text.clone());
                if !applied {
                    debug!("History was reset while waiting, dropping reply");
                }
                // A dropped reply stays in the transcript, marked stale.
                self.log_event(
                    event_types::BOT_REPLY,
                    json!({ "text": reply_text, "payload": reply.payload, "stale": !applied }),
                );
                SendOutcome::Replied(reply.payload)
            }
            Err(e) => {
                warn!("Responder {} failed: {}", self.responder.name(), e);
                self.state().fail_send(ticket);
                self.log_event(
                    event_types::SEND_FAILED,
                    json!({ "error": e.to_string(), "status": e.status() }),
                );
                SendOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Append a message without calling the responder.
    ///
    /// `timestamp` defaults to now.
    pub fn add_message(
        &self,
        text: impl Into<String>,
        sender: Sender,
        timestamp: Option<DateTime<Utc>>,
    ) {
        self.state()
            .add_message(text, sender, timestamp.unwrap_or_else(Utc::now));
    }

    /// Reset the history to the greeting, then ask the responder to delete
    /// its side of the conversation.
    ///
    /// The local reset always happens first and is never rolled back. The
    /// deletion is best-effort: its payload or error is handed back to the
    /// caller and never recorded in the session's error message.
    pub async fn clear_messages(&self) -> Result<Value, ResponderError> {
        self.state().reset();
        info!("Chat history cleared");
        self.log_event(event_types::HISTORY_CLEARED, json!({}));

        match self.responder.delete_history().await {
            Ok(payload) => {
                debug!("Remote history deleted: {}", payload);
                Ok(payload)
            }
            Err(e) => {
                warn!("Remote history deletion failed: {}", e);
                Err(e)
            }
        }
    }

    /// Clear the error message only.
    pub fn clear_error(&self) {
        self.state().clear_error();
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_event(&self, event_type: &'static str, payload: Value) {
        self.conversation_logger
            .log(ConversationEvent::new(event_type, payload));
    }
}

/// Releases the in-flight flags if a send future is dropped mid-call.
struct InFlight<'a> {
    session: &'a ChatSession,
    ticket: SendTicket,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(&mut self) -> SendTicket {
        self.armed = false;
        self.ticket
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("Send dropped before the responder answered");
            self.session.state().abandon_send(self.ticket);
        }
    }
}
