//! Chat session state (Aggregate)
//!
//! [`ChatState`] owns the message history and the in-flight flags of a single
//! chat widget. It contains no I/O: the application layer drives it around the
//! responder call.
//!
//! ```text
//! Idle ──begin_send──▶ Sending ──complete_send──▶ Idle
//!                         │
//!                         └────fail_send────────▶ Idle (error_message set)
//! ```

use super::entities::{Message, SEND_FAILURE_MESSAGE, Sender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket handed out by [`ChatState::begin_send`].
///
/// Carries the history generation the send was started in, so a reply that
/// lands after a reset can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTicket {
    generation: u64,
}

impl SendTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// In-memory conversation state for one chat widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    messages: Vec<Message>,
    is_loading: bool,
    is_typing: bool,
    error_message: String,
    generation: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Create a fresh state holding only the greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::greeting()],
            is_loading: false,
            is_typing: false,
            error_message: String::new(),
            generation: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a responder call is pending.
    pub fn is_sending(&self) -> bool {
        self.is_loading
    }

    /// Append a message with an explicit sender and timestamp.
    pub fn add_message(
        &mut self,
        text: impl Into<String>,
        sender: Sender,
        timestamp: DateTime<Utc>,
    ) {
        self.messages.push(Message::new(text, sender, timestamp));
    }

    /// Start a send: check-and-set the in-flight guard and append the user
    /// message.
    ///
    /// Returns `None` without touching the state if the trimmed text is empty
    /// or another send is still in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<SendTicket> {
        if text.trim().is_empty() || self.is_sending() {
            return None;
        }

        self.messages.push(Message::user(text));
        self.is_loading = true;
        self.is_typing = true;

        Some(SendTicket {
            generation: self.generation,
        })
    }

    /// Finish a send with the bot's reply.
    ///
    /// Returns `false` when the ticket belongs to an older generation; the
    /// reply is then dropped and the state is left as the reset made it.
    pub fn complete_send(&mut self, ticket: SendTicket, reply: impl Into<String>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.messages.push(Message::bot(reply));
        self.error_message.clear();
        self.finish();
        true
    }

    /// Finish a send that failed. No bot message is appended.
    pub fn fail_send(&mut self, ticket: SendTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.error_message = SEND_FAILURE_MESSAGE.to_string();
        self.finish();
        true
    }

    /// Release the in-flight flags of a send that will never complete
    /// (its future was dropped). Neither a message nor an error is recorded.
    pub fn abandon_send(&mut self, ticket: SendTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }

        self.finish();
        true
    }

    /// Reset to the greeting, clearing flags and error, and start a new
    /// generation.
    pub fn reset(&mut self) {
        self.messages = vec![Message::greeting()];
        self.error_message.clear();
        self.finish();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn clear_error(&mut self) {
        self.error_message.clear();
    }

    fn finish(&mut self) {
        self.is_loading = false;
        self.is_typing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::{FALLBACK_REPLY, GREETING};

    #[test]
    fn new_state_holds_only_greeting() {
        let state = ChatState::new();
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].text, GREETING);
        assert!(!state.is_loading());
        assert!(!state.is_typing());
        assert!(!state.has_error());
    }

    #[test]
    fn begin_send_appends_user_message_and_sets_flags() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("hello");

        assert!(ticket.is_some());
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[1].text, "hello");
        assert!(state.messages()[1].is_user());
        assert!(state.is_loading());
        assert!(state.is_typing());
    }

    #[test]
    fn begin_send_ignores_blank_input() {
        let mut state = ChatState::new();
        let before = state.clone();
        for text in ["", "   ", "\n\t"] {
            assert!(state.begin_send(text).is_none());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn begin_send_rejects_second_send_in_flight() {
        let mut state = ChatState::new();
        let _ticket = state.begin_send("first").unwrap();

        assert!(state.begin_send("second").is_none());
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn complete_send_appends_bot_reply_and_clears_flags() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("hi").unwrap();

        assert!(state.complete_send(ticket, FALLBACK_REPLY));
        assert_eq!(state.messages().len(), 3);
        assert!(state.messages()[2].is_bot());
        assert_eq!(state.messages()[2].text, FALLBACK_REPLY);
        assert!(!state.is_loading());
        assert!(!state.is_typing());
    }

    #[test]
    fn fail_send_sets_error_without_bot_message() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("hi").unwrap();

        assert!(state.fail_send(ticket));
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.error_message(), SEND_FAILURE_MESSAGE);
        assert!(!state.is_loading());
        assert!(!state.is_typing());
    }

    #[test]
    fn successful_send_clears_previous_error() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("one").unwrap();
        state.fail_send(ticket);
        assert!(state.has_error());

        let ticket = state.begin_send("two").unwrap();
        state.complete_send(ticket, "ok");
        assert!(!state.has_error());
    }

    #[test]
    fn reset_drops_stale_reply() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("hi").unwrap();
        state.reset();

        assert!(!state.complete_send(ticket, "late"));
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].text, GREETING);
        assert!(!state.is_loading());
    }

    #[test]
    fn abandon_send_releases_guard() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("hi").unwrap();

        assert!(state.abandon_send(ticket));
        assert!(!state.is_loading());
        assert!(!state.has_error());
        assert_eq!(state.messages().len(), 2);
        assert!(state.begin_send("again").is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = ChatState::new();
        state.add_message("a", Sender::User, Utc::now());
        let ticket = state.begin_send("b").unwrap();
        state.fail_send(ticket);

        state.reset();
        assert_eq!(state.messages().len(), 1);
        assert!(state.messages()[0].is_bot());
        assert!(!state.is_loading());
        assert!(!state.is_typing());
        assert_eq!(state.error_message(), "");
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn clear_error_touches_only_error() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("hi").unwrap();
        state.fail_send(ticket);
        let before = state.messages().to_vec();

        state.clear_error();
        assert_eq!(state.error_message(), "");
        assert_eq!(state.messages(), before.as_slice());
    }

    #[test]
    fn timestamps_are_non_decreasing() {
        let mut state = ChatState::new();
        let ticket = state.begin_send("a").unwrap();
        state.complete_send(ticket, "b");
        let ticket = state.begin_send("c").unwrap();
        state.complete_send(ticket, "d");

        let stamps: Vec<_> = state.messages().iter().map(|m| m.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
