//! Application layer for parley
//!
//! This crate contains the chat session and settings store services plus the
//! port definitions their adapters implement. It depends only on the domain
//! layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    key_value_store::{InMemoryKeyValueStore, KeyValueStore, StorageError},
    responder::{Responder, ResponderError, ResponderReply},
};
pub use use_cases::chat_session::{ChatSession, SendOutcome, SkipReason};
pub use use_cases::settings_store::{SETTINGS_KEY, SettingsError, SettingsStore};
