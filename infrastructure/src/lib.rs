//! Infrastructure layer for parley
//!
//! Adapters for the ports defined in the application layer: the webhook and
//! canned responders, file-backed settings storage, the JSONL transcript
//! logger, and configuration loading.

pub mod config;
pub mod logging;
pub mod responder;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileResponderConfig,
    FileSettingsConfig, ResponderKind, WebhookEndpoint,
};
pub use logging::JsonlConversationLogger;
pub use responder::{
    BuildResponderError, CANNED_REPLIES, CannedResponder, WebhookResponder, build_responder,
};
pub use storage::JsonFileStore;
