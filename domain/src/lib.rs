//! Domain layer for parley
//!
//! This crate contains the entities and invariants of the chat widget state.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! The in-memory conversation of one chat widget: an ordered message history
//! that always starts with a greeting, plus loading/typing flags and the last
//! error. See [`ChatState`].
//!
//! ## Settings
//!
//! Display and model preferences persisted between launches. The selected
//! model is always a member of the catalog. See [`Settings`].

pub mod core;
pub mod session;
pub mod settings;
pub mod util;

// Re-export commonly used types
pub use core::error::DomainError;
pub use session::{
    entities::{FALLBACK_REPLY, GREETING, Message, SEND_FAILURE_MESSAGE, Sender},
    state::{ChatState, SendTicket},
};
pub use settings::entities::{
    DEFAULT_FONT_SIZE, DEFAULT_MODEL_ID, ModelOption, Settings, validate_catalog,
};
