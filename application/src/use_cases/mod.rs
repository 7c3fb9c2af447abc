//! Use cases
//!
//! Application-level operations that drive domain state through ports.

pub mod chat_session;
pub mod settings_store;
