//! Chat session domain.
//!
//! - [`entities::Message`]: a single chat entry
//! - [`entities::Sender`]: who wrote it
//! - [`state::ChatState`]: history plus in-flight flags for one widget

pub mod entities;
pub mod state;
