//! Settings domain.
//!
//! - [`entities::Settings`]: persisted display and model preferences
//! - [`entities::ModelOption`]: an entry of the model catalog

pub mod entities;
