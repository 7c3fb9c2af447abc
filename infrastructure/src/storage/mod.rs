//! Persistence adapters.
//!
//! Provides [`JsonFileStore`], the file-backed implementation of the
//! [`KeyValueStore`](parley_application::KeyValueStore) port.

mod json_file_store;

pub use json_file_store::JsonFileStore;
