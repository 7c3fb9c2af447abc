//! Responder port
//!
//! Defines the interface for the external service that turns a user message
//! into a bot reply, and that can erase the remote side of the history.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to a responder
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ResponderError {
    /// HTTP status code, if the responder answered with a non-2xx status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResponderError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Parsed payload returned by a responder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderReply {
    pub payload: Value,
}

impl ResponderReply {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Reply carrying only a `response` field.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "response": text.into() }))
    }

    /// The `response` field, if present as a non-blank string.
    pub fn response(&self) -> Option<&str> {
        self.payload
            .get("response")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Gateway to the service producing bot replies.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short name for logs and status lines.
    fn name(&self) -> &str;

    /// Send the raw user text and return the parsed payload.
    async fn respond(&self, message: &str) -> Result<ResponderReply, ResponderError>;

    /// Erase the remote conversation, returning the uninterpreted payload.
    ///
    /// Responders without remote state keep the default, which does nothing.
    async fn delete_history(&self) -> Result<Value, ResponderError> {
        Ok(Value::Null)
    }
}
