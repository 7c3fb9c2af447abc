//! Responder adapters.
//!
//! - [`WebhookResponder`]: authenticated HTTP webhook with deletion support
//! - [`CannedResponder`]: simulated backend with canned replies
//!
//! [`build_responder`] picks one from the validated configuration.

mod canned;
mod webhook;

pub use canned::{CANNED_REPLIES, CannedResponder};
pub use webhook::WebhookResponder;

use crate::config::{ConfigValidationError, FileResponderConfig, ResponderKind};
use parley_application::{Responder, ResponderError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors while constructing a responder
#[derive(Error, Debug)]
pub enum BuildResponderError {
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    #[error(transparent)]
    Client(#[from] ResponderError),
}

/// Build the responder selected by `config.provider`.
pub fn build_responder(
    config: &FileResponderConfig,
) -> Result<Arc<dyn Responder>, BuildResponderError> {
    match config.provider {
        ResponderKind::Webhook => {
            let endpoint = config.webhook_endpoint()?;
            info!("Using webhook responder at {}", endpoint.chat_url);
            let timeout = Duration::from_secs(config.timeout_seconds);
            Ok(Arc::new(WebhookResponder::new(endpoint, timeout)?))
        }
        ResponderKind::Canned => {
            info!("Using canned responder");
            Ok(Arc::new(CannedResponder::new(Duration::from_millis(
                config.canned_delay_ms,
            ))))
        }
    }
}
