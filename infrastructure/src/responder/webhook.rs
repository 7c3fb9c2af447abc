//! Webhook responder: chat and history deletion over HTTP.
//!
//! - chat: `POST {chat_url}` with `Authorization: Bearer <token>` and
//!   `{"message": "..."}`; the JSON reply is handed back as-is
//! - deletion: `DELETE {delete_url}` with `Authorization: <delete_token>`
//!   (no `Bearer` prefix) and no body

use crate::config::WebhookEndpoint;
use async_trait::async_trait;
use parley_application::{Responder, ResponderError, ResponderReply};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of body bytes kept in an error message
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// [`Responder`] backed by an authenticated HTTP webhook.
pub struct WebhookResponder {
    client: reqwest::Client,
    endpoint: WebhookEndpoint,
}

impl WebhookResponder {
    pub fn new(endpoint: WebhookEndpoint, timeout: Duration) -> Result<Self, ResponderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResponderError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &WebhookEndpoint {
        &self.endpoint
    }

    /// Turn a non-2xx response into [`ResponderError::HttpStatus`].
    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ResponderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let body = parley_domain::util::preview(&body, MAX_ERROR_BODY);
        Err(ResponderError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport_error(e: reqwest::Error) -> ResponderError {
    if e.is_timeout() {
        ResponderError::Timeout
    } else if e.is_connect() {
        ResponderError::ConnectionError(e.to_string())
    } else {
        ResponderError::Other(e.to_string())
    }
}

#[async_trait]
impl Responder for WebhookResponder {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn respond(&self, message: &str) -> Result<ResponderReply, ResponderError> {
        debug!("POST {}", self.endpoint.chat_url);
        let response = self
            .client
            .post(self.endpoint.chat_url.clone())
            .bearer_auth(&self.endpoint.token)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let body = response.bytes().await.map_err(transport_error)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            debug!("Webhook answered with an empty body");
            return Ok(ResponderReply::new(Value::Null));
        }

        // A body we cannot parse degrades to the fallback reply.
        let payload = serde_json::from_slice(&body).unwrap_or_else(|e| {
            warn!("Webhook reply is not JSON: {}", e);
            Value::Null
        });
        Ok(ResponderReply::new(payload))
    }

    async fn delete_history(&self) -> Result<Value, ResponderError> {
        let Some(url) = &self.endpoint.delete_url else {
            debug!("No deletion endpoint configured, skipping remote delete");
            return Ok(Value::Null);
        };

        debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url.clone())
            .header(AUTHORIZATION, &self.endpoint.delete_token)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check_status(response).await?;

        let body = response.bytes().await.map_err(transport_error)?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| ResponderError::InvalidResponse(e.to_string()))
    }
}
