//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file (and
//! of the `PARLEY_*` environment overrides). They are validated once at
//! startup by [`FileConfig::validate`] so that a missing base URL or token is
//! reported before the first request instead of producing a malformed URL.

use parley_domain::{ModelOption, validate_catalog};
use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{0} is required for the webhook responder")]
    MissingField(&'static str),

    #[error("{field} is not a valid URL ({url}): {reason}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        reason: String,
    },

    #[error("responder.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("settings.models is invalid: {0}")]
    InvalidCatalog(#[from] parley_domain::DomainError),
}

/// Which backend answers chat messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderKind {
    /// Authenticated HTTP webhook with deletion support
    #[default]
    Webhook,
    /// Simulated backend returning canned replies after a delay
    Canned,
}

/// Raw responder configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResponderConfig {
    /// Backend kind
    pub provider: ResponderKind,
    /// Base URL of the webhook host, e.g. `https://flows.example.com/api/v1`
    #[serde(deserialize_with = "lenient_string")]
    pub base_url: Option<String>,
    /// Path of the chat endpoint, appended to `base_url`
    #[serde(deserialize_with = "lenient_string")]
    pub chat_path: Option<String>,
    /// Path of the history deletion endpoint; deletion is skipped when unset
    #[serde(deserialize_with = "lenient_string")]
    pub delete_path: Option<String>,
    /// Bearer token for the chat endpoint
    #[serde(deserialize_with = "lenient_string")]
    pub token: Option<String>,
    /// Plain `Authorization` value for the deletion endpoint (defaults to `token`)
    #[serde(deserialize_with = "lenient_string")]
    pub delete_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Reply delay of the canned responder in milliseconds
    pub canned_delay_ms: u64,
}

impl Default for FileResponderConfig {
    fn default() -> Self {
        Self {
            provider: ResponderKind::default(),
            base_url: None,
            chat_path: None,
            delete_path: None,
            token: None,
            delete_token: None,
            timeout_seconds: 30,
            canned_delay_ms: 1000,
        }
    }
}

/// Validated webhook endpoints and credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub chat_url: Url,
    pub delete_url: Option<Url>,
    pub token: String,
    pub delete_token: String,
}

impl FileResponderConfig {
    /// Resolve the webhook endpoints, failing on missing or malformed values.
    pub fn webhook_endpoint(&self) -> Result<WebhookEndpoint, ConfigValidationError> {
        let base_url = non_blank(&self.base_url)
            .ok_or(ConfigValidationError::MissingField("responder.base_url"))?;
        let chat_path = non_blank(&self.chat_path)
            .ok_or(ConfigValidationError::MissingField("responder.chat_path"))?;
        let token = non_blank(&self.token)
            .ok_or(ConfigValidationError::MissingField("responder.token"))?;

        let chat_url = join_url("responder.chat_path", base_url, chat_path)?;
        let delete_url = match non_blank(&self.delete_path) {
            Some(path) => Some(join_url("responder.delete_path", base_url, path)?),
            None => None,
        };
        let delete_token = non_blank(&self.delete_token).unwrap_or(token);

        Ok(WebhookEndpoint {
            chat_url,
            delete_url,
            token: token.to_string(),
            delete_token: delete_token.to_string(),
        })
    }
}

/// Deserialize an optional free-form string.
///
/// Environment values arrive typed (`PARLEY_RESPONDER__TOKEN=123456` is an
/// integer), so numbers and booleans are accepted and turned back into text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
    }

    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    }))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn join_url(field: &'static str, base: &str, path: &str) -> Result<Url, ConfigValidationError> {
    let raw = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let url = Url::parse(&raw).map_err(|e| ConfigValidationError::InvalidUrl {
        field,
        url: raw.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigValidationError::InvalidUrl {
            field,
            url: raw,
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}

/// Raw settings configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettingsConfig {
    /// Directory for persisted state (defaults to the platform data dir)
    #[serde(deserialize_with = "lenient_string")]
    pub data_dir: Option<String>,
    /// Model catalog offered to the user
    pub models: Vec<ModelOption>,
}

impl Default for FileSettingsConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            models: ModelOption::default_catalog(),
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript file; no transcript is written when unset
    #[serde(deserialize_with = "lenient_string")]
    pub conversation_log: Option<String>,
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub responder: FileResponderConfig,
    pub settings: FileSettingsConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check everything that must hold before the application starts.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.responder.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.responder.provider == ResponderKind::Webhook {
            self.responder.webhook_endpoint()?;
        }
        validate_catalog(&self.settings.models)?;
        Ok(())
    }
}
