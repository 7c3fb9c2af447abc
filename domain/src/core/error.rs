//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Font size must be positive, got {0}")]
    InvalidFontSize(u32),

    #[error("Model catalog is empty")]
    EmptyModelCatalog,

    #[error("Duplicate model id in catalog: {0}")]
    DuplicateModel(String),
}

impl DomainError {
    /// Check if this error is a rejected model selection
    pub fn is_unknown_model(&self) -> bool {
        matches!(self, DomainError::UnknownModel(_))
    }
}
