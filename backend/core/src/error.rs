use thiserror::Error;

/// Top-level error type for the CardForge runtime.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("no file content in upload")]
    EmptyUpload,

    #[error("card not found: {0}")]
    NotFound(String),

    #[error("provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Shorthand for an external-service failure.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
