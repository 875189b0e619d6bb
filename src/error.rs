use crate::types::Provider;
use thiserror::Error;

/// Errors returned by the video generation driver and its transport.
#[derive(Error, Debug)]
pub enum VideoError {
    /// No API key was supplied in the configuration.
    #[error("No API key configured — set LUMA_API_KEY or pass one explicitly")]
    MissingApiKey,

    /// The selected engine is recognized but has no working implementation.
    #[error("Provider {0} is not implemented")]
    ProviderNotImplemented(Provider),

    /// The request violated a constraint the provider would reject anyway.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// The provider rejected our credentials (HTTP 401/403).
    #[error("Provider rejected credentials — check the configured API key")]
    Unauthenticated,

    /// The provider returned a non-success HTTP status.
    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The creation response carried no usable job identifier.
    #[error("Submission rejected: response contained no job id")]
    SubmissionRejected,

    /// The provider reported a terminal failure, with its reason verbatim.
    #[error("Generation failed: {0}")]
    ProviderFailed(String),

    /// The job completed but the expected video asset was missing.
    #[error("Generation completed without a video asset")]
    IncompleteResult,

    /// The wall-clock deadline elapsed while polling.
    #[error("Generation timed out")]
    Timeout,

    /// The caller's cancellation flag was set.
    #[error("Generation was cancelled")]
    Cancelled,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for VideoError {
    fn from(err: anyhow::Error) -> Self {
        VideoError::Other(err.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, VideoError>;
