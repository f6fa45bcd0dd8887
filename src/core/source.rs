//! Abstraction over where company information comes from
//!
//! Callers depend on [`CompanyInfoSource`] rather than on the HTTP client so
//! that search coordination can be exercised without a network.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Error types for a single completion exchange
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Response had no body")]
    EmptyBody,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse failure category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response arrived: network failure, timeout, non-2xx status or empty body
    Transport,
    /// A body arrived but did not have the expected shape
    Decode,
    /// The caller withdrew interest before delivery
    Cancelled,
}

impl CompletionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompletionError::Transport(_)
            | CompletionError::Status { .. }
            | CompletionError::EmptyBody => ErrorKind::Transport,
            CompletionError::Decode(_) => ErrorKind::Decode,
            CompletionError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Something that can answer a company lookup
#[async_trait]
pub trait CompanyInfoSource: Send + Sync {
    /// Fetch the raw markdown answer for `subject`
    ///
    /// Resolves to [`CompletionError::Cancelled`] if `cancel` fires before the
    /// answer is delivered.
    async fn fetch_company_info(
        &self,
        subject: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, CompletionError>;

    /// Get the source name
    fn source_name(&self) -> &str;
}
