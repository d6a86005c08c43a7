//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No API key was available when a completion was requested.
    ///
    /// Raised as a precondition check — no network call is attempted.
    #[error("no API key configured")]
    MissingApiKey,

    /// The completion endpoint was unreachable or returned a non-success
    /// response. Never retried here.
    #[error("completion request failed: {reason}")]
    CompletionFailed { reason: String },

    /// Generation produced no code worth writing.
    #[error("generation produced empty output")]
    EmptyGeneration,

    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingApiKey => vec![
                "Set an API key with: mcpgen config set api_key <KEY>".into(),
                "Or export OPENAI_API_KEY, or pass --api-key".into(),
            ],
            Self::CompletionFailed { reason } => vec![
                format!("The completion endpoint reported: {}", reason),
                "Check your network connection and base_url".into(),
                "Verify the configured model is available to your account".into(),
            ],
            Self::EmptyGeneration => vec![
                "The model produced nothing usable".into(),
                "Try a more specific description or a different template".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingApiKey => ErrorCategory::Configuration,
            Self::CompletionFailed { .. } => ErrorCategory::Internal,
            Self::EmptyGeneration => ErrorCategory::Internal,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
        }
    }
}
