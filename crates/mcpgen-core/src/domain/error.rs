//! Domain-layer errors.
//!
//! Template parsing never fails (malformed input degrades to fewer
//! fragments), so the domain surface is small: input validation and
//! completion-response extraction.

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (callers may re-report them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The user asked to generate a service from an empty description.
    #[error("service description must not be empty")]
    EmptyDescription,

    /// The completion response contained neither fenced code blocks nor
    /// anything shaped like Python source.
    #[error("completion response contained no usable code")]
    NoCodeInResponse,
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyDescription => vec![
                "Describe the service you want in plain language".into(),
                "Example: mcpgen generate \"a weather lookup service\"".into(),
            ],
            Self::NoCodeInResponse => vec![
                "The model returned prose instead of code".into(),
                "Try rephrasing the description or switching models with --model".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyDescription => ErrorCategory::Validation,
            Self::NoCodeInResponse => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
