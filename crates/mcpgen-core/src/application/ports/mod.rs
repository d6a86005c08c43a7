//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `mcpgen-adapters` crate provides implementations.

use std::path::Path;

use async_trait::async_trait;

use crate::error::McpgenResult;

/// One chat-completion exchange.
///
/// The model name is adapter configuration, not part of the request: each
/// client instance is constructed with an explicit config value object and
/// serves exactly one model/endpoint pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction framing the exchange.
    pub system: String,
    /// User prompt (description + template skeleton).
    pub user: String,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Port for chat-completion endpoints.
///
/// Implemented by:
/// - `mcpgen_adapters::llm::OpenAiClient` (production, OpenAI-compatible)
///
/// One call per generation; retry policy is deliberately out of scope — a
/// failed completion surfaces to the caller as a generation failure.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one completion request and return the assistant's text.
    async fn complete(&self, request: &CompletionRequest) -> McpgenResult<String>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `mcpgen_adapters::filesystem::LocalFilesystem` (production)
/// - `mcpgen_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> McpgenResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> McpgenResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}
