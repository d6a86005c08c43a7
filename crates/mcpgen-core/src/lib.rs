//! mcpgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the mcpgen
//! service generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           mcpgen-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │           (GenerateService)             │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: CompletionClient, Fs)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    mcpgen-adapters (Infrastructure)     │
//! │  (OpenAiClient, LocalFilesystem, etc)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │    (Template, Fragment, FrontMatter)    │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mcpgen_core::domain::Template;
//!
//! let template = Template::parse("# Imports\n```python\nimport mcp\n```\n");
//! let skeleton = template.assemble();
//! assert!(skeleton.starts_with("# Imports"));
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService,
        ports::{CompletionClient, CompletionRequest, Filesystem},
    };
    pub use crate::domain::{Fragment, FrontMatter, Template};
    pub use crate::error::{McpgenError, McpgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
