//! Core domain layer for mcpgen.
//!
//! Pure text transformation with zero I/O:
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **No external crates**: std + thiserror + serde derives only
//!
//! Network, filesystem, and process concerns are reached through ports
//! (traits) defined in the application layer.

pub mod error;
pub mod prompt;
pub mod template;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use template::{Fragment, FrontMatter, Template};
