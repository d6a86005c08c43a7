//! Completion-endpoint adapters.

mod openai;

pub use openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmConfig, OpenAiClient};
