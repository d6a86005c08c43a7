//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--api-key` / `--model` / `--base-url`)
//! 2. Config file (`[llm]` table in TOML)
//! 3. Environment variables (`OPENAI_API_KEY` / `OPENAI_MODEL` / `OPENAI_BASE_URL`)
//! 4. Built-in defaults (no default exists for the API key)
//!
//! [`AppConfig::load`] reads the file layer only; the environment is captured
//! separately in an [`EnvSnapshot`] and merged at [`AppConfig::resolve_llm`]
//! time so each layer stays independently testable.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mcpgen_adapters::llm::{DEFAULT_MODEL, LlmConfig};

/// Environment variable names recognised for the LLM layer.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Application configuration (file layer).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion-endpoint settings.
    #[serde(default)]
    pub llm: LlmSection,
}

/// `[llm]` table of the config file.  Every field is optional; resolution
/// fills the gaps from environment and defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// CLI flag overrides (highest precedence layer).
#[derive(Debug, Clone, Default)]
pub struct LlmOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Environment layer, captured once so resolution is a pure function.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl EnvSnapshot {
    /// Read the recognised variables from the process environment.
    pub fn capture() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            api_key: var(ENV_API_KEY),
            model: var(ENV_MODEL),
            base_url: var(ENV_BASE_URL),
        }
    }
}

/// Fully resolved LLM settings.
///
/// `api_key` stays optional here: `config show` renders its absence, while
/// generation turns it into a precondition failure via [`Self::require_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLlm {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
}

impl ResolvedLlm {
    /// Convert into the adapter config value object, requiring a key.
    pub fn require_key(self) -> Option<LlmConfig> {
        let api_key = self.api_key?;
        Some(LlmConfig::new(api_key, self.model, self.base_url))
    }
}

impl AppConfig {
    /// Load configuration from the file layer.
    ///
    /// `config_file` is the path the user passed via `--config` (or `None`
    /// to use the default location).  A missing file is not an error — the
    /// defaults apply and, for an explicitly named file, a warning is logged.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let explicit = config_file.is_some();
        let path = config_file.cloned().unwrap_or_else(Self::config_path);

        if !path.exists() {
            if explicit {
                warn!(path = %path.display(), "Configuration file does not exist, using defaults");
            }
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config file '{}': {e}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config file '{}': {e}", path.display()))?;

        debug!(path = %path.display(), "Configuration file loaded");
        Ok(config)
    }

    /// Write this configuration to `path` as pretty TOML.
    pub fn save(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow::anyhow!("failed to create config directory '{}': {e}", parent.display())
                })?;
            }
        }
        let serialised = toml::to_string_pretty(self)?;
        std::fs::write(path, serialised)
            .map_err(|e| anyhow::anyhow!("failed to write config file '{}': {e}", path.display()))?;
        debug!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.mcpgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "mcpgen", "mcpgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".mcpgen.toml"))
    }

    /// Merge flag, file, environment, and default layers per key.
    pub fn resolve_llm(&self, overrides: &LlmOverrides, env: &EnvSnapshot) -> ResolvedLlm {
        ResolvedLlm {
            api_key: overrides
                .api_key
                .clone()
                .or_else(|| self.llm.api_key.clone())
                .or_else(|| env.api_key.clone()),
            model: overrides
                .model
                .clone()
                .or_else(|| self.llm.model.clone())
                .or_else(|| env.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: overrides
                .base_url
                .clone()
                .or_else(|| self.llm.base_url.clone())
                .or_else(|| env.base_url.clone()),
        }
    }
}

/// Mask an API key for display: last four characters only.
pub fn mask_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{}{}", "*".repeat(8), visible)
}

// ── tests ─────────────────────────────────────────────────────────────────────
