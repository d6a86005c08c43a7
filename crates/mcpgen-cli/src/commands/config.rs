//! `mcpgen config` — read and write configuration values.
//!
//! `set` and `reset` operate on the config *file* only; `show` prints the
//! fully resolved view (file + environment + defaults) so users see exactly
//! what a generation run would use.

use std::path::PathBuf;

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, EnvSnapshot, LlmOverrides, mask_key},
    error::{CliError, CliResult, IntoCli as _},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    config_file: Option<&PathBuf>,
    output: OutputManager,
) -> CliResult<()> {
    let path = config_file.cloned().unwrap_or_else(AppConfig::config_path);

    match cmd {
        ConfigCommands::Set { key, value } => {
            let mut config = config;
            set_config_value(&mut config, &key, value)?;
            config.save(&path).map_err(|e| CliError::ConfigError {
                message: format!("failed to save configuration: {e}"),
                source: None,
            })?;
            output.success(&format!("Set {key} in {}", path.display()))?;
        }

        ConfigCommands::Show => {
            let resolved = config.resolve_llm(&LlmOverrides::default(), &EnvSnapshot::capture());

            output.header("LLM configuration:")?;
            let key_display = match &resolved.api_key {
                Some(k) => mask_key(k),
                None => "Not set".into(),
            };
            output.print(&format!("  API key:  {key_display}"))?;
            output.print(&format!("  Model:    {}", resolved.model))?;
            output.print(&format!(
                "  Base URL: {}",
                resolved.base_url.as_deref().unwrap_or("(default OpenAI)")
            ))?;
            output.print("")?;
            output.print(&format!("Config file: {}", path.display()))?;
        }

        ConfigCommands::Reset => {
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_cli_context(|| format!("failed to remove '{}'", path.display()))?;
                output.success(&format!("Removed {}", path.display()))?;
            } else {
                output.info("No configuration file to remove; defaults already active")?;
            }
        }

        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn set_config_value(config: &mut AppConfig, key: &str, value: String) -> CliResult<()> {
    match key {
        "api_key" => config.llm.api_key = Some(value),
        "model" => config.llm.model = Some(value),
        "base_url" => config.llm.base_url = Some(value),
        _ => {
            return Err(CliError::ConfigError {
                message: format!("unknown config key '{key}' (expected api_key, model, base_url)"),
                source: None,
            });
        }
    }
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
