//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "mcpgen",
    bin_name = "mcpgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Generate MCP services from natural language",
    long_about = "mcpgen turns a natural-language description into a runnable \
                  MCP service file via an OpenAI-compatible completion endpoint, \
                  then launches it and installs its dependencies.",
    after_help = "EXAMPLES:\n\
        \x20 mcpgen generate \"a weather lookup service\" -o weather.py\n\
        \x20 mcpgen run ./weather.py --port 9000 --background\n\
        \x20 mcpgen install fastapi uvicorn\n\
        \x20 mcpgen config set model gpt-4",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate an MCP service from a description.
    #[command(
        visible_alias = "g",
        about = "Generate MCP service code",
        after_help = "EXAMPLES:\n\
            \x20 mcpgen generate \"an echo service\"\n\
            \x20 mcpgen generate \"a weather service\" -t skeleton.md -o weather.py\n\
            \x20 mcpgen generate \"a calculator\" --model gpt-4 -d ./services"
    )]
    Generate(GenerateArgs),

    /// Run a generated service.
    #[command(
        about = "Run a generated MCP service",
        after_help = "EXAMPLES:\n\
            \x20 mcpgen run ./mcp_service.py\n\
            \x20 mcpgen run ./weather.py --host 0.0.0.0 --port 9000\n\
            \x20 mcpgen run ./weather.py --background --log-dir ./logs"
    )]
    Run(RunArgs),

    /// Install Python dependencies for generated services.
    #[command(
        about = "Install Python packages",
        after_help = "EXAMPLES:\n\
            \x20 mcpgen install fastapi uvicorn\n\
            \x20 mcpgen install -r requirements.txt\n\
            \x20 mcpgen install mcp --pip"
    )]
    Install(InstallArgs),

    /// Manage the mcpgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 mcpgen config set api_key sk-...\n\
            \x20 mcpgen config show\n\
            \x20 mcpgen config reset"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `mcpgen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Natural-language description of the service to generate.
    #[arg(value_name = "DESCRIPTION", help = "What the service should do")]
    pub description: String,

    /// Output file name.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = "mcp_service.py",
        help = "Output filename"
    )]
    pub output: String,

    /// Output directory.
    #[arg(
        short = 'd',
        long = "directory",
        value_name = "DIR",
        default_value = "./",
        help = "Output directory"
    )]
    pub directory: PathBuf,

    /// Template reference (path or name; `.md` and `.py` are inferred).
    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        default_value = "example.md",
        help = "Template file path"
    )]
    pub template: String,

    /// API key override (highest precedence).
    #[arg(
        short = 'k',
        long = "api-key",
        value_name = "KEY",
        help = "API key, takes precedence over config file and environment"
    )]
    pub api_key: Option<String>,

    /// Model override (highest precedence).
    #[arg(
        short = 'm',
        long = "model",
        value_name = "MODEL",
        help = "Model name, takes precedence over config file and environment"
    )]
    pub model: Option<String>,

    /// Base URL override for OpenAI-compatible endpoints.
    #[arg(
        short = 'u',
        long = "base-url",
        value_name = "URL",
        help = "Completion endpoint base URL"
    )]
    pub base_url: Option<String>,
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Arguments for `mcpgen run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the generated script.
    #[arg(value_name = "SCRIPT", help = "Path to the service script")]
    pub script: PathBuf,

    /// Host forwarded to the service.
    #[arg(long = "host", value_name = "HOST", help = "Bind host passed to the service")]
    pub host: Option<String>,

    /// Port forwarded to the service.
    #[arg(long = "port", value_name = "PORT", help = "Bind port passed to the service")]
    pub port: Option<u16>,

    /// Run with `python` instead of `uv run`.
    #[arg(long = "python", help = "Use python instead of uv to run")]
    pub python: bool,

    /// Detach from the service after a successful spawn.
    #[arg(long = "background", help = "Do not wait for the service to exit")]
    pub background: bool,

    /// Directory receiving `<script>.log` files.
    #[arg(
        long = "log-dir",
        value_name = "DIR",
        default_value = "./service_logs",
        help = "Log directory"
    )]
    pub log_dir: PathBuf,
}

// ── install ───────────────────────────────────────────────────────────────────

/// Arguments for `mcpgen install`.
#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Packages to install.
    #[arg(value_name = "PACKAGE", help = "Package names to install")]
    pub packages: Vec<String>,

    /// Install from a requirements file instead.
    #[arg(
        short = 'r',
        long = "requirements",
        value_name = "FILE",
        conflicts_with = "packages",
        help = "Path to a requirements file"
    )]
    pub requirements: Option<PathBuf>,

    /// Use pip instead of the default uv.
    #[arg(long = "pip", help = "Use pip instead of uv")]
    pub pip: bool,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `mcpgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration key to a value.
    Set {
        /// Key: `api_key`, `model`, or `base_url`.
        key: String,
        /// New value.
        value: String,
    },
    /// Print the resolved configuration (API key masked).
    Show,
    /// Delete the configuration file, restoring built-in defaults.
    Reset,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "mcpgen",
            "generate",
            "an echo service",
            "-o",
            "echo.py",
            "--model",
            "gpt-4",
        ]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.description, "an echo service");
                assert_eq!(args.output, "echo.py");
                assert_eq!(args.model.as_deref(), Some("gpt-4"));
                // Defaults
                assert_eq!(args.template, "example.md");
                assert_eq!(args.directory, PathBuf::from("./"));
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn parse_run_command_with_host_port() {
        let cli = Cli::parse_from([
            "mcpgen", "run", "svc.py", "--host", "0.0.0.0", "--port", "9000", "--background",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.script, PathBuf::from("svc.py"));
                assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(9000));
                assert!(args.background);
                assert!(!args.python);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn parse_install_with_multiple_packages() {
        let cli = Cli::parse_from(["mcpgen", "install", "fastapi", "uvicorn"]);
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.packages, vec!["fastapi", "uvicorn"]);
                assert!(args.requirements.is_none());
            }
            other => panic!("expected Install, got {other:?}"),
        }
    }

    #[test]
    fn install_packages_conflict_with_requirements() {
        let result = Cli::try_parse_from(["mcpgen", "install", "fastapi", "-r", "reqs.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_config_set() {
        let cli = Cli::parse_from(["mcpgen", "config", "set", "model", "gpt-4"]);
        match cli.command {
            Commands::Config(ConfigCommands::Set { key, value }) => {
                assert_eq!(key, "model");
                assert_eq!(value, "gpt-4");
            }
            other => panic!("expected Config Set, got {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["mcpgen", "--quiet", "--verbose", "config", "show"]);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = Cli::try_parse_from(["mcpgen", "run", "svc.py", "--port", "99999"]);
        assert!(result.is_err());
    }
}
