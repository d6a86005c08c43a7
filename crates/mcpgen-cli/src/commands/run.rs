//! Implementation of the `mcpgen run` command.
//!
//! Translates CLI arguments into [`LaunchOptions`] and reports the outcome.
//! Supervision is out of scope: a background run ends at "spawned", a
//! foreground run ends when the child exits.

use tracing::{info, instrument};

use mcpgen_adapters::runner::{LaunchOptions, ServiceRunner};

use crate::{
    cli::{RunArgs, global::GlobalArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `mcpgen run` command.
#[instrument(skip_all, fields(script = %args.script.display()))]
pub async fn execute(args: RunArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let options = LaunchOptions {
        host: args.host.clone(),
        port: args.port,
        use_python: args.python,
        background: args.background,
    };

    let runner = ServiceRunner::new(&args.log_dir);
    let runner_name = if args.python { "python" } else { "uv" };

    output.header(&format!(
        "Starting {} with {runner_name}...",
        args.script.display()
    ))?;

    let launched = runner.start(&args.script, &options).await?;

    match launched.status {
        // Background: report the pid and where the logs went.
        None => {
            let pid = launched
                .pid
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown".into());
            info!(pid = %pid, "Service detached");
            output.success(&format!("Service started in background (PID {pid})"))?;
            output.print(&format!("  Logs: {}", launched.log_file.display()))?;
            if !global.quiet {
                output.print("")?;
                output.print(&format!("Stop it with: kill {pid}"))?;
            }
            Ok(())
        }
        // Foreground: the child already ran to completion.
        Some(status) if status.success() => {
            output.success("Service exited cleanly")?;
            Ok(())
        }
        Some(status) => {
            output.error(&format!("Service failed ({status})"))?;
            output.print(&format!("  Logs: {}", launched.log_file.display()))?;
            Err(CliError::ServiceFailed {
                status: status.to_string(),
            })
        }
    }
}
