//! Implementation of the `mcpgen install` command.

use tracing::{info, instrument};

use mcpgen_adapters::installer::{PackageInstaller, PkgManager};

use crate::{
    cli::InstallArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `mcpgen install` command.
///
/// Either a requirements file or a package list must be given; per-package
/// failures are reported individually and turn into a single failing exit.
#[instrument(skip_all)]
pub async fn execute(args: InstallArgs, output: OutputManager) -> CliResult<()> {
    let manager = if args.pip {
        PkgManager::Pip
    } else {
        PkgManager::Uv
    };
    let installer = PackageInstaller::new(manager);

    if let Some(requirements) = &args.requirements {
        output.header(&format!(
            "Installing from {} with {}...",
            requirements.display(),
            manager.bin()
        ))?;
        installer.install_requirements(requirements).await?;
        output.success("Dependencies installed")?;
        return Ok(());
    }

    if args.packages.is_empty() {
        return Err(CliError::InvalidInput {
            message: "provide package names or a requirements file (-r)".into(),
        });
    }

    output.header(&format!(
        "Installing {} package(s) with {}...",
        args.packages.len(),
        manager.bin()
    ))?;

    let report = installer.install_packages(&args.packages).await?;
    for outcome in &report.outcomes {
        if outcome.success {
            output.success(&format!("{} installed", outcome.package))?;
        } else {
            output.error(&format!("{} failed: {}", outcome.package, outcome.detail))?;
        }
    }

    let failed = report.failed().count();
    if failed > 0 {
        return Err(CliError::PackagesFailed {
            failed,
            total: report.outcomes.len(),
        });
    }

    info!(count = report.outcomes.len(), "All packages installed");
    Ok(())
}
