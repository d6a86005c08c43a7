//! Python dependency installation — uv-first, pip alternative.
//!
//! Every call-site that needs to install packages for a generated service
//! goes through these helpers so the manager strategy is defined in one
//! place. `uv pip install` is the default; `pip install` is the explicit
//! alternative.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Which Python package manager performs the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PkgManager {
    Uv,
    Pip,
}

impl PkgManager {
    /// The binary invoked for installs.
    pub fn bin(&self) -> &'static str {
        match self {
            PkgManager::Uv => "uv",
            PkgManager::Pip => "pip",
        }
    }

    /// Arguments for installing a single package.
    pub fn install_args(&self, package: &str) -> Vec<String> {
        match self {
            PkgManager::Uv => vec!["pip".into(), "install".into(), package.into()],
            PkgManager::Pip => vec!["install".into(), package.into()],
        }
    }

    /// Arguments for installing from a requirements file.
    pub fn requirements_args(&self, requirements: &Path) -> Vec<String> {
        let file = requirements.display().to_string();
        match self {
            PkgManager::Uv => vec!["pip".into(), "install".into(), "-r".into(), file],
            PkgManager::Pip => vec!["install".into(), "-r".into(), file],
        }
    }
}

/// Detect whether a manager binary is available on the host.
pub async fn available(manager: PkgManager) -> bool {
    Command::new(manager.bin())
        .arg("--version")
        .output()
        .await
        .is_ok_and(|o| o.status.success())
}

/// Installation failures that abort the whole operation.
///
/// Per-package failures do **not** abort — they are collected into the
/// [`InstallReport`] so one bad package never blocks the rest.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("'{0}' is not installed or not on PATH")]
    ManagerUnavailable(&'static str),

    #[error("requirements file not found: {path}")]
    RequirementsNotFound { path: PathBuf },

    #[error("failed to run '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("'{command}' failed: {detail}")]
    CommandFailed { command: String, detail: String },
}

/// Outcome of one package install attempt.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub package: String,
    pub success: bool,
    /// Stderr tail on failure, empty on success.
    pub detail: String,
}

/// Aggregated per-package results.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub outcomes: Vec<InstallOutcome>,
}

impl InstallReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &InstallOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// Installs Python dependencies through the chosen manager.
pub struct PackageInstaller {
    manager: PkgManager,
}

impl PackageInstaller {
    pub fn new(manager: PkgManager) -> Self {
        Self { manager }
    }

    /// Install a list of packages, collecting per-package outcomes.
    #[instrument(skip(self), fields(manager = self.manager.bin()))]
    pub async fn install_packages(&self, packages: &[String]) -> Result<InstallReport, InstallError> {
        self.ensure_available().await?;

        let mut report = InstallReport::default();
        for package in packages {
            info!(package, "Installing package");
            let outcome = self.install_one(package).await?;
            if outcome.success {
                info!(package, "Package installed");
            } else {
                warn!(package, detail = %outcome.detail, "Package install failed");
            }
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Install from a requirements file in a single manager invocation.
    #[instrument(skip(self), fields(manager = self.manager.bin()))]
    pub async fn install_requirements(&self, requirements: &Path) -> Result<(), InstallError> {
        if !requirements.is_file() {
            return Err(InstallError::RequirementsNotFound {
                path: requirements.to_path_buf(),
            });
        }
        self.ensure_available().await?;

        let args = self.manager.requirements_args(requirements);
        let command = format!("{} {}", self.manager.bin(), args.join(" "));
        info!(%command, "Installing requirements");

        let output = Command::new(self.manager.bin())
            .args(&args)
            .output()
            .await
            .map_err(|source| InstallError::Io {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InstallError::CommandFailed {
                command,
                detail: stderr_tail(&output.stderr),
            });
        }
        info!("Requirements installed");
        Ok(())
    }

    async fn ensure_available(&self) -> Result<(), InstallError> {
        if available(self.manager).await {
            Ok(())
        } else {
            Err(InstallError::ManagerUnavailable(self.manager.bin()))
        }
    }

    async fn install_one(&self, package: &str) -> Result<InstallOutcome, InstallError> {
        let args = self.manager.install_args(package);
        let command = format!("{} {}", self.manager.bin(), args.join(" "));

        let output = Command::new(self.manager.bin())
            .args(&args)
            .output()
            .await
            .map_err(|source| InstallError::Io {
                command,
                source,
            })?;

        Ok(InstallOutcome {
            package: package.to_string(),
            success: output.status.success(),
            detail: if output.status.success() {
                String::new()
            } else {
                stderr_tail(&output.stderr)
            },
        })
    }
}

/// Readable slice of stderr, enough to diagnose without flooding the terminal.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "unknown error".to_string();
    }
    match trimmed.char_indices().nth(500) {
        Some((idx, _)) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_install_args() {
        assert_eq!(
            PkgManager::Uv.install_args("fastapi"),
            vec!["pip", "install", "fastapi"]
        );
    }

    #[test]
    fn pip_install_args() {
        assert_eq!(
            PkgManager::Pip.install_args("uvicorn"),
            vec!["install", "uvicorn"]
        );
    }

    #[test]
    fn uv_requirements_args() {
        assert_eq!(
            PkgManager::Uv.requirements_args(Path::new("requirements.txt")),
            vec!["pip", "install", "-r", "requirements.txt"]
        );
    }

    #[test]
    fn pip_requirements_args() {
        assert_eq!(
            PkgManager::Pip.requirements_args(Path::new("reqs/dev.txt")),
            vec!["install", "-r", "reqs/dev.txt"]
        );
    }

    #[test]
    fn report_aggregates_failures() {
        let report = InstallReport {
            outcomes: vec![
                InstallOutcome {
                    package: "a".into(),
                    success: true,
                    detail: String::new(),
                },
                InstallOutcome {
                    package: "b".into(),
                    success: false,
                    detail: "no matching version".into(),
                },
            ],
        };
        assert!(!report.all_succeeded());
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.failed().next().unwrap().package, "b");
    }

    #[tokio::test]
    async fn missing_requirements_file_is_an_error() {
        let installer = PackageInstaller::new(PkgManager::Uv);
        let err = installer
            .install_requirements(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::RequirementsNotFound { .. }));
    }

    #[test]
    fn stderr_tail_handles_empty_output() {
        assert_eq!(stderr_tail(b""), "unknown error");
        assert_eq!(stderr_tail(b"  \n"), "unknown error");
        assert_eq!(stderr_tail(b"boom"), "boom");
    }
}
