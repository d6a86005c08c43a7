//! Generated-service launcher.
//!
//! Spawns a generated script as a child process, `uv run`-first with a plain
//! `python` alternative. Stdout and stderr are appended to a per-script log
//! file so background services stay observable.
//!
//! There is deliberately no supervision here: the only lifecycle question
//! answered is "did the spawn succeed" (plus a best-effort pid probe for
//! background services).

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Default directory for service log files.
pub const DEFAULT_LOG_DIR: &str = "./service_logs";

/// How to launch a generated script.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Forwarded to the script as `--host`.
    pub host: Option<String>,
    /// Forwarded to the script as `--port`.
    pub port: Option<u16>,
    /// Use `python` instead of the default `uv run`.
    pub use_python: bool,
    /// Do not wait for the child; return immediately with its pid.
    pub background: bool,
}

/// Outcome of a successful spawn.
#[derive(Debug)]
pub struct LaunchedService {
    /// OS process id (present until the child has been reaped).
    pub pid: Option<u32>,
    /// Log file receiving the child's stdout and stderr.
    pub log_file: PathBuf,
    /// Exit status for foreground runs; `None` for background ones.
    pub status: Option<ExitStatus>,
}

/// Launch failures, each carrying the underlying OS error.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    #[error("failed to prepare log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Launches generated scripts and tracks their log files.
pub struct ServiceRunner {
    log_dir: PathBuf,
}

impl ServiceRunner {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    /// Spawn `script` according to `options`.
    ///
    /// Foreground runs block until the child exits; background runs return
    /// as soon as the spawn succeeds.
    #[instrument(skip(self), fields(script = %script.display()))]
    pub async fn start(
        &self,
        script: &Path,
        options: &LaunchOptions,
    ) -> Result<LaunchedService, LaunchError> {
        if !script.is_file() {
            return Err(LaunchError::ScriptNotFound {
                path: script.to_path_buf(),
            });
        }
        // The child runs with its cwd set to the script's directory, so the
        // path handed to the interpreter must not be relative to ours.
        let script = script
            .canonicalize()
            .map_err(|_| LaunchError::ScriptNotFound {
                path: script.to_path_buf(),
            })?;
        let script = script.as_path();

        let log_path = self.log_path(script)?;
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|source| LaunchError::LogFile {
                path: log_path.clone(),
                source,
            })?;
        let log_err = log_file.try_clone().map_err(|source| LaunchError::LogFile {
            path: log_path.clone(),
            source,
        })?;

        let (program, args) = build_command_line(script, options);
        let command_display = format!("{program} {}", args.join(" "));

        // The generated service conventionally resolves paths relative to
        // its own directory.
        let cwd = script
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut command = Command::new(&program);
        command
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(log_err));

        info!(command = %command_display, log = %log_path.display(), "Starting service");

        let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
            command: command_display.clone(),
            source,
        })?;
        let pid = child.id();

        if options.background {
            info!(pid, "Service started in background");
            return Ok(LaunchedService {
                pid,
                log_file: log_path,
                status: None,
            });
        }

        let status = child.wait().await.map_err(|source| LaunchError::Wait {
            command: command_display,
            source,
        })?;
        if !status.success() {
            warn!(%status, "Service exited with failure");
        }
        Ok(LaunchedService {
            pid,
            log_file: log_path,
            status: Some(status),
        })
    }

    /// Probe whether a background service is still alive.
    #[cfg(unix)]
    pub fn is_running(&self, pid: u32) -> bool {
        // kill(pid, 0) checks existence without delivering a signal.
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    #[cfg(not(unix))]
    pub fn is_running(&self, _pid: u32) -> bool {
        false
    }

    /// Ask a background service to terminate (SIGTERM).
    #[cfg(unix)]
    pub fn stop(&self, pid: u32) -> bool {
        let ok = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) == 0 };
        if ok {
            info!(pid, "Termination signal sent");
        } else {
            warn!(pid, "Failed to signal process");
        }
        ok
    }

    #[cfg(not(unix))]
    pub fn stop(&self, _pid: u32) -> bool {
        false
    }

    fn log_path(&self, script: &Path) -> Result<PathBuf, LaunchError> {
        std::fs::create_dir_all(&self.log_dir).map_err(|source| LaunchError::LogFile {
            path: self.log_dir.clone(),
            source,
        })?;
        let file_name = script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "service".to_string());
        Ok(self.log_dir.join(format!("{file_name}.log")))
    }
}

/// Translate launch options into a program + argument vector.
fn build_command_line(script: &Path, options: &LaunchOptions) -> (String, Vec<String>) {
    let mut args = Vec::new();
    let program = if options.use_python {
        "python".to_string()
    } else {
        args.push("run".to_string());
        "uv".to_string()
    };
    args.push(script.display().to_string());
    if let Some(host) = &options.host {
        args.push("--host".to_string());
        args.push(host.clone());
    }
    if let Some(port) = options.port {
        args.push("--port".to_string());
        args.push(port.to_string());
    }
    (program, args)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn uv_is_the_default_runner() {
        let (program, args) = build_command_line(Path::new("svc.py"), &LaunchOptions::default());
        assert_eq!(program, "uv");
        assert_eq!(args, vec!["run", "svc.py"]);
    }

    #[test]
    fn python_flag_switches_runner() {
        let options = LaunchOptions {
            use_python: true,
            ..Default::default()
        };
        let (program, args) = build_command_line(Path::new("svc.py"), &options);
        assert_eq!(program, "python");
        assert_eq!(args, vec!["svc.py"]);
    }

    #[test]
    fn host_and_port_are_forwarded() {
        let options = LaunchOptions {
            host: Some("127.0.0.1".into()),
            port: Some(9000),
            ..Default::default()
        };
        let (_, args) = build_command_line(Path::new("svc.py"), &options);
        assert_eq!(
            args,
            vec!["run", "svc.py", "--host", "127.0.0.1", "--port", "9000"]
        );
    }

    #[tokio::test]
    async fn missing_script_is_a_pre_spawn_error() {
        let temp = TempDir::new().unwrap();
        let runner = ServiceRunner::new(temp.path().join("logs"));
        let err = runner
            .start(&temp.path().join("absent.py"), &LaunchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::ScriptNotFound { .. }));
    }

    #[test]
    fn log_path_is_derived_from_script_name() {
        let temp = TempDir::new().unwrap();
        let runner = ServiceRunner::new(temp.path().join("logs"));
        let path = runner.log_path(Path::new("/x/y/svc.py")).unwrap();
        assert_eq!(path, temp.path().join("logs").join("svc.py.log"));
        assert!(temp.path().join("logs").exists(), "log dir must be created");
    }

    #[test]
    #[cfg(unix)]
    fn pid_probe_detects_a_live_process() {
        let runner = ServiceRunner::new("unused");
        assert!(runner.is_running(std::process::id()));
    }
}
