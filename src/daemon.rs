use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Configuration for daemonization
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Working directory for the daemon process
    pub working_directory: String,

    /// Path to stdout log file
    pub stdout_log: String,

    /// Path to stderr log file
    pub stderr_log: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            working_directory: ".".to_string(),
            stdout_log: "./logs/carecompare.out.log".to_string(),
            stderr_log: "./logs/carecompare.err.log".to_string(),
        }
    }
}

/// Daemonize the current process
///
/// Opens the log files, forks, detaches from the terminal and redirects
/// stdout/stderr. After this call the parent process has exited and the
/// child continues.
#[cfg(unix)]
pub fn daemonize(config: DaemonConfig) -> Result<()> {
    use daemonize::Daemonize;

    info!(
        "Daemonizing with working_dir: {}, stdout: {}, stderr: {}",
        config.working_directory, config.stdout_log, config.stderr_log
    );

    if let Some(parent) = Path::new(&config.stdout_log).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
    }

    let stdout = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.stdout_log)
        .with_context(|| format!("Failed to open stdout log file: {}", config.stdout_log))?;

    let stderr = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.stderr_log)
        .with_context(|| format!("Failed to open stderr log file: {}", config.stderr_log))?;

    let daemon = Daemonize::new()
        .working_directory(&config.working_directory)
        .stdout(stdout)
        .stderr(stderr);

    daemon.start().context("Failed to daemonize process")?;

    // We are now in the child; the parent has exited and file descriptors
    // point at the log files
    info!("Daemon process started successfully");
    info!(
        "Logs: stdout={}, stderr={}",
        config.stdout_log, config.stderr_log
    );

    Ok(())
}

/// Windows placeholder - daemonization not supported
#[cfg(not(unix))]
pub fn daemonize(_config: DaemonConfig) -> Result<()> {
    anyhow::bail!("Daemon mode is not supported on Windows. Run as a Windows Service instead.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_config_default() {
        let config = DaemonConfig::default();
        assert_eq!(config.working_directory, ".");
        assert_eq!(config.stdout_log, "./logs/carecompare.out.log");
        assert_eq!(config.stderr_log, "./logs/carecompare.err.log");
    }

    // Actual daemonization involves forking and process detachment and is
    // not unit-testable here
}
