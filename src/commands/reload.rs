use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use crate::pid::PidFile;

#[cfg(unix)]
use care_compare::signals::send_signal_to_pid;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;

/// Execute the reload command
///
/// Sends SIGHUP to the running process, which reloads configuration and
/// catalog without restarting the server
pub async fn execute(pid_file: Option<PathBuf>) -> Result<()> {
    #[cfg(not(unix))]
    {
        anyhow::bail!("Reload command is not supported on this platform");
    }

    #[cfg(unix)]
    {
        let pid = PidFile::read(pid_file)?;

        println!(
            "{} {}",
            "Reloading configuration and catalog".yellow(),
            format!("(PID: {})", pid).cyan()
        );
        info!("Sending SIGHUP to PID {} for reload", pid);

        send_signal_to_pid(pid, SignalKind::hangup())?;

        println!("{}", "  Reload signal sent successfully".green());
        println!(
            "  {}",
            "Note: Check server logs to verify reload succeeded".dimmed()
        );

        Ok(())
    }
}
