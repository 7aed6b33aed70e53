use anyhow::Result;
use care_compare::{config, init_tracing, server};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{daemon, pid::PidFile};

/// Execute the start command
///
/// This will:
/// 1. Optionally daemonize first (before any file I/O)
/// 2. Load configuration
/// 3. Create PID file
/// 4. Start the server
pub async fn execute(config_path: &Path, daemon_mode: bool, pid_file: Option<PathBuf>) -> Result<()> {
    if daemon_mode {
        // Tokio's runtime does not survive fork() on macOS
        #[cfg(target_os = "macos")]
        {
            eprintln!("ERROR: Daemon mode is not supported on macOS.");
            eprintln!();
            eprintln!("Run in foreground mode, or use launchd/screen/tmux for background execution.");
            return Err(anyhow::anyhow!("Daemon mode not supported on macOS"));
        }

        println!("Starting server in daemon mode...");
        println!("  Logs: ./logs/carecompare.{{out,err}}.log");

        // Daemonize before loading config or creating the PID file
        daemon::daemonize(daemon::DaemonConfig::default())?;

        // We are now in the child process; initialize tracing after fork()
        init_tracing();
    } else {
        println!("{}", "Starting server in foreground mode...".green());
    }

    // Load configuration
    let cfg = config::load_config(config_path)?;

    if daemon_mode {
        info!("Starting Care Compare in daemon mode");
    } else {
        info!("Starting Care Compare in foreground mode");
    }

    // Create PID file to prevent multiple instances
    let _pid_file = PidFile::create(pid_file)?;

    // Start the server (blocks until shutdown)
    server::start_server(cfg, config_path.to_path_buf()).await?;

    Ok(())
}
