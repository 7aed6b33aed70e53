use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carecompare", version, about = "Healthcare provider cost comparison service")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "carecompare.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the comparison server (default)
    Start {
        /// Run in daemon mode (background process)
        #[arg(short, long)]
        daemon: bool,

        /// Path to PID file
        #[arg(short, long)]
        pid_file: Option<PathBuf>,
    },

    /// Stop a running server instance
    Stop {
        /// Path to PID file
        #[arg(short, long)]
        pid_file: Option<PathBuf>,

        /// Force kill if graceful shutdown times out
        #[arg(short, long)]
        force: bool,

        /// Timeout in seconds for graceful shutdown
        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },

    /// Reload configuration and catalog without restarting (sends SIGHUP)
    Reload {
        /// Path to PID file
        #[arg(short, long)]
        pid_file: Option<PathBuf>,
    },

    /// Run a one-shot comparison query against the configured catalog
    Query(QueryArgs),

    /// Test configuration and catalog validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Procedure CPT code
    #[arg(short, long)]
    pub procedure: String,

    /// Zip code (display only)
    #[arg(short, long)]
    pub zip: Option<String>,

    /// Search radius in miles
    #[arg(short, long, default_value = "10")]
    pub radius: u32,

    /// Only show hospitals rated above 4 stars
    #[arg(long)]
    pub hospital_rated: bool,

    /// Only show doctors rated above 4 stars
    #[arg(long)]
    pub doctor_rated: bool,

    /// Complementary add-on CPT code (repeatable)
    #[arg(short, long = "addon")]
    pub addons: Vec<String>,

    /// Output format: table or json
    #[arg(long, default_value = "table")]
    pub format: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start {
            daemon: false,
            pid_file: None,
        })
    }
}
