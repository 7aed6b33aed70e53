use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod daemon;
mod pid;

use care_compare::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Initialize tracing/logging early (except for daemon mode)
    // In daemon mode, tracing is initialized after fork()
    let is_daemon_mode = matches!(args.get_command(), cli::Commands::Start { daemon: true, .. });

    if !is_daemon_mode {
        init_tracing();
    }

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Start { daemon, pid_file } => {
            commands::start::execute(&args.config, daemon, pid_file).await?;
        }
        cli::Commands::Stop {
            pid_file,
            force,
            timeout,
        } => {
            commands::stop::execute(pid_file, force, timeout).await?;
        }
        cli::Commands::Reload { pid_file } => {
            commands::reload::execute(pid_file).await?;
        }
        cli::Commands::Query(query_args) => {
            commands::query::execute(&args.config, &query_args)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Care Compare v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
