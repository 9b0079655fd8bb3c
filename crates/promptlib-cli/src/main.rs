//! Prompt Library CLI
//!
//! Set up a prompt library, inspect pending changes and sync them with a git
//! remote.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("{}: {}", "hint".yellow().bold(), hint);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so `status --json` output stays clean. `RUST_LOG`
/// wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(verbose).with_writer(std::io::stderr))
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.clone() else {
        println!("{} Prompt Library CLI", "promptlib".green().bold());
        println!();
        println!("Run {} for available commands.", "promptlib --help".cyan());
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(&cli, command))
}

async fn execute_command(cli: &Cli, command: Commands) -> Result<()> {
    let mut sync = context::sync_service(cli)?;

    match command {
        Commands::Setup { remote, local } => {
            commands::run_setup(&mut sync, remote.as_deref(), local.as_deref()).await
        }
        Commands::Status { json } => commands::run_status(&sync, json).await,
        Commands::Diff => commands::run_diff(&sync).await,
        Commands::Pull { url, force } => commands::run_pull(&sync, url.as_deref(), force).await,
        Commands::Push {
            branch,
            message,
            yes,
        } => commands::run_push(&sync, branch.as_deref(), message.as_deref(), yes).await,
        Commands::Reset { all, yes } => commands::run_reset(&sync, all, yes).await,
        Commands::Sync { yes } => commands::run_sync(&sync, yes).await,
    }
}
