//! flappy-td CLI - Tabular temporal-difference agent for a headless flappy bird
//!
//! This CLI provides a unified interface for:
//! - Training the agent over many episodes
//! - Exporting learned utility tables
//! - Inspecting saved utility tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flappy-td")]
#[command(version, about = "Tabular TD agent that learns to play flappy bird", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent in the headless game
    Train(Box<flappy_td::cli::commands::train::TrainArgs>),

    /// Export a saved utility table
    Export(flappy_td::cli::commands::export::ExportArgs),

    /// Summarize a saved utility table
    Inspect(flappy_td::cli::commands::inspect::InspectArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "flappy_td=debug",
        _ => "flappy_td=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train(args) => flappy_td::cli::commands::train::execute(*args),
        Commands::Export(args) => flappy_td::cli::commands::export::execute(args),
        Commands::Inspect(args) => flappy_td::cli::commands::inspect::execute(args),
    }
}
