use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    centrality::{self, CentralityArgs},
    shock::{self, ShockArgs},
};
use tracing_subscriber::EnvFilter;

mod bundle;
mod commands;

#[derive(Parser, Debug)]
#[command(name = "fnet", about = "DebtRank analysis of financial exposure networks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute DebtRank centrality for every node of a network bundle.
    Centrality(CentralityArgs),
    /// Shock selected nodes and record the induced distress.
    Shock(ShockArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Centrality(args) => centrality::run(&args),
        Command::Shock(args) => shock::run(&args),
    }
}

fn write_json<P: AsRef<Path>, T: serde::Serialize>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
