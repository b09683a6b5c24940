//! GRANDTABLE CLI - Command-line interface
//!
//! Commands:
//! - table: Play the round-robin grand table and print the score matrix
//! - evolve: Run the replicator dynamic over a score matrix
//! - nash: Compute Nash equilibria of a score matrix with gambit
//! - run: Full experiment (table, then evolve, then nash)
//! - probe: Step one strategy through a scripted round and show its state

mod evolve_cmd;
mod experiment;
mod nash_cmd;
mod probe_cmd;
mod run_cmd;
mod table_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grandtable")]
#[command(about = "Repeated matrix game tournaments between learning strategies")]
struct Cli {
    /// Seed for every random source (omit for a fresh run)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the grand table and print the score matrix
    Table(table_cmd::TableArgs),
    /// Run the replicator dynamic over a grand table
    Evolve(evolve_cmd::EvolveArgs),
    /// Compute Nash equilibria of a grand table
    Nash(nash_cmd::NashArgs),
    /// Table, replicator dynamic and equilibria in one go
    Run(run_cmd::RunArgs),
    /// Initialise one strategy, play a scripted round and print its state
    Probe(probe_cmd::ProbeArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for reports and JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Table(args) => table_cmd::run(args, cli.seed),
        Commands::Evolve(args) => evolve_cmd::run(args, cli.seed),
        Commands::Nash(args) => nash_cmd::run(args, cli.seed),
        Commands::Run(args) => run_cmd::run(args, cli.seed),
        Commands::Probe(args) => probe_cmd::run(args, cli.seed),
    }
}
