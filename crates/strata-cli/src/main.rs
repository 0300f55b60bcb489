//! CLI frontend for the Strata population engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: ephemeral population lifecycle engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log filter (e.g. `strata=debug`). Falls back to RUST_LOG, then `warn`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run populations over a generated demo world
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Demo map width in tiles
        #[arg(long, default_value = "48")]
        width: u32,

        /// Demo map height in tiles
        #[arg(long, default_value = "24")]
        height: u32,

        /// Number of creatures in the demo world
        #[arg(long, default_value = "12")]
        creatures: usize,

        /// Population catalog file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Only run these populations (repeatable)
        #[arg(short, long = "population")]
        populations: Vec<String>,

        /// Show every event (not just the summary)
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the populations in a catalog
    Presets {
        /// Population catalog file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Print one population spec as JSON
    Show {
        /// Population name
        name: String,

        /// Population catalog file (default: built-in catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let result = match cli.command {
        Commands::Simulate {
            ticks,
            seed,
            width,
            height,
            creatures,
            catalog,
            populations,
            verbose,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            ticks,
            seed,
            width,
            height,
            creatures,
            catalog,
            populations,
            verbose,
        }),
        Commands::Presets { catalog } => commands::presets::run(catalog.as_deref()),
        Commands::Show { name, catalog } => commands::show::run(catalog.as_deref(), &name),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
