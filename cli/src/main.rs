//! cubedh CLI
//!
//! Runs and replays tensor key exchanges and checks golden vectors.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check_mode, replay, run_exchanges, ParamArgs};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "cubedh")]
#[command(about = "Symmetric key exchange from commuting tensor actions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    params: ParamArgs,

    /// Number of independent exchanges to run (in parallel)
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Print the public tensor, both secrets and all intermediate tensors
    #[arg(long, global = true)]
    dump: bool,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-run an exchange from explicit hex seeds
    Replay {
        /// Public tensor seed (hex)
        #[arg(long, value_name = "HEX")]
        tensor_seed: String,
        /// Party 1 secret seed (hex)
        #[arg(long, value_name = "HEX")]
        seed_a: String,
        /// Party 2 secret seed (hex)
        #[arg(long, value_name = "HEX")]
        seed_b: String,
    },
    /// Verify golden vectors from a JSON file
    Check {
        #[arg(value_name = "FILE")]
        vectors_file: PathBuf,
    },
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match &cli.command {
        Some(Commands::Replay {
            tensor_seed,
            seed_a,
            seed_b,
        }) => replay(cli.params.resolve()?, tensor_seed, seed_a, seed_b, cli.dump)?,
        Some(Commands::Check { vectors_file }) => check_mode(vectors_file)?,
        None => run_exchanges(cli.params.resolve()?, cli.runs, cli.dump)?,
    }

    Ok(())
}
