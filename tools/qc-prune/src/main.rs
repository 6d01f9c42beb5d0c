//! QC-Prune: Quantum-Chain state pruning tool
//!
//! ```text
//! qc-prune prune --home ~/.quantum-chain --pruning custom \
//!     --pruning-keep-recent 100 --pruning-interval 10
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qc_18_state_pruning::EnvConfigSource;
use qc_prune::{run_prune, Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout stays clean for --json)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Prune(args) => {
            let report = run_prune(&args, EnvConfigSource::from_env())?;
            println!("{}", report.render(args.json)?);
        }
    }

    Ok(())
}
