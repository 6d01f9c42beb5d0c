//! QC-Prune: state history pruning tool.
//!
//! Compacts the version history of a node's multi-store according to the
//! pruning options given by flags, `QC_*` environment variables or the
//! node's `config/app.toml` (in that order of precedence).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use qc_18_state_pruning::domain::config::{
    KEY_APP_DB_BACKEND, KEY_HOME, KEY_PRUNING, KEY_PRUNING_INTERVAL, KEY_PRUNING_KEEP_EVERY,
    KEY_PRUNING_KEEP_RECENT,
};
use qc_18_state_pruning::{
    resolve_policy, ConfigSource, EnvConfigSource, FileStoreProvider, FsDatabaseOpener,
    LayeredSource, MapSource, PruneOrchestrator, PruneOutcome, PruningConfig, PruningError,
    RetentionPolicy, TomlConfigSource,
};

const PRUNE_LONG_ABOUT: &str = "\
Prune history states based on the pruning options specified by flags.

Pruning options can be provided via the '--pruning' flag or alternatively with
'--pruning-keep-recent', '--pruning-keep-every' and '--pruning-interval' together.

For '--pruning' the options are as follows:

default: the last 362880 states are kept, pruning at 10 block intervals
nothing: all historic states will be saved, nothing will be deleted (i.e. archiving node)
everything: 2 latest states will be kept; pruning at 10 block intervals
custom: allow pruning options to be manually specified through 'pruning-keep-recent',
        'pruning-keep-every' and 'pruning-interval'";

/// QC-Prune: compact multi-store version history
#[derive(Parser, Debug)]
#[command(name = "qc-prune")]
#[command(about = "Prune historical state versions of a Quantum-Chain node")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prune history states based on the pruning options
    #[command(long_about = PRUNE_LONG_ABOUT)]
    Prune(PruneArgs),
}

#[derive(Args, Debug, Default)]
pub struct PruneArgs {
    /// The database home directory
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Pruning strategy (default|nothing|everything|custom)
    #[arg(long)]
    pub pruning: Option<String>,

    /// Number of recent heights to keep on disk (ignored if pruning is not 'custom')
    #[arg(long)]
    pub pruning_keep_recent: Option<u64>,

    /// Keep every Nth height in addition to the recent ones (ignored if pruning is not 'custom')
    #[arg(long)]
    pub pruning_keep_every: Option<u64>,

    /// Height interval at which pruned heights are removed from disk (ignored if pruning is not 'custom')
    #[arg(long)]
    pub pruning_interval: Option<u64>,

    /// The backend db type
    #[arg(long)]
    pub app_db_backend: Option<String>,

    /// Resolve and print the policy without opening the database
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PruneArgs {
    /// Flags that were given on the command line, as a config layer.
    pub fn flag_source(&self) -> MapSource {
        let mut flags = MapSource::new("flags");
        if let Some(home) = &self.home {
            flags.set(KEY_HOME, home.display().to_string());
        }
        if let Some(pruning) = &self.pruning {
            flags.set(KEY_PRUNING, pruning.as_str());
        }
        if let Some(v) = self.pruning_keep_recent {
            flags.set(KEY_PRUNING_KEEP_RECENT, v);
        }
        if let Some(v) = self.pruning_keep_every {
            flags.set(KEY_PRUNING_KEEP_EVERY, v);
        }
        if let Some(v) = self.pruning_interval {
            flags.set(KEY_PRUNING_INTERVAL, v);
        }
        if let Some(backend) = &self.app_db_backend {
            flags.set(KEY_APP_DB_BACKEND, backend.as_str());
        }
        flags
    }
}

/// Build the pruning config from flags, environment and `<home>/config/app.toml`.
pub fn load_config(args: &PruneArgs, env: EnvConfigSource) -> Result<PruningConfig, PruningError> {
    let flags = args.flag_source();
    let home = flags
        .get(KEY_HOME)
        .or_else(|| env.get(KEY_HOME))
        .map(|home| PathBuf::from(home.to_text()));

    let mut layers = LayeredSource::new().push(flags).push(env);
    if let Some(home) = home.filter(|h| !h.as_os_str().is_empty()) {
        let file = TomlConfigSource::load_from_home(&home)?;
        debug!(home = %home.display(), empty = file.is_empty(), "Loaded app.toml layer");
        layers = layers.push(file);
    }
    debug!(layers = layers.len(), "Config layers assembled");
    PruningConfig::from_source(&layers)
}

/// What a `prune` invocation produced.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Report {
    /// `--dry-run`: the policy that would be used.
    Checked { policy: RetentionPolicy },
    Pruned(PruneOutcome),
}

impl Report {
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return serde_json::to_string_pretty(self).context("failed to encode report");
        }
        Ok(match self {
            Report::Checked { policy } => format!("pruning policy: {}", policy),
            Report::Pruned(outcome) => format!(
                "pruned {} version(s) up to height {} with {}; {} version(s) retained",
                outcome.pruned_count(),
                outcome.latest_version,
                outcome.policy,
                outcome.retained_versions
            ),
        })
    }
}

/// Execute `qc-prune prune`.
pub fn run_prune(args: &PruneArgs, env: EnvConfigSource) -> Result<Report> {
    let config = load_config(args, env)?;
    // pre-flight check before any I/O
    let policy = resolve_policy(&config)?;

    if args.dry_run {
        info!(%policy, "Dry run, database not opened");
        return Ok(Report::Checked { policy });
    }

    info!(home = %config.home.display(), %policy, "Pruning state history");

    // the current config replaces whatever policy the last run persisted
    let provider = FileStoreProvider::new().with_config_policy();
    let orchestrator = PruneOrchestrator::new(FsDatabaseOpener, provider);
    let outcome = orchestrator
        .run(&config)
        .with_context(|| format!("failed to prune {}", config.home.display()))?;
    Ok(Report::Pruned(outcome))
}
