use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;

pub const DEFAULT_TICK_MS: u64 = 16;
pub const MAX_TICK_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(name = "minicade")]
#[command(about = "Terminal mini-game suite: planet memory, boss quiz and sky defense")]
pub struct Cli {
    /// Seed every game's RNG for a reproducible session
    #[arg(long, env = "MINICADE_SEED")]
    pub seed: Option<u64>,
    /// Milliseconds between ticks when no key arrives
    #[arg(long, env = "MINICADE_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,
    /// Start on the game gallery without the title animation
    #[arg(long)]
    pub skip_intro: bool,
    /// Write tracing output to this file (filter with RUST_LOG)
    #[arg(long, env = "MINICADE_LOG")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub seed: Option<u64>,
    pub tick_ms: u64,
    pub skip_intro: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
            skip_intro: false,
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.tick_ms == 0 || cli.tick_ms > MAX_TICK_MS {
            bail!("--tick-ms must be between 1 and {MAX_TICK_MS}, got {}", cli.tick_ms);
        }
        Ok(Self {
            seed: cli.seed,
            tick_ms: cli.tick_ms,
            skip_intro: cli.skip_intro,
            log_file: cli.log_file,
        })
    }
}

/// The terminal belongs to the TUI, so logs only go to a file when asked.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
    Ok(())
}
