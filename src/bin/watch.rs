//! Watch a dataset directory and re-validate files as they are edited.

use anyhow::{Context, Result};
use clap::Parser;
use relkb::watch::run_watcher;
use relkb::{Config, Validator};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "watch")]
#[command(about = "Watch a dataset directory and re-validate changed files")]
struct Args {
    /// Directory containing dataset files
    dir: PathBuf,

    /// Debounce delay in milliseconds (defaults to watch.debounce_ms in relkb.toml)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Treat warnings as blocking
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.logging.log_level.as_str()),
    )
    .init();

    if !args.dir.is_dir() {
        anyhow::bail!("{} is not a directory", args.dir.display());
    }

    let debounce_ms = args.debounce_ms.unwrap_or(config.watch.debounce_ms);
    let strict = args.strict || config.validation.strict;

    log::info!("Starting relkb watcher v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Dataset root: {}", args.dir.display());
    log::info!("Debounce: {} ms", debounce_ms);
    log::info!("Watching for changes (Ctrl+C to stop)");

    let validator = Validator::with_options(config.validator_options());
    run_watcher(&args.dir, validator, strict, debounce_ms)
        .with_context(|| format!("Watcher stopped for {}", args.dir.display()))?;
    Ok(())
}
