//! Validate one dataset file, or every dataset file under a directory.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use relkb::load::{discover_datasets, FormatRegistry};
use relkb::report::{check_file, FileReport};
use relkb::{Config, Validator};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "relkb")]
#[command(about = "Validate relations knowledge-base datasets before they reach the renderer")]
struct Args {
    /// Dataset file or directory of dataset files
    path: PathBuf,

    /// Output format for findings
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Treat warnings as blocking (overrides validation.strict in relkb.toml)
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

    let strict = args.strict || config.validation.strict;
    let validator = Validator::with_options(config.validator_options());
    let registry = FormatRegistry::new();

    let files = discover_datasets(&args.path, &registry)?;
    if files.is_empty() {
        log::warn!("No dataset files found under {}", args.path.display());
        return Ok(());
    }

    let mut reports: Vec<FileReport> = Vec::new();
    let mut unreadable = 0;
    for file in &files {
        match check_file(&registry, &validator, &file.absolute_path, &file.relative_path) {
            Ok(report) => reports.push(report),
            Err(e) => {
                log::error!("{}: {}", file.relative_path, e);
                unreadable += 1;
            }
        }
    }

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", report);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    let blocked = reports.iter().filter(|r| r.blocks(strict)).count() + unreadable;
    if blocked > 0 {
        log::error!("{} of {} dataset files rejected", blocked, files.len());
        std::process::exit(1);
    }

    Ok(())
}
