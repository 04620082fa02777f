//! Print summary counts for a validated dataset file.

use anyhow::{Context, Result};
use clap::Parser;
use relkb::load::load_file;
use relkb::{Config, KnowledgeBase, Validator};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Validate a dataset file and print section, tab, contact and graph counts")]
struct Args {
    /// Dataset file (.json, .yaml, .yml)
    path: PathBuf,

    /// Print counts as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.logging.log_level.as_str()),
    )
    .init();

    let raw = load_file(&args.path)
        .with_context(|| format!("Failed to load dataset: {}", args.path.display()))?;
    let validator = Validator::with_options(config.validator_options());

    let kb = match KnowledgeBase::from_result(validator.validate(&raw)) {
        Ok(kb) => kb,
        Err(findings) => {
            for finding in &findings {
                eprintln!("{}", finding);
            }
            anyhow::bail!(
                "{} is not a valid dataset ({} findings)",
                args.path.display(),
                findings.len()
            );
        }
    };

    let stats = kb.stats();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n=== Knowledge Base Statistics ===\n");
    if let Some(title) = &kb.dataset().title {
        println!("Title:    {}", title);
    }
    println!("Revision: {}", kb.revision());
    println!("{}", stats);

    if !kb.warnings().is_empty() {
        println!("\nWarnings:");
        for warning in kb.warnings() {
            println!("  {}", warning);
        }
    }
    println!();

    Ok(())
}
