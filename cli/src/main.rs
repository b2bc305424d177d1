//! `autoheal` — auto-fix failing Appium identifiers using RAG + a hosted
//! model.
//!
//! Two entry points, matching the two pipeline flows:
//!
//! - `autoheal heal [--fail <name>] [--snapshot <path>]` — full flow ending
//!   in a pushed review branch.
//! - `autoheal validate --failure <summary> [--context <doc> ...]` — CI
//!   listener flow ending in a sandboxed patch run.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autoheal_core::{Config, Pipeline};

/// Default failing mapping used when `--fail` is not given (the simulated
/// failure from the sample flow).
const DEFAULT_FAILING_NAME: &str = "us.mappings.item.verifySelectLensesCTA";

#[derive(Debug, Parser)]
#[command(name = "autoheal", about = "Auto-fix failing Appium identifiers using RAG + LLM")]
struct Cli {
    /// Optional path to an autoheal.toml config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full heal flow and push the fix on a review branch.
    Heal(HealArgs),
    /// Generate a patch for a failure and execute it under the sandbox
    /// runner, without touching any repository.
    Validate(ValidateArgs),
}

#[derive(Debug, Parser)]
struct HealArgs {
    /// Name of the failing mapping.
    #[arg(long, default_value = DEFAULT_FAILING_NAME)]
    fail: String,

    /// Optional Appium Inspector XML snapshot file.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct ValidateArgs {
    /// One-line summary of the failure.
    #[arg(long)]
    failure: String,

    /// Past-failure documents to retrieve against (repeatable).
    #[arg(long = "context")]
    contexts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Heal(args) => heal(&config, args).await,
        Command::Validate(args) => validate(&config, args).await,
    }
}

async fn heal(config: &Config, args: HealArgs) -> Result<()> {
    println!("\n[FAILURE IDENTIFIED] {}", args.fail);

    let pipeline = Pipeline::new(config)?;
    let outcome = pipeline.heal(&args.fail, args.snapshot.as_deref()).await?;

    println!(
        "Current XPath: {}",
        outcome.old_identifier.as_deref().unwrap_or("<not found>")
    );
    println!("\n[LLM SUGGESTION]\n{}", outcome.suggestion);
    match (&outcome.new_identifier, outcome.applied) {
        (Some(identifier), true) => println!("\n[APPLIED FIX] {identifier}"),
        (Some(identifier), false) => println!("\n[KEPT PRIOR] {identifier}"),
        (None, _) => println!("\n[NO FIX] no locator in suggestion and no prior identifier"),
    }
    println!(
        "\nPR ready for {}. Please create a pull request for branch: {}",
        outcome.failing_name, outcome.branch
    );
    Ok(())
}

async fn validate(config: &Config, args: ValidateArgs) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let outcome = pipeline.validate(&args.failure, &args.contexts).await?;

    println!("Generated Patch:\n{}", outcome.patch);
    println!("Validation Result:");
    if outcome.validation.timed_out {
        println!("<killed: exceeded sandbox time limit>");
    } else {
        println!("{}", outcome.validation.stdout);
    }
    Ok(())
}
