//! tselect - change-impact test selection CLI.
//!
//! ## Commands
//!
//! - `run`: select and (optionally) execute the tests affected by a change
//! - `baseline`: record a full-suite reference duration

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use tselect_core::{init_tracing, Invocation, RunSummary};
use tselect_runner::{
    changed_files, load_catalog, load_ownership, record_baseline, FsBaselineStore, PytestRunner,
    SelectionPipeline,
};

#[derive(Parser)]
#[command(name = "tselect")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Change-impact test selection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON log lines and a JSON summary block
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select tests affected by changed files
    Run {
        /// Changed files (auto-detected via git diff when omitted)
        #[arg(long, num_args = 1..)]
        changed: Option<Vec<String>>,

        /// Execute the selected tests instead of only previewing the command
        #[arg(long)]
        execute: bool,

        /// Ownership rules document (component -> path prefixes)
        #[arg(long, default_value = "ownership.json")]
        rules: PathBuf,

        /// Test catalog document (test_root + component -> file -> class -> tests)
        #[arg(long, default_value = "config/test_catalog.json")]
        catalog: PathBuf,
    },

    /// Record a full-suite baseline timing
    Baseline {
        /// Execute the baseline run and overwrite the stored duration
        #[arg(long)]
        execute: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            changed,
            execute,
            rules,
            catalog,
        } => cmd_run(changed, execute, &rules, &catalog, cli.json).await,
        Commands::Baseline { execute } => cmd_baseline(execute).await,
    }
}

/// Select the affected tests and optionally execute them.
async fn cmd_run(
    changed: Option<Vec<String>>,
    execute: bool,
    rules_path: &Path,
    catalog_path: &Path,
    json_summary: bool,
) -> Result<()> {
    let repo_root = std::env::current_dir().context("failed to get current directory")?;

    let rules = load_ownership(&repo_root.join(rules_path))
        .context("failed to load ownership rules")?;
    let catalog =
        load_catalog(&repo_root.join(catalog_path)).context("failed to load test catalog")?;

    let changed: BTreeSet<String> = match changed {
        Some(paths) => paths.into_iter().collect(),
        None => {
            info!("no --changed provided, detecting via git diff");
            match changed_files(&repo_root) {
                Ok(files) => files,
                Err(e) => {
                    warn!(error = %e, "changed-file detection failed, treating as no changes");
                    BTreeSet::new()
                }
            }
        }
    };

    println!("\nDetected changed files:");
    for file in &changed {
        println!("- {file}");
    }

    let store = FsBaselineStore::new(&repo_root);
    let pipeline = SelectionPipeline::new(&rules, &catalog, &store);
    let plan = pipeline.plan(changed)?;

    println!("\nAffected components:");
    for component in &plan.components {
        println!("- {component}");
    }

    println!("\nSelected classes:");
    for class in &plan.selected {
        println!("- {class}");
    }
    println!("\nTotal tests inside classes: {}", plan.total_tests);

    println!("\n{}", plan.invocation.render_preview("tselect run --execute"));

    if !execute {
        return Ok(());
    }

    let runner = PytestRunner::new(&repo_root);
    let summary = pipeline.execute(&plan, &runner).await?;
    print_summary(&summary, json_summary)?;

    Ok(())
}

/// Print or record the full-suite baseline.
async fn cmd_baseline(execute: bool) -> Result<()> {
    let repo_root = std::env::current_dir().context("failed to get current directory")?;
    let invocation = Invocation::baseline();

    println!("\n=== BASELINE COMMAND ===");
    println!("{}", invocation.command_line());

    if !execute {
        println!("\nUse:");
        println!("tselect baseline --execute");
        return Ok(());
    }

    let runner = PytestRunner::new(&repo_root);
    let store = FsBaselineStore::new(&repo_root);
    let outcome = record_baseline(&store, &runner)
        .await
        .context("failed to record baseline")?;

    println!("\nBaseline recorded: {:.2}s", outcome.duration_seconds);
    Ok(())
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary.render_text());
    }
    Ok(())
}
