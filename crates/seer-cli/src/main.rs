//! StyleSeer verification CLI
//!
//! Usage:
//!   seer-verify run             Run the full verification scenario
//!   seer-verify smoke           Navigate, read the title, one screenshot
//!
//! Both commands target a running StyleSeer instance (default
//! http://localhost:3000) and write screenshots to the artifact directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seer_core::{RunReport, ScenarioStep, VerifyConfig};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "seer-verify")]
#[command(author, version, about = "UI verification harness for the StyleSeer web app")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", default_value = "seer-verify.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full verification scenario
    Run {
        /// Base URL of the app under test
        #[arg(long)]
        base_url: Option<String>,

        /// Directory screenshots are written to
        #[arg(long, value_name = "DIR")]
        artifact_dir: Option<PathBuf>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// Disable the Chrome sandbox (needed in most containers)
        #[arg(long)]
        no_sandbox: bool,
    },

    /// Check the app is serving at all: navigate, title, one screenshot
    Smoke {
        /// Base URL of the app under test
        #[arg(long)]
        base_url: Option<String>,

        /// Directory screenshots are written to
        #[arg(long, value_name = "DIR")]
        artifact_dir: Option<PathBuf>,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// Disable the Chrome sandbox (needed in most containers)
        #[arg(long)]
        no_sandbox: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = VerifyConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Run {
            base_url,
            artifact_dir,
            headed,
            no_sandbox,
        } => cmd_run(apply_overrides(config, base_url, artifact_dir, headed, no_sandbox)).await,
        Commands::Smoke {
            base_url,
            artifact_dir,
            headed,
            no_sandbox,
        } => cmd_smoke(apply_overrides(config, base_url, artifact_dir, headed, no_sandbox)).await,
    }
}

/// Fold command-line flags over the loaded configuration
fn apply_overrides(
    mut config: VerifyConfig,
    base_url: Option<String>,
    artifact_dir: Option<PathBuf>,
    headed: bool,
    no_sandbox: bool,
) -> VerifyConfig {
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Some(dir) = artifact_dir {
        config.artifact_dir = dir;
    }
    if headed {
        config.headless = false;
    }
    if no_sandbox {
        config.sandbox = false;
    }
    config
}

/// One-line run context printed above the step listing
fn report_header(report: &RunReport) -> String {
    format!(
        "Report for {} (started {})",
        report.target,
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

async fn cmd_run(config: VerifyConfig) -> Result<()> {
    debug!("Effective configuration: {:?}", config);
    println!(
        "Verifying {} (screenshots in {})",
        config.base_url,
        config.artifact_dir.display()
    );

    let report = seer_runner::run(&config)
        .await
        .context("Could not start the verification run")?;

    println!("\n{}", report_header(&report));
    for outcome in &report.steps {
        let mark = if outcome.passed { "PASS" } else { "FAIL" };
        println!(
            "  [{}] {} ({} ms): {}",
            mark, outcome.step, outcome.elapsed_ms, outcome.detail
        );
    }

    if !report.screenshots.is_empty() {
        println!("\nScreenshots:");
        for path in &report.screenshots {
            println!("  {}", path.display());
        }
    }
    if let Some(path) = &report.error_screenshot {
        println!("\nDiagnostic screenshot: {}", path.display());
    }

    if report.passed() {
        println!("\nVerification passed");
        Ok(())
    } else if let Some(failure) = report.first_failure() {
        anyhow::bail!("Verification failed at {}: {}", failure.step, failure.detail);
    } else {
        anyhow::bail!(
            "Verification incomplete: {} of {} steps ran",
            report.steps.len(),
            ScenarioStep::SEQUENCE.len()
        );
    }
}

async fn cmd_smoke(config: VerifyConfig) -> Result<()> {
    debug!("Effective configuration: {:?}", config);
    println!("Smoke checking {}", config.base_url);

    let (title, path) = seer_runner::run_smoke(&config)
        .await
        .context("Smoke run failed")?;

    println!("Page title: '{}'", title);
    println!("Screenshot: {}", path.display());

    Ok(())
}
