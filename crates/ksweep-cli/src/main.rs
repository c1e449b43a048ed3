//! KSWEEP - early-kernel clone sweep CLI.
//!
//! The `ksweep` command discovers cloned kernel bugs tied to kmaint
//! trackers, checks whether the fixes have reached the candidate or
//! production Brew tag, advances clone status accordingly, and prints a
//! tab-delimited report.
//!
//! ## Commands
//!
//! - `sweep`: run one discovery + reconciliation + report pass
//! - `config show`: print the validated sweep configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use ksweep_brew::{BrewClient, BrewConfig};
use ksweep_core::{SweepConfig, SweepFlags, SweepRunner};
use ksweep_jira::{JiraClient, JiraConfig};

#[derive(Parser)]
#[command(name = "ksweep")]
#[command(author = "ART Release Engineering")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Early-kernel clone sweep over Jira and Brew", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find cloned kernel bugs, reconcile their status, and print a report
    Sweep {
        /// Path to the group metadata file carrying the kernel_bug_sweep section
        #[arg(long)]
        group_config: PathBuf,

        /// Reconcile only these clone keys (bypasses query discovery)
        #[arg(long = "bug")]
        bugs: Vec<String>,

        /// Restrict discovery to these tracker keys
        #[arg(long = "tracker")]
        trackers: Vec<String>,

        /// Apply status transitions to clone tickets
        #[arg(long = "move")]
        move_bugs: bool,

        /// Comment on and close tracker tickets as clones progress
        #[arg(long)]
        update_tracker: bool,

        /// Compute and log decisions without mutating anything
        #[arg(long)]
        dry_run: bool,

        /// Bound on concurrent clone reconciliation
        #[arg(long, default_value_t = ksweep_core::DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },

    /// Inspect the sweep configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the validated kernel_bug_sweep config as YAML
    Show {
        /// Path to the group metadata file
        #[arg(long)]
        group_config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    ksweep_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Sweep {
            group_config,
            bugs,
            trackers,
            move_bugs,
            update_tracker,
            dry_run,
            concurrency,
        } => {
            cmd_sweep(
                &group_config,
                &bugs,
                &trackers,
                SweepFlags {
                    move_clones: move_bugs,
                    update_tracker,
                    dry_run,
                },
                concurrency,
            )
            .await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { group_config } => cmd_config_show(&group_config),
        },
    }
}

/// Run one sweep pass and print the report to stdout.
async fn cmd_sweep(
    group_config: &Path,
    bugs: &[String],
    trackers: &[String],
    flags: SweepFlags,
    concurrency: usize,
) -> Result<()> {
    let config = SweepConfig::from_file(group_config)
        .with_context(|| format!("failed to load sweep config from {:?}", group_config))?;

    let jira = JiraClient::from_env().context("failed to build Jira client")?;
    let brew = BrewClient::from_env().context("failed to build Brew client")?;

    let report = SweepRunner::new(&jira, &brew, &config, flags)
        .with_concurrency(concurrency)
        .run(bugs, trackers)
        .await
        .context("sweep failed")?;

    print!("{}", report.render());
    Ok(())
}

/// Print the validated sweep config as YAML.
fn cmd_config_show(group_config: &Path) -> Result<()> {
    let config = SweepConfig::from_file(group_config)
        .with_context(|| format!("failed to load sweep config from {:?}", group_config))?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
