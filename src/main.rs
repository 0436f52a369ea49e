//! recheck CLI entry point.
//!
//! Runs PR-scoped reviews through an external reviewer command and tracks
//! follow-ups across runs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use recheck::application::review::pipeline::{execute_run, render_persisted};
use recheck::infra::agent::CommandAgent;
use recheck::infra::app_config::load_config;
use recheck::infra::cli::diff::{DiffSource, acquire_diff};
use recheck::infra::db::Database;

#[derive(Parser, Debug)]
#[command(name = "recheck")]
#[command(about = "Follow-up code review: reconcile reviewer findings across runs", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a review for a PR and reconcile it against the previous run
    Review {
        /// PR identifier the run belongs to
        #[arg(long)]
        pr: String,

        /// Read the diff from a file instead of stdin
        #[arg(long)]
        diff: Option<PathBuf>,

        /// Diff from this git ref (requires --to)
        #[arg(long)]
        from: Option<String>,

        /// Diff to this git ref (requires --from)
        #[arg(long)]
        to: Option<String>,

        /// Reviewer command to spawn (overrides config)
        #[arg(long)]
        agent_cmd: Option<String>,
    },

    /// List persisted runs for a PR
    History {
        #[arg(long)]
        pr: String,
    },

    /// Re-render the report for the latest persisted run
    Show {
        #[arg(long)]
        pr: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let db = Database::open()?;
    let repo = db.run_repo();

    match args.command {
        Commands::Review {
            pr,
            diff,
            from,
            to,
            agent_cmd,
        } => {
            let source = match (diff, from, to) {
                (Some(path), _, _) => DiffSource::File(path),
                (None, Some(from), Some(to)) => DiffSource::GitDiff { from, to },
                (None, None, None) => DiffSource::Stdin,
                _ => anyhow::bail!("--from and --to must be used together"),
            };
            let diff_text = acquire_diff(&source)?;

            let config = load_config();
            let program = agent_cmd
                .or(config.agent_cmd)
                .context("No reviewer command configured; pass --agent-cmd or set agent_cmd in config")?;
            let agent =
                CommandAgent::new(&program, config.agent_args, config.agent_timeout_secs)?;

            let outcome = execute_run(
                &repo,
                &agent,
                &config.rules,
                &pr,
                &source.range_label(),
                &diff_text,
            )
            .await?;
            print!("{}", outcome.report);
        }

        Commands::History { pr } => {
            let runs = repo.list(&pr)?;
            if runs.is_empty() {
                println!("No runs for {pr}");
            }
            for run in runs {
                println!("{}  {}  {}", run.created_at, run.id, run.diff_range);
            }
        }

        Commands::Show { pr } => {
            print!("{}", render_persisted(&repo, &pr)?);
        }
    }

    Ok(())
}
