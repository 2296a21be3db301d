//! CLI for the placeguide placement and interview assistant.

mod commands;
mod observer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use placeguide_core::config;

use commands::{run_ask, run_completions, run_resources, AskKind, RetryOverrides};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "placeguide")]
#[command(about = "Placement and interview guide: ask questions, find resources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Ask a placement or interview question.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Ask a placement-related query.
    Query {
        /// The query to answer.
        query: String,
    },

    /// Find web resources for a topic.
    Resources {
        /// Resource type or topic (e.g. "system design").
        resource_type: String,
        /// Maximum rate-limited attempts before giving up (overrides config).
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,
        /// Seconds to wait before the first retry; doubles on each retry (overrides config).
        #[arg(long, value_name = "SECS")]
        initial_backoff: Option<f64>,
        /// Print the resources as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg.retry);

        match cli.command {
            CliCommand::Ask { question } => run_ask(&cfg, &question, AskKind::Question).await?,
            CliCommand::Query { query } => run_ask(&cfg, &query, AskKind::Query).await?,
            CliCommand::Resources {
                resource_type,
                max_attempts,
                initial_backoff,
                json,
            } => {
                let overrides = RetryOverrides {
                    max_attempts,
                    initial_backoff_secs: initial_backoff,
                };
                run_resources(&cfg, &resource_type, overrides, json).await?;
            }
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
