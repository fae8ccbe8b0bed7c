//! CASSANDRA CLI - interactive terminal front end for claim verification.

mod cli;
mod output;
mod repl;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cassandra_runtime::{ConnectionCheck, OrchestratorBuilder, RuntimeConfig};
use cli::Cli;
use output::Formatter;
use repl::Interruptible;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let formatter = Formatter::new(!cli.no_color, cli.json);

    if cli.check {
        return run_checks(&config, &formatter).await;
    }

    if !config.graph.is_configured() {
        tracing::warn!("Neo4j not configured, verdicts will not be archived");
    }

    let orchestrator = OrchestratorBuilder::from_config(config)?
        .build()
        .context("Failed to assemble pipeline")?;

    match cli.claim {
        Some(claim) => {
            match repl::until_interrupted(orchestrator.verify(&claim), repl::ctrl_c()).await {
                Interruptible::Finished(outcome) => {
                    println!("{}", formatter.report(&outcome?.report)?);
                }
                Interruptible::Interrupted => {
                    eprintln!("{}", formatter.warning("Interrupted, claim abandoned."));
                }
            }
        }
        None => repl::run_repl(&orchestrator, &formatter).await?,
    }

    Ok(())
}

async fn run_checks(config: &RuntimeConfig, formatter: &Formatter) -> anyhow::Result<()> {
    let results = ConnectionCheck::from_config(config).run().await;
    for result in &results {
        println!("{}", formatter.check(result));
    }

    let failed = results.iter().filter(|r| r.is_failure()).count();
    if failed > 0 {
        anyhow::bail!("{} connection check(s) failed", failed);
    }
    Ok(())
}
