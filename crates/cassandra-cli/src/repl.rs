//! Interactive claim loop.

use anyhow::Context;
use cassandra_runtime::Orchestrator;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::future::Future;

use crate::output::Formatter;

const PROMPT: &str = ">>> CLAIM: ";

/// How a piece of work ended.
#[derive(Debug, PartialEq)]
pub enum Interruptible<T> {
    Finished(T),
    Interrupted,
}

/// Run `work` unless `interrupt` settles first, in which case `work` is dropped.
pub async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = ()>,
) -> Interruptible<T> {
    tokio::select! {
        output = work => Interruptible::Finished(output),
        () = interrupt => Interruptible::Interrupted,
    }
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler, so never report an interrupt
        std::future::pending::<()>().await;
    }
}

/// Read claims until Ctrl-C or Ctrl-D, verifying each in turn.
///
/// Ctrl-C during a verification abandons that claim and ends the loop.
pub async fn run_repl(orchestrator: &Orchestrator, formatter: &Formatter) -> anyhow::Result<()> {
    println!("{}", formatter.banner());
    println!();

    let mut editor = DefaultEditor::new().context("Failed to initialize line editor")?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let claim = line.trim();

                if claim.is_empty() {
                    println!("{}\n", formatter.warning("No claim entered. Please enter a claim."));
                    continue;
                }

                editor.add_history_entry(claim).ok();

                let result = match until_interrupted(orchestrator.verify(claim), ctrl_c()).await {
                    Interruptible::Finished(result) => result,
                    Interruptible::Interrupted => {
                        println!("\n{}", formatter.warning("Interrupted, claim abandoned."));
                        println!("\n{}\n", formatter.farewell());
                        break;
                    }
                };

                match result {
                    Ok(outcome) => match formatter.report(&outcome.report) {
                        Ok(text) => println!("{}", text),
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                }

                println!("\n{}\n", formatter.info("Ready for next claim..."));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{}\n", formatter.farewell());
                break;
            }
            Err(err) => {
                return Err(err).context("Failed to read claim");
            }
        }
    }

    Ok(())
}
