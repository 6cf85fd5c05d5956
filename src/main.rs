//! algorand-workflows
//!
//! Runs the example request/sign/submit/confirm scenarios against a
//! public test network.
//!
//! # Architecture Overview
//!
//! ```text
//!   cli (subcommand)
//!       │
//!       ▼
//!   workflows::WorkflowRunner ──▶ transaction (build, group, sign)
//!       │                              │
//!       ▼                              ▼
//!   blockchain (node + indexer REST) ◀─ abi (method calls, composer)
//!       │
//!       ▼
//!   remote ledger
//!
//!   cross-cutting: config, observability (tracing + metrics), wallet
//! ```

mod cli;

use clap::Parser;

use algorand_workflows::config::load_or_default;
use algorand_workflows::observability::{logging, metrics};
use algorand_workflows::workflows::WorkflowRunner;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        algod_url = %config.network.algod_url,
        indexer_url = %config.network.indexer_url,
        "algorand-workflows starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_exporter(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let runner = WorkflowRunner::new(&config.network)?;
    if let Err(e) = cli::execute(cli.command, &runner).await {
        tracing::error!(error = %e, "Scenario failed");
        return Err(e);
    }

    Ok(())
}
