//! quant-runtime
//!
//! Boots one orchestrator from a configuration file and runs it until SIGINT.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.json ──▶ config ──▶ lifecycle::Orchestrator
//!                                   │
//!                                   │ initialize(), in order
//!                                   ▼
//!         scheduler ─▶ logging ─▶ db? ─▶ bus? (connect, bind) ─▶ http? ─▶ heartbeat
//!                                   │
//!                                   │ start()
//!                                   ▼
//!                      scheduler loop ◀── SIGINT ──▶ stop()
//! ```
//!
//! The runtime is owned by the orchestrator, so `main` stays synchronous.

use std::path::PathBuf;

use clap::Parser;

use quant_runtime::{Components, Orchestrator};

#[derive(Parser)]
#[command(name = "quant-runtime")]
#[command(about = "Process lifecycle runtime for event-driven services", long_about = None)]
struct Cli {
    /// Configuration document (JSON, or TOML by extension)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut orchestrator = Orchestrator::new(Components::default());
    if let Err(e) = orchestrator.initialize(&cli.config) {
        eprintln!("Failed to initialize from {}: {}", cli.config.display(), e);
        return Err(e.into());
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "quant-runtime starting");
    orchestrator.start()?;

    tracing::info!("Shutdown complete");
    Ok(())
}
