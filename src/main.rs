//! Elidune Ledger - interactive library catalog
//!
//! Menu-driven front end over the in-memory catalog and loan ledger.

use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elidune_ledger::{cli::Cli, config::AppConfig, services::Services};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing on stderr, away from the menu
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_ledger={}", config.logging.level).into());

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }

    tracing::info!(
        "Starting Elidune Ledger v{} (loan duration {} days)",
        env!("CARGO_PKG_VERSION"),
        config.loans.duration_days
    );

    let services = Services::new(config.loans.clone());

    let stdin = io::stdin();
    let mut cli = Cli::new(services, stdin.lock(), io::stdout());
    cli.run()?;

    tracing::info!("Elidune Ledger stopped");
    Ok(())
}
