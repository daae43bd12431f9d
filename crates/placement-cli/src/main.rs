//! Placement CLI - serve the dashboard, run one-off predictions and inspect
//! the historical dataset.

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use placement_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("placement=info".parse()?))
        .init();

    let cli = Cli::parse();
    debug!("Placement CLI starting...");

    match cli.command {
        Commands::Serve(cmd) => cmd.run().await?,
        Commands::Predict(cmd) => cmd.run()?,
        Commands::Analyze(cmd) => cmd.run()?,
    }

    Ok(())
}
