//! Serve Command Implementation
//!
//! Runs the placement dashboard over HTTP until ctrl-c.

use anyhow::{Context, Result};
use clap::Args;
use placement_serving::{DashboardConfig, Server};
use std::path::PathBuf;
use tracing::info;

/// Serve the placement dashboard
///
/// Flags override values from `--config`, which override the defaults.
///
/// # Example
///
/// ```bash
/// placement serve \
///     --model placement_model.json \
///     --dataset campus_placement.csv \
///     --port 8501
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct ServeCommand {
    /// Serialized classifier (JSON)
    #[arg(long, short = 'm', env = "PLACEMENT_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Historical placement dataset (CSV)
    #[arg(long, short = 'd', env = "PLACEMENT_DATASET_PATH")]
    pub dataset: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "PLACEMENT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PLACEMENT_PORT")]
    pub port: Option<u16>,

    /// JSON configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of bins in the resume score histogram
    #[arg(long)]
    pub histogram_bins: Option<usize>,
}

impl ServeCommand {
    /// Execute the serve command
    pub async fn run(&self) -> Result<()> {
        let config = self.dashboard_config()?;
        info!("Starting placement dashboard...");
        info!("Model: {:?}", config.model_path);
        info!("Dataset: {:?}", config.dataset_path);

        Server::new(config)
            .run()
            .await
            .context("Dashboard server failed")?;
        Ok(())
    }

    /// Resolve the dashboard configuration.
    pub fn dashboard_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => DashboardConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bins) = self.histogram_bins {
            config.histogram_bins = bins;
        }

        config.validate().context("Invalid dashboard configuration")?;
        Ok(config)
    }
}
