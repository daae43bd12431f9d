//! Dashboard configuration.
//!
//! [`DashboardConfig`] carries the network settings, the artifact paths and a
//! few presentation knobs. It can be assembled with a builder, read from a
//! JSON file, or filled in from CLI flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default path of the serialized classifier.
pub const DEFAULT_MODEL_PATH: &str = "placement_model.json";

/// Default path of the historical dataset.
pub const DEFAULT_DATASET_PATH: &str = "campus_placement.csv";

/// Default Plotly.js bundle loaded by the browser.
pub const DEFAULT_PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Configuration for the dashboard server.
///
/// # Example
///
/// ```
/// use placement_serving::config::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .host("127.0.0.1")
///     .port(8501)
///     .model_path("models/placement_model.json")
///     .build();
/// assert_eq!(config.socket_addr(), "127.0.0.1:8501");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Host address to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to listen on (default: 8501)
    pub port: u16,

    /// Path to the serialized classifier
    pub model_path: PathBuf,

    /// Path to the historical placement CSV
    pub dataset_path: PathBuf,

    /// Number of bins in the resume score histogram
    pub histogram_bins: usize,

    /// Plotly.js script URL embedded in the page
    pub plotly_js_url: String,

    /// Page title
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            histogram_bins: 5,
            plotly_js_url: DEFAULT_PLOTLY_JS_URL.to_string(),
            title: "Smart Placement AI".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| ConfigError::InvalidConfigFile(format!("{}: {}", path.display(), e)))
    }

    /// Get the socket address string for binding.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::InvalidHistogramBins);
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::ModelPathNotFound(self.model_path.clone()));
        }
        Ok(())
    }
}

/// Builder for [`DashboardConfig`].
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    model_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
    histogram_bins: Option<usize>,
    plotly_js_url: Option<String>,
    title: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the model path.
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Set the dataset path.
    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the Plotly.js script URL.
    pub fn plotly_js_url(mut self, url: impl Into<String>) -> Self {
        self.plotly_js_url = Some(url.into());
        self
    }

    /// Set the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DashboardConfig {
        let default = DashboardConfig::default();
        DashboardConfig {
            host: self.host.unwrap_or(default.host),
            port: self.port.unwrap_or(default.port),
            model_path: self.model_path.unwrap_or(default.model_path),
            dataset_path: self.dataset_path.unwrap_or(default.dataset_path),
            histogram_bins: self.histogram_bins.unwrap_or(default.histogram_bins),
            plotly_js_url: self.plotly_js_url.unwrap_or(default.plotly_js_url),
            title: self.title.unwrap_or(default.title),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid port number
    #[error("Invalid port number: port cannot be 0")]
    InvalidPort,

    /// Invalid histogram bin count
    #[error("Invalid histogram bins: must be at least 1")]
    InvalidHistogramBins,

    /// Model path not found
    #[error("Model path not found: {0}")]
    ModelPathNotFound(PathBuf),

    /// Invalid configuration file
    #[error("Invalid configuration file: {0}")]
    InvalidConfigFile(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8501);
        assert_eq!(config.histogram_bins, 5);
        assert_eq!(config.model_path, PathBuf::from("placement_model.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::builder()
            .host("127.0.0.1")
            .port(9090)
            .dataset_path("/data/placements.csv")
            .histogram_bins(10)
            .build();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.dataset_path, PathBuf::from("/data/placements.csv"));
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.title, "Smart Placement AI");
    }

    #[test]
    fn test_config_validation() {
        let mut config = DashboardConfig::default();
        config.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));

        config.port = 8501;
        config.histogram_bins = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHistogramBins)
        ));

        config.histogram_bins = 5;
        config.model_path = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ModelPathNotFound(_))
        ));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"port": 9000, "dataset_path": "history.csv"}"#)
            .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.dataset_path, PathBuf::from("history.csv"));
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_from_file_errors() {
        let err = DashboardConfig::from_file("/nonexistent/dashboard.json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfigFile(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
