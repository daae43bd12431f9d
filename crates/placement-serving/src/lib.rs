//! HTTP dashboard for campus placement predictions.
//!
//! This crate serves the placement dashboard: a single page with a student
//! input form, the prediction result and the dataset analytics charts, plus a
//! small JSON API.
//!
//! # Overview
//!
//! - **Server**: axum router, graceful shutdown on ctrl-c
//! - **ModelLoader**: loads the classifier once at startup
//! - **Charts**: Plotly figure descriptions for the gauge and analytics
//! - **Page**: server-side HTML rendering
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   Browser                    │
//! │        (form posts, Plotly.js charts)        │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                    Server                    │
//! │   GET /   POST /predict   /api/*   /health   │
//! └──────────────────────────────────────────────┘
//!            │                        │
//!            ▼                        ▼
//! ┌────────────────────┐   ┌─────────────────────┐
//! │    ModelLoader     │   │  PlacementDataset   │
//! │ (loaded once, Arc) │   │ (re-read per page)  │
//! └────────────────────┘   └─────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use placement_serving::{DashboardConfig, Server};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::builder()
//!     .host("127.0.0.1")
//!     .port(8501)
//!     .model_path("placement_model.json")
//!     .dataset_path("campus_placement.csv")
//!     .build();
//!
//! Server::new(config).run().await?;
//! # Ok(())
//! # }
//! ```

pub mod charts;
pub mod config;
pub mod error;
pub mod model_loader;
pub mod page;
pub mod server;

pub use charts::{AnalyticsFigures, AnalyticsReport, Figure};
pub use config::{ConfigError, DashboardConfig, DashboardConfigBuilder};
pub use error::{ServingError, ServingResult};
pub use model_loader::{LoadedModel, ModelLoader};
pub use server::{router, AppState, HealthStatus, PredictionResponse, Server};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
