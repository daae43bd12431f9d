//! HTTP server for the placement dashboard.
//!
//! The router serves the rendered dashboard plus a small JSON API. The model
//! is loaded once before the listener is bound; the dataset is read again on
//! every render.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use placement_core::features::{FeatureBounds, ALL_BOUNDS};
use placement_core::prediction::{PredictionResult, ProbabilityBand, Recommendation, Verdict};
use placement_core::{predict_placement, PlacementDataset, StudentProfile, NUM_FEATURES};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::charts::{gauge_figure, AnalyticsReport, Figure};
use crate::config::DashboardConfig;
use crate::error::{ServingError, ServingResult};
use crate::model_loader::{LoadedModel, ModelLoader};
use crate::page::{form_values, AnalyticsPanel, DashboardPage, PredictionPanel};

/// Shared state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<DashboardConfig>,
    model_loader: Arc<ModelLoader>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: DashboardConfig, model_loader: Arc<ModelLoader>) -> Self {
        Self {
            config: Arc::new(config),
            model_loader,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn model(&self) -> ServingResult<Arc<LoadedModel>> {
        self.model_loader.current_model()
    }

    async fn analytics_report(&self, model: &LoadedModel) -> ServingResult<AnalyticsReport> {
        let dataset = load_dataset(self.config.dataset_path.clone()).await?;
        debug!("Read {} dataset rows", dataset.len());
        Ok(AnalyticsReport::build(
            &dataset,
            model.classifier(),
            self.config.histogram_bins,
        ))
    }

    async fn analytics_panel(&self, model: &LoadedModel) -> AnalyticsPanel {
        match self.analytics_report(model).await {
            Ok(report) => AnalyticsPanel::Ready(Box::new(report.figures)),
            Err(e) => {
                warn!("Analytics unavailable: {}", e);
                AnalyticsPanel::Unavailable(e.to_string())
            }
        }
    }

    async fn render_page(
        &self,
        form_values: [String; NUM_FEATURES],
        prediction: Option<PredictionPanel>,
    ) -> ServingResult<String> {
        let model = self.model()?;
        let analytics = self.analytics_panel(&model).await;
        DashboardPage {
            title: &self.config.title,
            plotly_js_url: &self.config.plotly_js_url,
            form_values,
            prediction,
            analytics,
        }
        .render()
    }
}

async fn load_dataset(path: PathBuf) -> ServingResult<PlacementDataset> {
    let shown = path.display().to_string();
    tokio::task::spawn_blocking(move || PlacementDataset::from_path(&path))
        .await
        .map_err(|e| ServingError::internal(format!("dataset task failed: {e}")))?
        .map_err(|e| ServingError::dataset(format!("{shown}: {e}")))
}

/// Raw sidebar form submission. Every field arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictForm {
    pub cgpa: String,
    pub internships: String,
    pub projects: String,
    pub communication: String,
    pub resume_score: String,
}

impl PredictForm {
    /// Submitted values in feature order.
    pub fn values(&self) -> [String; NUM_FEATURES] {
        [
            self.cgpa.clone(),
            self.internships.clone(),
            self.projects.clone(),
            self.communication.clone(),
            self.resume_score.clone(),
        ]
    }

    /// Parse and range-check the submission.
    pub fn parse(&self) -> ServingResult<StudentProfile> {
        let [cgpa, internships, projects, communication, resume_score] = ALL_BOUNDS;
        Ok(StudentProfile {
            cgpa: parse_field(&cgpa, &self.cgpa)?,
            internships: parse_count(&internships, &self.internships)?,
            projects: parse_count(&projects, &self.projects)?,
            communication: parse_count(&communication, &self.communication)?,
            resume_score: parse_count(&resume_score, &self.resume_score)?,
        })
    }
}

fn parse_field(bounds: &FeatureBounds, raw: &str) -> ServingResult<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        ServingError::invalid_request(format!("{} must be a number, got {:?}", bounds.label, raw))
    })?;
    bounds.check(value)?;
    Ok(value)
}

fn parse_count(bounds: &FeatureBounds, raw: &str) -> ServingResult<u32> {
    let value = parse_field(bounds, raw)?;
    if value.fract() != 0.0 {
        return Err(ServingError::invalid_request(format!(
            "{} must be a whole number, got {}",
            bounds.label, value
        )));
    }
    // In range, so non-negative and small.
    Ok(value as u32)
}

/// JSON answer of `POST /api/predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub label: i64,
    pub probability: f64,
    pub percent: f64,
    pub verdict: Verdict,
    pub verdict_message: String,
    pub band: ProbabilityBand,
    pub recommendation: Recommendation,
    pub recommendation_message: String,
    pub gauge: Figure,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            label: result.label,
            probability: result.probability,
            percent: result.percent(),
            verdict: result.verdict(),
            verdict_message: result.verdict().message().to_string(),
            band: result.band(),
            recommendation: result.recommendation(),
            recommendation_message: result.recommendation().message().to_string(),
            gauge: gauge_figure(result.percent()),
        }
    }
}

/// Health status of the server.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall health status
    pub healthy: bool,

    /// Whether the model is loaded
    pub model_loaded: bool,

    /// Model family, when loaded
    pub model_kind: Option<String>,

    /// Where the model was read from
    pub model_path: Option<PathBuf>,

    /// Server uptime in seconds
    pub uptime_secs: u64,
}

/// Build the dashboard router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/api/analytics", get(analytics))
        .route("/health", get(health))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> ServingResult<Html<String>> {
    let html = state
        .render_page(form_values(&StudentProfile::default()), None)
        .await?;
    Ok(Html(html))
}

async fn predict_form(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> ServingResult<(StatusCode, Html<String>)> {
    let model = state.model()?;
    let outcome = form
        .parse()
        .and_then(|profile| {
            predict_placement(model.classifier(), &profile).map_err(ServingError::from)
        });

    let (status, panel) = match outcome {
        Ok(result) => {
            info!(
                "Prediction: label={} probability={:.3}",
                result.label, result.probability
            );
            (StatusCode::OK, PredictionPanel::Result(result))
        }
        Err(e) if e.is_client_error() => {
            debug!("Rejected form submission: {}", e);
            (StatusCode::BAD_REQUEST, PredictionPanel::Rejected(e.to_string()))
        }
        Err(e) => return Err(e),
    };

    let html = state.render_page(form.values(), Some(panel)).await?;
    Ok((status, Html(html)))
}

async fn predict_json(
    State(state): State<AppState>,
    body: Result<Json<StudentProfile>, JsonRejection>,
) -> ServingResult<Json<PredictionResponse>> {
    let Json(profile) = body.map_err(|e| ServingError::invalid_request(e.body_text()))?;
    let model = state.model()?;
    let result = predict_placement(model.classifier(), &profile)?;
    Ok(Json(result.into()))
}

async fn analytics(State(state): State<AppState>) -> ServingResult<Json<AnalyticsReport>> {
    let model = state.model()?;
    let report = state.analytics_report(&model).await?;
    Ok(Json(report))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let model = state.model().ok();
    Json(HealthStatus {
        healthy: model.is_some(),
        model_loaded: model.is_some(),
        model_kind: model.as_ref().map(|m| m.classifier().kind().to_string()),
        model_path: model.as_ref().map(|m| m.path.clone()),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// The dashboard server.
///
/// # Example
///
/// ```no_run
/// use placement_serving::config::DashboardConfig;
/// use placement_serving::server::Server;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DashboardConfig::builder()
///     .port(8501)
///     .model_path("placement_model.json")
///     .dataset_path("campus_placement.csv")
///     .build();
///
/// Server::new(config).run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    config: DashboardConfig,
    model_loader: Arc<ModelLoader>,
}

impl Server {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            model_loader: Arc::new(ModelLoader::new()),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn model_loader(&self) -> &Arc<ModelLoader> {
        &self.model_loader
    }

    /// Validate the configuration, load the model and build the router.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or when the model cannot be loaded.
    pub fn prepare(&self) -> ServingResult<Router> {
        self.config
            .validate()
            .map_err(|e| ServingError::config(e.to_string()))?;
        self.model_loader.load(&self.config.model_path)?;
        Ok(router(AppState::new(
            self.config.clone(),
            Arc::clone(&self.model_loader),
        )))
    }

    /// Bind to the configured address and serve until ctrl-c.
    pub async fn run(&self) -> ServingResult<()> {
        let app = self.prepare()?;
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServingError::server(format!("failed to bind {addr}: {e}")))?;
        serve(listener, app, shutdown_signal()).await
    }
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> ServingResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr()?;
    info!("Dashboard listening on http://{}", local);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServingError::server(e.to_string()))?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(values: [&str; 5]) -> PredictForm {
        PredictForm {
            cgpa: values[0].to_string(),
            internships: values[1].to_string(),
            projects: values[2].to_string(),
            communication: values[3].to_string(),
            resume_score: values[4].to_string(),
        }
    }

    #[test]
    fn test_parse_form() {
        let profile = form(["8.4", "2", "5", " 8 ", "90"]).parse().unwrap();
        assert_eq!(profile, StudentProfile::new(8.4, 2, 5, 8, 90));
    }

    #[test]
    fn test_parse_form_rejections() {
        let err = form(["4.9", "2", "5", "8", "90"]).parse().unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("CGPA"));

        let err = form(["8", "1.5", "5", "8", "90"]).parse().unwrap_err();
        assert!(err.to_string().contains("whole number"));

        let err = form(["8", "2", "5", "8", "abc"]).parse().unwrap_err();
        assert!(err.to_string().contains("must be a number"));

        let err = form(["8", "2", "5", "0", "90"]).parse().unwrap_err();
        assert!(err.to_string().contains("Communication"));

        assert!(PredictForm::default().parse().is_err());
        assert!(form(["NaN", "2", "5", "8", "90"]).parse().is_err());
    }

    #[test]
    fn test_prediction_response() {
        let response = PredictionResponse::from(PredictionResult {
            label: 1,
            probability: 0.55,
        });
        assert!((response.percent - 55.0).abs() < 1e-9);
        assert_eq!(response.verdict, Verdict::Placed);
        assert_eq!(response.band, ProbabilityBand::Orange);
        assert_eq!(response.recommendation, Recommendation::Moderate);
        assert_eq!(
            response.recommendation_message,
            "Moderate chances. Improve projects and resume score."
        );
    }

    #[test]
    fn test_prepare_requires_model() {
        let config = DashboardConfig::builder()
            .model_path("/nonexistent/placement_model.json")
            .build();
        let server = Server::new(config);
        assert!(matches!(
            server.prepare(),
            Err(ServingError::ModelLoadError(_))
        ));
        assert!(!server.model_loader().is_loaded());
    }

    #[test]
    fn test_prepare_validates_config() {
        let config = DashboardConfig::builder().port(0).build();
        assert!(matches!(
            Server::new(config).prepare(),
            Err(ServingError::ConfigError(_))
        ));
    }
}
