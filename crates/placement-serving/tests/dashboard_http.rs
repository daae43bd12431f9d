use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use placement_serving::{router, AppState, DashboardConfig, ModelLoader};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn app_with_dataset(dataset: PathBuf) -> Router {
    let config = DashboardConfig::builder()
        .model_path(data_dir().join("placement_model.json"))
        .dataset_path(dataset)
        .build();
    let loader = Arc::new(ModelLoader::new());
    loader.load(&config.model_path).unwrap();
    router(AppState::new(config, loader))
}

fn app() -> Router {
    app_with_dataset(data_dir().join("campus_placement.csv"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn form_post(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_index_renders_form_and_charts() {
    let (status, html) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("AI Smart Campus Placement Intelligence Dashboard"));
    assert!(html.contains("name=\"resume_score\""));
    assert!(html.contains("Plotly.newPlot(\"outcome-chart\""));
    assert!(html.contains("Plotly.newPlot(\"correlation-chart\""));
    assert!(!html.contains("Prediction Result"));
}

#[tokio::test]
async fn test_form_prediction_high() {
    let body = "cgpa=9.0&internships=3&projects=6&communication=8&resume_score=90";
    let (status, html) = send(app(), form_post(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Prediction Result"));
    assert!(html.contains("Student is Likely to be Placed!"));
    assert!(html.contains("Excellent profile. High placement readiness!"));
    assert!(html.contains("Plotly.newPlot(\"gauge\""));
    // Submitted values are echoed back.
    assert!(html.contains("value=\"9.0\""));
}

#[tokio::test]
async fn test_form_prediction_low_defaults() {
    let body = "cgpa=5.0&internships=0&projects=0&communication=1&resume_score=0";
    let (status, html) = send(app(), form_post(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Student Placement Chances Low"));
    assert!(html.contains("Improve CGPA above 7.5 and gain 2+ internships."));
}

#[tokio::test]
async fn test_form_out_of_range_is_rejected() {
    let body = "cgpa=11&internships=3&projects=6&communication=8&resume_score=90";
    let (status, html) = send(app(), form_post(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("CGPA must be between 5 and 10"));
    assert!(html.contains("id=\"student_form\""));
    assert!(!html.contains("Prediction Result"));
}

#[tokio::test]
async fn test_api_predict() {
    let body = json!({
        "cgpa": 8.0,
        "internships": 1,
        "projects": 3,
        "communication": 3,
        "resume_score": 50
    });
    let (status, text) = send(app(), json_post("/api/predict", body)).await;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_str(&text).unwrap();
    let percent = value["percent"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&percent));
    assert!((value["probability"].as_f64().unwrap() * 100.0 - percent).abs() < 1e-9);
    assert_eq!(value["recommendation"], "moderate");
    assert_eq!(value["band"], "orange");
    assert_eq!(value["gauge"]["data"][0]["type"], "indicator");
}

#[tokio::test]
async fn test_api_predict_out_of_range() {
    let body = json!({
        "cgpa": 8.0,
        "internships": 1,
        "projects": 3,
        "communication": 3,
        "resume_score": 150
    });
    let (status, text) = send(app(), json_post("/api/predict", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert!(value["error"].as_str().unwrap().contains("Resume Score"));
}

#[tokio::test]
async fn test_api_predict_malformed_body() {
    let body = json!({
        "cgpa": 8.0,
        "internships": -1,
        "projects": 3,
        "communication": 3,
        "resume_score": 50
    });
    let (status, text) = send(app(), json_post("/api/predict", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert!(value["error"].as_str().unwrap().contains("internships"));

    let body = json!({ "cgpa": 8.0, "internships": 1.5 });
    let (status, text) = send(app(), json_post("/api/predict", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn test_api_analytics() {
    let (status, text) = send(app(), get("/api/analytics")).await;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_str(&text).unwrap();
    let rows = value["rows"].as_u64().unwrap();
    assert_eq!(rows, 60);
    let placed = value["outcome"]["placed"].as_u64().unwrap();
    let not_placed = value["outcome"]["not_placed"].as_u64().unwrap();
    assert_eq!(placed + not_placed, rows);

    let counts: u64 = value["resume_scores"]["counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_u64().unwrap())
        .sum();
    assert_eq!(counts, rows);
    assert_eq!(value["importances"].as_array().unwrap().len(), 5);
    assert_eq!(value["figures"]["importance"]["data"][0]["type"], "bar");
}

#[tokio::test]
async fn test_missing_dataset_degrades_analytics_only() {
    let app = app_with_dataset(data_dir().join("does_not_exist.csv"));

    let (status, html) = send(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Dataset unavailable"));
    assert!(!html.contains("Plotly.newPlot(\"outcome-chart\""));

    let body = "cgpa=9.0&internships=3&projects=6&communication=8&resume_score=90";
    let (status, html) = send(app.clone(), form_post(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Student is Likely to be Placed!"));

    let (status, _) = send(app, get("/api/analytics")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health() {
    let (status, text) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["healthy"], true);
    assert_eq!(value["model_kind"], "random_forest");
}

#[tokio::test]
async fn test_unloaded_model_is_unavailable() {
    let app = router(AppState::new(
        DashboardConfig::default(),
        Arc::new(ModelLoader::new()),
    ));

    let (status, _) = send(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, text) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["model_loaded"], false);
}
