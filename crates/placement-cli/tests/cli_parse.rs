use clap::Parser;
use placement_cli::{Cli, Commands};
use std::path::PathBuf;

#[test]
fn cli_parses_serve_flags() {
    let cli = Cli::parse_from([
        "placement",
        "serve",
        "--model",
        "models/placement_model.json",
        "--dataset",
        "data/campus_placement.csv",
        "--host",
        "127.0.0.1",
        "--port",
        "9000",
    ]);
    let Commands::Serve(cmd) = cli.command else {
        panic!("expected serve command");
    };
    let config = cmd.dashboard_config().unwrap();
    assert_eq!(config.model_path, PathBuf::from("models/placement_model.json"));
    assert_eq!(config.dataset_path, PathBuf::from("data/campus_placement.csv"));
    assert_eq!(config.socket_addr(), "127.0.0.1:9000");
}

#[test]
fn cli_parses_predict_flags() {
    let cli = Cli::parse_from([
        "placement",
        "predict",
        "--cgpa",
        "8.4",
        "--internships",
        "2",
        "--projects",
        "5",
        "--communication",
        "8",
        "--resume-score",
        "90",
        "--json",
    ]);
    let Commands::Predict(cmd) = cli.command else {
        panic!("expected predict command");
    };
    assert_eq!(cmd.cgpa, 8.4);
    assert_eq!(cmd.resume_score, 90);
    assert!(cmd.json);
}

#[test]
fn cli_rejects_predict_without_inputs() {
    assert!(Cli::try_parse_from(["placement", "predict", "--cgpa", "8.4"]).is_err());
}

#[test]
fn cli_parses_analyze_flags() {
    let cli = Cli::parse_from([
        "placement",
        "analyze",
        "--dataset",
        "history.csv",
        "--model",
        "placement_model.json",
        "--bins",
        "10",
    ]);
    let Commands::Analyze(cmd) = cli.command else {
        panic!("expected analyze command");
    };
    assert_eq!(cmd.dataset, PathBuf::from("history.csv"));
    assert_eq!(cmd.model, Some(PathBuf::from("placement_model.json")));
    assert_eq!(cmd.bins.get(), 10);
}

#[test]
fn cli_rejects_zero_bins() {
    assert!(Cli::try_parse_from(["placement", "analyze", "--bins", "0"]).is_err());
}

#[test]
fn analyze_bundled_data() {
    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
    let cli = Cli::parse_from([
        "placement".into(),
        "analyze".into(),
        "--dataset".into(),
        data.join("campus_placement.csv").into_os_string(),
        "--model".into(),
        data.join("placement_model.json").into_os_string(),
    ]);
    let Commands::Analyze(cmd) = cli.command else {
        panic!("expected analyze command");
    };
    let report = cmd.report().unwrap();
    assert!(report.contains("Placement Distribution (60 students)"));
    assert!(report.contains("Feature Importance (Model Insight)"));
}
