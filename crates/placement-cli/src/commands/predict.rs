//! Predict Command Implementation
//!
//! Scores a single student profile with the trained classifier.

use anyhow::{Context, Result};
use clap::Args;
use placement_core::{load_classifier, predict_placement, PredictionResult, StudentProfile};
use placement_serving::config::DEFAULT_MODEL_PATH;
use placement_serving::PredictionResponse;
use std::path::PathBuf;
use tracing::info;

/// Predict placement for one student
///
/// # Example
///
/// ```bash
/// placement predict --cgpa 8.4 --internships 2 --projects 5 \
///     --communication 8 --resume-score 90
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Serialized classifier (JSON)
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL_PATH, env = "PLACEMENT_MODEL_PATH")]
    pub model: PathBuf,

    /// Cumulative grade point average (5.0-10.0)
    #[arg(long)]
    pub cgpa: f64,

    /// Completed internships (0-5)
    #[arg(long)]
    pub internships: u32,

    /// Completed projects (0-10)
    #[arg(long)]
    pub projects: u32,

    /// Communication skills (1-10)
    #[arg(long)]
    pub communication: u32,

    /// Resume score (0-100)
    #[arg(long)]
    pub resume_score: u32,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictCommand {
    pub fn profile(&self) -> StudentProfile {
        StudentProfile::new(
            self.cgpa,
            self.internships,
            self.projects,
            self.communication,
            self.resume_score,
        )
    }

    /// Execute the predict command
    pub fn run(&self) -> Result<()> {
        let model = load_classifier(&self.model)
            .with_context(|| format!("Failed to load model {}", self.model.display()))?;
        info!("Loaded {} model from {:?}", model.kind(), self.model);

        let result = predict_placement(model.as_ref(), &self.profile())
            .context("Prediction failed")?;

        if self.json {
            let response = PredictionResponse::from(result);
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            print!("{}", format_result(&result));
        }
        Ok(())
    }
}

/// Human-readable prediction summary.
pub fn format_result(result: &PredictionResult) -> String {
    format!(
        "Verdict:        {}\nProbability:    {:.1}%\nBand:           {}\nRecommendation: {}\n",
        result.verdict().message(),
        result.percent(),
        result.band().color(),
        result.recommendation().message(),
    )
}
