//! Analyze Command Implementation
//!
//! Prints the numbers behind the dashboard's analytics charts.

use anyhow::{Context, Result};
use clap::Args;
use placement_core::analytics::{
    feature_importances, CorrelationMatrix, FeatureImportance, Histogram, OutcomeCounts,
};
use placement_core::{load_classifier, Column, PlacementDataset};
use placement_serving::config::DEFAULT_DATASET_PATH;
use std::fmt::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::info;

/// Summarize the historical placement dataset
///
/// # Example
///
/// ```bash
/// placement analyze --dataset campus_placement.csv --model placement_model.json
/// ```
#[derive(Args, Debug, Clone)]
pub struct AnalyzeCommand {
    /// Historical placement dataset (CSV)
    #[arg(long, short = 'd', default_value = DEFAULT_DATASET_PATH, env = "PLACEMENT_DATASET_PATH")]
    pub dataset: PathBuf,

    /// Also report the feature importances of this classifier
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Number of bins in the resume score histogram
    #[arg(long, default_value = "5")]
    pub bins: NonZeroUsize,
}

impl AnalyzeCommand {
    /// Execute the analyze command
    pub fn run(&self) -> Result<()> {
        print!("{}", self.report()?);
        Ok(())
    }

    /// Build the full text report.
    pub fn report(&self) -> Result<String> {
        let dataset = PlacementDataset::from_path(&self.dataset)
            .with_context(|| format!("Failed to read dataset {}", self.dataset.display()))?;
        info!("Read {} rows from {:?}", dataset.len(), self.dataset);

        let importances = match &self.model {
            Some(path) => {
                let model = load_classifier(path)
                    .with_context(|| format!("Failed to load model {}", path.display()))?;
                Some(feature_importances(model.as_ref()))
            }
            None => None,
        };

        let mut out = String::new();
        format_outcomes(&mut out, &OutcomeCounts::from_dataset(&dataset))?;
        let scores = dataset.column(Column::ResumeScore);
        format_histogram(&mut out, &Histogram::compute(&scores, self.bins.get()))?;
        format_correlations(&mut out, &CorrelationMatrix::compute(&dataset))?;
        if let Some(importances) = importances {
            format_importances(&mut out, &importances)?;
        }
        Ok(out)
    }
}

fn format_outcomes(out: &mut String, counts: &OutcomeCounts) -> fmt::Result {
    let placed_pct = counts.placed_fraction() * 100.0;
    let not_placed_pct = if counts.total() == 0 {
        0.0
    } else {
        100.0 - placed_pct
    };
    writeln!(out, "Placement Distribution ({} students)", counts.total())?;
    writeln!(out, "  Placed:     {:>5}  ({:.1}%)", counts.placed, placed_pct)?;
    writeln!(
        out,
        "  Not Placed: {:>5}  ({:.1}%)",
        counts.not_placed, not_placed_pct
    )?;
    writeln!(out)
}

fn format_histogram(out: &mut String, hist: &Histogram) -> fmt::Result {
    writeln!(out, "Resume Score Analysis")?;
    for (edges, count) in hist.edges.windows(2).zip(&hist.counts) {
        writeln!(out, "  {:>6.1} - {:>6.1}: {}", edges[0], edges[1], count)?;
    }
    writeln!(out)
}

fn format_correlations(out: &mut String, matrix: &CorrelationMatrix) -> fmt::Result {
    writeln!(out, "Feature Correlation Matrix")?;
    write!(out, "  {:<14}", "")?;
    for label in &matrix.labels {
        write!(out, "{:>14}", label)?;
    }
    writeln!(out)?;
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        write!(out, "  {:<14}", label)?;
        for cell in row {
            match cell {
                Some(r) => write!(out, "{:>14.2}", r)?,
                None => write!(out, "{:>14}", "n/a")?,
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn format_importances(out: &mut String, importances: &[FeatureImportance]) -> fmt::Result {
    writeln!(out, "Feature Importance (Model Insight)")?;
    for item in importances {
        writeln!(out, "  {:<14}{:.4}", item.feature, item.score)?;
    }
    writeln!(out)
}
