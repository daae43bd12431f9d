//! Placement verdicts, probability bands and recommendation tiers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlacementError, Result};
use crate::features::StudentProfile;
use crate::model::Classifier;

/// Percent below which chances are considered low.
pub const LOW_THRESHOLD: f64 = 40.0;

/// Percent from which chances are considered high.
pub const HIGH_THRESHOLD: f64 = 70.0;

/// Class label of a placed student.
pub const PLACED_LABEL: i64 = 1;

/// Headline outcome derived from the predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Placed,
    NotPlaced,
}

impl Verdict {
    pub fn from_label(label: i64) -> Self {
        if label == PLACED_LABEL {
            Verdict::Placed
        } else {
            Verdict::NotPlaced
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Placed => "Student is Likely to be Placed!",
            Verdict::NotPlaced => "Student Placement Chances Low",
        }
    }
}

/// Color band of the probability gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityBand {
    Red,
    Orange,
    Green,
}

impl ProbabilityBand {
    /// Band containing `percent`: `[0, 40)`, `[40, 70)` or `[70, 100]`.
    pub fn from_percent(percent: f64) -> Self {
        if percent < LOW_THRESHOLD {
            ProbabilityBand::Red
        } else if percent < HIGH_THRESHOLD {
            ProbabilityBand::Orange
        } else {
            ProbabilityBand::Green
        }
    }

    /// Gauge range covered by this band.
    pub fn range(&self) -> [f64; 2] {
        match self {
            ProbabilityBand::Red => [0.0, LOW_THRESHOLD],
            ProbabilityBand::Orange => [LOW_THRESHOLD, HIGH_THRESHOLD],
            ProbabilityBand::Green => [HIGH_THRESHOLD, 100.0],
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ProbabilityBand::Red => "red",
            ProbabilityBand::Orange => "orange",
            ProbabilityBand::Green => "green",
        }
    }

    pub fn all() -> [ProbabilityBand; 3] {
        [
            ProbabilityBand::Red,
            ProbabilityBand::Orange,
            ProbabilityBand::Green,
        ]
    }
}

/// Advice tier shown under the prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Low,
    Moderate,
    High,
}

impl Recommendation {
    /// Tier for a placement probability expressed in percent.
    pub fn from_percent(percent: f64) -> Self {
        match ProbabilityBand::from_percent(percent) {
            ProbabilityBand::Red => Recommendation::Low,
            ProbabilityBand::Orange => Recommendation::Moderate,
            ProbabilityBand::Green => Recommendation::High,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::Low => "Improve CGPA above 7.5 and gain 2+ internships.",
            Recommendation::Moderate => "Moderate chances. Improve projects and resume score.",
            Recommendation::High => "Excellent profile. High placement readiness!",
        }
    }

    /// Whether the message is a warning rather than a success notice.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Recommendation::High)
    }
}

/// Outcome of one form submission. Computed fresh and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class label.
    pub label: i64,
    /// Probability of placement in `[0, 1]`.
    pub probability: f64,
}

impl PredictionResult {
    /// Probability scaled to `[0, 100]`.
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(self.label)
    }

    pub fn band(&self) -> ProbabilityBand {
        ProbabilityBand::from_percent(self.percent())
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_percent(self.percent())
    }
}

/// Validate `profile` and run it through `model`.
///
/// The positive-class probability is clamped into `[0, 1]`; a non-finite
/// probability is reported as [`PlacementError::Prediction`].
pub fn predict_placement(
    model: &dyn Classifier,
    profile: &StudentProfile,
) -> Result<PredictionResult> {
    profile.validate()?;
    let features = profile.to_features();

    let label = model.predict(&features)?;
    let proba = model.predict_proba(&features)?;
    let idx = model.positive_class_index();
    let probability = *proba.get(idx).ok_or_else(|| {
        PlacementError::prediction(format!(
            "model returned {} probabilities, positive class at {}",
            proba.len(),
            idx
        ))
    })?;
    if !probability.is_finite() {
        return Err(PlacementError::prediction(format!(
            "non-finite probability {probability}"
        )));
    }

    let result = PredictionResult {
        label,
        probability: probability.clamp(0.0, 1.0),
    };
    debug!(
        "Predicted label={} probability={:.4} for {:?}",
        result.label, result.probability, profile
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForestClassifier, ForestSpec, TreeSpec};

    #[derive(Debug)]
    struct FixedModel(Vec<f64>);

    impl Classifier for FixedModel {
        fn kind(&self) -> &'static str {
            "fixed"
        }
        fn n_features(&self) -> usize {
            5
        }
        fn feature_names(&self) -> &[String] {
            &[]
        }
        fn classes(&self) -> &[i64] {
            &[0, 1]
        }
        fn n_trees(&self) -> usize {
            0
        }
        fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
        fn feature_importances(&self) -> &[f64] {
            &[]
        }
    }

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(Recommendation::from_percent(0.0), Recommendation::Low);
        assert_eq!(Recommendation::from_percent(39.999), Recommendation::Low);
        assert_eq!(Recommendation::from_percent(40.0), Recommendation::Moderate);
        assert_eq!(Recommendation::from_percent(69.999), Recommendation::Moderate);
        assert_eq!(Recommendation::from_percent(70.0), Recommendation::High);
        assert_eq!(Recommendation::from_percent(100.0), Recommendation::High);
    }

    #[test]
    fn test_tiers_are_monotonic() {
        let rank = |r: Recommendation| match r {
            Recommendation::Low => 0,
            Recommendation::Moderate => 1,
            Recommendation::High => 2,
        };
        let mut prev = 0;
        for i in 0..=1000 {
            let tier = rank(Recommendation::from_percent(i as f64 / 10.0));
            assert!(tier >= prev);
            prev = tier;
        }
    }

    #[test]
    fn test_bands_cover_gauge() {
        let bands = ProbabilityBand::all();
        assert_eq!(bands[0].range()[0], 0.0);
        assert_eq!(bands[2].range()[1], 100.0);
        for pair in bands.windows(2) {
            assert_eq!(pair[0].range()[1], pair[1].range()[0]);
        }
        assert_eq!(ProbabilityBand::from_percent(55.0).color(), "orange");
    }

    #[test]
    fn test_verdict_messages() {
        assert_eq!(Verdict::from_label(1), Verdict::Placed);
        assert_eq!(Verdict::from_label(0), Verdict::NotPlaced);
        assert_eq!(
            Verdict::Placed.message(),
            "Student is Likely to be Placed!"
        );
    }

    #[test]
    fn test_predict_placement_reads_positive_class() {
        let model = FixedModel(vec![0.25, 0.75]);
        let result = predict_placement(&model, &StudentProfile::default()).unwrap();
        assert_eq!(result.label, 1);
        assert_eq!(result.percent(), 75.0);
        assert_eq!(result.verdict(), Verdict::Placed);
        assert_eq!(result.recommendation(), Recommendation::High);
        assert_eq!(result.band(), ProbabilityBand::Green);
    }

    #[test]
    fn test_predict_placement_clamps_and_rejects_nan() {
        let model = FixedModel(vec![-0.1, 1.1]);
        let result = predict_placement(&model, &StudentProfile::default()).unwrap();
        assert_eq!(result.probability, 1.0);

        let model = FixedModel(vec![0.5, f64::NAN]);
        let err = predict_placement(&model, &StudentProfile::default()).unwrap_err();
        assert!(matches!(err, PlacementError::Prediction { .. }));
    }

    #[test]
    fn test_predict_placement_validates_input() {
        let model = FixedModel(vec![0.5, 0.5]);
        let profile = StudentProfile::new(12.0, 0, 0, 1, 0);
        assert!(predict_placement(&model, &profile).unwrap_err().is_input_error());
    }

    #[test]
    fn test_percent_stays_in_range_over_input_grid() {
        let spec = ForestSpec {
            n_features: 5,
            feature_names: None,
            classes: vec![0, 1],
            trees: vec![
                TreeSpec {
                    children_left: vec![1, -1, -1],
                    children_right: vec![2, -1, -1],
                    feature: vec![4, -2, -2],
                    threshold: vec![55.0, -2.0, -2.0],
                    value: vec![vec![5.0, 5.0], vec![9.0, 1.0], vec![1.0, 9.0]],
                    impurity: None,
                    weighted_n_node_samples: None,
                },
                TreeSpec::leaf(vec![3.0, 7.0]),
            ],
            feature_importances: None,
        };
        let model = ForestClassifier::from_spec(&spec).unwrap();

        for cgpa_tenths in (50..=100).step_by(5) {
            for internships in 0..=5 {
                for resume in (0..=100).step_by(20) {
                    let profile = StudentProfile::new(
                        cgpa_tenths as f64 / 10.0,
                        internships,
                        internships * 2,
                        1 + internships,
                        resume,
                    );
                    let result = predict_placement(&model, &profile).unwrap();
                    assert!((0.0..=100.0).contains(&result.percent()));
                }
            }
        }
    }
}
