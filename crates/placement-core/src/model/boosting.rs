//! Gradient-boosted binary classifiers.

use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeSpec};
use super::{
    default_classes, default_n_features, resolve_header, resolve_importances, Classifier,
    TreeAveraging,
};
use crate::error::{PlacementError, Result};

fn default_learning_rate() -> f64 {
    0.1
}

/// Serialized gradient-boosting model with a log-loss objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostingSpec {
    #[serde(default = "default_n_features")]
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    /// Prior log-odds of the positive class.
    #[serde(default)]
    pub init_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Regression trees with a single raw score per node.
    pub trees: Vec<TreeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
}

/// Additive tree ensemble: `p = sigmoid(init_score + learning_rate * Σ leaf)`.
#[derive(Debug, Clone)]
pub struct BoostedClassifier {
    n_features: usize,
    feature_names: Vec<String>,
    classes: Vec<i64>,
    init_score: f64,
    learning_rate: f64,
    trees: Vec<DecisionTree>,
    importances: Vec<f64>,
}

impl BoostedClassifier {
    pub fn from_spec(spec: &BoostingSpec) -> Result<Self> {
        let feature_names =
            resolve_header(spec.n_features, spec.feature_names.as_ref(), &spec.classes)?;
        if !spec.init_score.is_finite() {
            return Err(PlacementError::invalid_model("init_score must be finite"));
        }
        if !spec.learning_rate.is_finite() || spec.learning_rate <= 0.0 {
            return Err(PlacementError::invalid_model(format!(
                "learning_rate must be positive, got {}",
                spec.learning_rate
            )));
        }

        let trees = spec
            .trees
            .iter()
            .map(|t| DecisionTree::from_spec(t, spec.n_features, 1))
            .collect::<Result<Vec<_>>>()?;

        let importances = resolve_importances(
            spec.feature_importances.as_ref(),
            &trees,
            spec.n_features,
            TreeAveraging::Raw,
        )?;

        Ok(Self {
            n_features: spec.n_features,
            feature_names,
            classes: spec.classes.clone(),
            init_score: spec.init_score,
            learning_rate: spec.learning_rate,
            trees,
            importances,
        })
    }

    /// Raw log-odds of the positive class.
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(PlacementError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let sum: f64 = self.trees.iter().map(|t| t.leaf(features)[0]).sum();
        Ok(self.init_score + self.learning_rate * sum)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for BoostedClassifier {
    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let p = sigmoid(self.decision_function(features)?);
        Ok(vec![1.0 - p, p])
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}
