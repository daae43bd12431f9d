//! Pre-trained placement classifiers.
//!
//! A trained model is an opaque JSON artifact produced by an external training
//! pipeline. It is described by [`ModelSpec`], tagged by `type`:
//!
//! ```json
//! { "type": "random_forest", "classes": [0, 1], "trees": [ ... ] }
//! { "type": "gradient_boosting", "init_score": -0.2, "learning_rate": 0.1, "trees": [ ... ] }
//! ```
//!
//! [`ModelSpec::build`] validates the spec and returns a [`Classifier`] trait
//! object. Serving code only ever sees the trait.
//!
//! # Example
//!
//! ```
//! use placement_core::model::ModelSpec;
//!
//! let json = r#"{
//!     "type": "random_forest",
//!     "trees": [{
//!         "children_left": [-1], "children_right": [-1],
//!         "feature": [-2], "threshold": [-2.0],
//!         "value": [[1.0, 3.0]]
//!     }]
//! }"#;
//! let model = ModelSpec::from_json(json).unwrap().build().unwrap();
//! let proba = model.predict_proba(&[7.0, 1.0, 2.0, 6.0, 70.0]).unwrap();
//! assert_eq!(proba, vec![0.25, 0.75]);
//! assert_eq!(model.predict(&[7.0, 1.0, 2.0, 6.0, 70.0]).unwrap(), 1);
//! ```

mod boosting;
mod forest;
mod tree;

pub use boosting::{BoostedClassifier, BoostingSpec};
pub use forest::{ForestClassifier, ForestSpec};
pub use tree::{DecisionTree, TreeSpec};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlacementError, Result};
use crate::features::{FEATURE_NAMES, NUM_FEATURES};

/// Inference interface shared by every supported model family.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Short identifier of the model family.
    fn kind(&self) -> &'static str;

    /// Number of input features.
    fn n_features(&self) -> usize;

    /// Feature names the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Class labels, in the column order of [`Classifier::predict_proba`].
    fn classes(&self) -> &[i64];

    /// Number of trees in the ensemble.
    fn n_trees(&self) -> usize;

    /// Class probabilities for one sample.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Per-feature importance scores, aligned with [`Classifier::feature_names`].
    fn feature_importances(&self) -> &[f64];

    /// Most probable class label. Ties resolve to the earlier class.
    fn predict(&self, features: &[f64]) -> Result<i64> {
        let proba = self.predict_proba(features)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        self.classes()
            .get(best)
            .copied()
            .ok_or_else(|| PlacementError::prediction("probability vector wider than classes"))
    }

    /// Column of the positive ("placed") class in the probability vector.
    fn positive_class_index(&self) -> usize {
        let classes = self.classes();
        classes
            .iter()
            .position(|&c| c == 1)
            .unwrap_or_else(|| classes.len().saturating_sub(1))
    }
}

/// Serialized model, tagged by family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    RandomForest(ForestSpec),
    GradientBoosting(BoostingSpec),
}

impl ModelSpec {
    /// Parse a spec from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a spec from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Validate the spec and build the classifier.
    pub fn build(&self) -> Result<Box<dyn Classifier>> {
        match self {
            ModelSpec::RandomForest(spec) => Ok(Box::new(ForestClassifier::from_spec(spec)?)),
            ModelSpec::GradientBoosting(spec) => {
                Ok(Box::new(BoostedClassifier::from_spec(spec)?))
            }
        }
    }
}

/// Load a placement classifier from `path`.
///
/// On top of [`ModelSpec::build`], this requires the model to take exactly the
/// five student attributes. Feature names that differ from [`FEATURE_NAMES`]
/// are logged but accepted, since columns are matched by position.
pub fn load_classifier(path: impl AsRef<Path>) -> Result<Box<dyn Classifier>> {
    let path = path.as_ref();
    debug!("Reading model spec from {:?}", path);
    let model = ModelSpec::from_path(path)?.build()?;
    if model.n_features() != NUM_FEATURES {
        return Err(PlacementError::invalid_model(format!(
            "model expects {} features, placement profiles have {}",
            model.n_features(),
            NUM_FEATURES
        )));
    }
    let names_match = model
        .feature_names()
        .iter()
        .zip(FEATURE_NAMES)
        .all(|(a, b)| a == b);
    if !names_match {
        warn!(
            "Model feature names {:?} differ from expected {:?}",
            model.feature_names(),
            FEATURE_NAMES
        );
    }
    Ok(model)
}

fn default_n_features() -> usize {
    NUM_FEATURES
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Resolve and validate the shared header fields of every model family.
fn resolve_header(
    n_features: usize,
    feature_names: Option<&Vec<String>>,
    classes: &[i64],
) -> Result<Vec<String>> {
    if n_features == 0 {
        return Err(PlacementError::invalid_model("model has zero features"));
    }
    if classes.len() != 2 || classes[0] == classes[1] {
        return Err(PlacementError::invalid_model(format!(
            "expected two distinct classes, got {:?}",
            classes
        )));
    }
    match feature_names {
        Some(names) if names.len() != n_features => Err(PlacementError::invalid_model(format!(
            "{} feature names for {} features",
            names.len(),
            n_features
        ))),
        Some(names) => Ok(names.clone()),
        None if n_features == NUM_FEATURES => {
            Ok(FEATURE_NAMES.iter().map(|s| s.to_string()).collect())
        }
        None => Ok((0..n_features).map(|i| format!("f{i}")).collect()),
    }
}

/// How per-tree impurity decreases are combined into ensemble importances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeAveraging {
    /// Normalize each tree before averaging (bagged forests).
    NormalizeEach,
    /// Average raw decreases, normalize once (boosted stages).
    Raw,
}

fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}

/// Resolve ensemble feature importances.
///
/// Priority: an explicit exported vector, then mean decrease in impurity when
/// every tree carries impurity statistics, then normalized split counts.
fn resolve_importances(
    explicit: Option<&Vec<f64>>,
    trees: &[DecisionTree],
    n_features: usize,
    averaging: TreeAveraging,
) -> Result<Vec<f64>> {
    if let Some(explicit) = explicit {
        if explicit.len() != n_features {
            return Err(PlacementError::invalid_model(format!(
                "{} feature importances for {} features",
                explicit.len(),
                n_features
            )));
        }
        if explicit.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PlacementError::invalid_model(
                "feature importances must be finite and non-negative",
            ));
        }
        return Ok(explicit.clone());
    }

    let relevant: Vec<&DecisionTree> = trees.iter().filter(|t| t.node_count() > 1).collect();
    let mut out = vec![0.0; n_features];
    if relevant.is_empty() {
        return Ok(out);
    }

    if relevant.iter().all(|t| t.has_impurity_stats()) {
        for tree in &relevant {
            if let Some(mut dec) = tree.impurity_decrease(n_features) {
                if averaging == TreeAveraging::NormalizeEach {
                    normalize(&mut dec);
                }
                for (o, d) in out.iter_mut().zip(dec) {
                    *o += d;
                }
            }
        }
        let n = relevant.len() as f64;
        for o in &mut out {
            *o /= n;
        }
    } else {
        for tree in &relevant {
            tree.accumulate_split_counts(&mut out);
        }
    }
    normalize(&mut out);
    Ok(out)
}
