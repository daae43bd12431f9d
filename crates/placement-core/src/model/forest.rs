//! Bagged decision-tree ensembles.

use serde::{Deserialize, Serialize};

use super::tree::{DecisionTree, TreeSpec};
use super::{
    default_classes, default_n_features, resolve_header, resolve_importances, Classifier,
    TreeAveraging,
};
use crate::error::{PlacementError, Result};

/// Serialized random forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSpec {
    #[serde(default = "default_n_features")]
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<TreeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
}

/// Random forest classifier.
///
/// Each tree votes with the class distribution stored at the reached leaf,
/// normalized to sum to one; the forest averages those distributions.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    n_features: usize,
    feature_names: Vec<String>,
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
    importances: Vec<f64>,
}

impl ForestClassifier {
    pub fn from_spec(spec: &ForestSpec) -> Result<Self> {
        let feature_names =
            resolve_header(spec.n_features, spec.feature_names.as_ref(), &spec.classes)?;
        if spec.trees.is_empty() {
            return Err(PlacementError::invalid_model("forest has no trees"));
        }

        let n_classes = spec.classes.len();
        let trees = spec
            .trees
            .iter()
            .map(|t| DecisionTree::from_spec(t, spec.n_features, n_classes))
            .collect::<Result<Vec<_>>>()?;

        for (i, tree) in trees.iter().enumerate() {
            for value in tree.leaf_values() {
                let total: f64 = value.iter().sum();
                if value.iter().any(|v| *v < 0.0) || total <= 0.0 {
                    return Err(PlacementError::invalid_model(format!(
                        "tree {i} has a leaf with an empty class distribution"
                    )));
                }
            }
        }

        let importances = resolve_importances(
            spec.feature_importances.as_ref(),
            &trees,
            spec.n_features,
            TreeAveraging::NormalizeEach,
        )?;

        Ok(Self {
            n_features: spec.n_features,
            feature_names,
            classes: spec.classes.clone(),
            trees,
            importances,
        })
    }
}

impl Classifier for ForestClassifier {
    fn kind(&self) -> &'static str {
        "random_forest"
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
        if features.len() != self.n_features {
            return Err(PlacementError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(features);
            let total: f64 = leaf.iter().sum();
            for (p, v) in proba.iter_mut().zip(leaf) {
                *p += v / total;
            }
        }
        let n = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n;
        }
        Ok(proba)
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}
