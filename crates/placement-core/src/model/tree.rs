//! Flattened CART trees.
//!
//! Trees are stored the way tree learners export them: parallel arrays indexed
//! by node id, with `children_left[i] == -1` marking a leaf. A sample goes to
//! the left child when `x[feature] <= threshold`.

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

/// Serialized form of one tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node output: class counts/fractions for classification trees, a
    /// single raw score for regression (boosting) trees.
    pub value: Vec<Vec<f64>>,
    /// Node impurity, used for mean-decrease-in-impurity importances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impurity: Option<Vec<f64>>,
    /// Weighted training samples reaching each node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_n_node_samples: Option<Vec<f64>>,
}

impl TreeSpec {
    /// A tree consisting of a single leaf.
    pub fn leaf(value: Vec<f64>) -> Self {
        Self {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
            impurity: None,
            weighted_n_node_samples: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf,
}

/// A validated tree ready for traversal.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    values: Vec<Vec<f64>>,
    impurity: Option<Vec<f64>>,
    weights: Option<Vec<f64>>,
}

impl DecisionTree {
    /// Validate `spec` against the model's feature count and output width.
    ///
    /// Children must point strictly forward (`child > parent`), which rules
    /// out cycles and guarantees traversal terminates.
    pub fn from_spec(spec: &TreeSpec, n_features: usize, value_width: usize) -> Result<Self> {
        let n = spec.children_left.len();
        if n == 0 {
            return Err(PlacementError::invalid_model("tree has no nodes"));
        }
        let lengths = [
            ("children_right", spec.children_right.len()),
            ("feature", spec.feature.len()),
            ("threshold", spec.threshold.len()),
            ("value", spec.value.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(PlacementError::invalid_model(format!(
                    "tree array {name} has {len} entries, expected {n}"
                )));
            }
        }
        for (name, arr) in [
            ("impurity", &spec.impurity),
            ("weighted_n_node_samples", &spec.weighted_n_node_samples),
        ] {
            if let Some(arr) = arr {
                if arr.len() != n {
                    return Err(PlacementError::invalid_model(format!(
                        "tree array {name} has {} entries, expected {n}",
                        arr.len()
                    )));
                }
            }
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = spec.children_left[i];
            let right = spec.children_right[i];
            if spec.value[i].len() != value_width {
                return Err(PlacementError::invalid_model(format!(
                    "node {i} has {} output values, expected {value_width}",
                    spec.value[i].len()
                )));
            }
            if spec.value[i].iter().any(|v| !v.is_finite()) {
                return Err(PlacementError::invalid_model(format!(
                    "node {i} has a non-finite output value"
                )));
            }

            if left == -1 {
                if right != -1 {
                    return Err(PlacementError::invalid_model(format!(
                        "node {i} has a right child but no left child"
                    )));
                }
                nodes.push(Node::Leaf);
                continue;
            }

            let child = |c: i64, side: &str| -> Result<usize> {
                if c <= i as i64 || c >= n as i64 {
                    Err(PlacementError::invalid_model(format!(
                        "node {i} has invalid {side} child {c}"
                    )))
                } else {
                    Ok(c as usize)
                }
            };
            let left = child(left, "left")?;
            let right = child(right, "right")?;

            let feature = spec.feature[i];
            if feature < 0 || feature >= n_features as i64 {
                return Err(PlacementError::invalid_model(format!(
                    "node {i} splits on feature {feature}, model has {n_features}"
                )));
            }
            let threshold = spec.threshold[i];
            if threshold.is_nan() {
                return Err(PlacementError::invalid_model(format!(
                    "node {i} has a NaN threshold"
                )));
            }
            nodes.push(Node::Split {
                feature: feature as usize,
                threshold,
                left,
                right,
            });
        }

        Ok(Self {
            nodes,
            values: spec.value.clone(),
            impurity: spec.impurity.clone(),
            weights: spec.weighted_n_node_samples.clone(),
        })
    }

    /// Number of nodes (splits and leaves).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Output values stored at leaves, in node order.
    pub fn leaf_values(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.nodes
            .iter()
            .zip(&self.values)
            .filter(|(node, _)| matches!(node, Node::Leaf))
            .map(|(_, v)| v.as_slice())
    }

    /// Route `features` to a leaf and return its output values.
    ///
    /// The caller guarantees `features.len()` covers every split feature.
    pub fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf => return &self.values[idx],
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Whether impurity statistics were exported with this tree.
    pub fn has_impurity_stats(&self) -> bool {
        self.impurity.is_some() && self.weights.is_some()
    }

    /// Add the number of splits on each feature into `counts`.
    pub fn accumulate_split_counts(&self, counts: &mut [f64]) {
        for node in &self.nodes {
            if let Node::Split { feature, .. } = node {
                counts[*feature] += 1.0;
            }
        }
    }

    /// Weighted impurity decrease per feature, divided by the root weight.
    ///
    /// Returns `None` when impurity statistics are missing.
    pub fn impurity_decrease(&self, n_features: usize) -> Option<Vec<f64>> {
        let impurity = self.impurity.as_ref()?;
        let weights = self.weights.as_ref()?;
        let mut out = vec![0.0; n_features];
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                out[feature] += weights[i] * impurity[i]
                    - weights[left] * impurity[left]
                    - weights[right] * impurity[right];
            }
        }
        let root = weights[0];
        if root > 0.0 {
            for v in &mut out {
                *v /= root;
            }
        }
        Some(out)
    }
}
