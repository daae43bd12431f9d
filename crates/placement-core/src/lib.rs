//! Core types for the campus placement dashboard.
//!
//! This crate holds everything that does not depend on how the dashboard is
//! served:
//!
//! - **Features**: the five bounded student attributes and their validation.
//! - **Model**: pre-trained tree-ensemble classifiers loaded from JSON,
//!   exposed through the [`Classifier`] trait.
//! - **Prediction**: verdicts, gauge bands and recommendation tiers.
//! - **Dataset**: historical placement records parsed from CSV.
//! - **Analytics**: outcome counts, histograms, correlations and feature
//!   importances behind the dashboard charts.
//!
//! # Example
//!
//! ```
//! use placement_core::model::{ForestSpec, ModelSpec, TreeSpec};
//! use placement_core::{predict_placement, Recommendation, StudentProfile};
//!
//! let spec = ModelSpec::RandomForest(ForestSpec {
//!     n_features: 5,
//!     feature_names: None,
//!     classes: vec![0, 1],
//!     trees: vec![TreeSpec::leaf(vec![1.0, 4.0])],
//!     feature_importances: None,
//! });
//! let model = spec.build().unwrap();
//!
//! let profile = StudentProfile::new(8.4, 2, 5, 8, 90);
//! let result = predict_placement(model.as_ref(), &profile).unwrap();
//! assert_eq!(result.percent(), 80.0);
//! assert_eq!(result.recommendation(), Recommendation::High);
//! ```

pub mod analytics;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod prediction;

pub use analytics::{CorrelationMatrix, FeatureImportance, Histogram, OutcomeCounts};
pub use dataset::{Column, PlacementDataset, PlacementRecord};
pub use error::{PlacementError, Result};
pub use features::{FeatureBounds, StudentProfile, FEATURE_NAMES, NUM_FEATURES};
pub use model::{load_classifier, Classifier, ModelSpec};
pub use prediction::{
    predict_placement, PredictionResult, ProbabilityBand, Recommendation, Verdict,
};
