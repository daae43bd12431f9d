//! Student attributes fed to the placement classifier.
//!
//! A [`StudentProfile`] holds the five inputs collected by the dashboard form.
//! [`StudentProfile::to_features`] flattens them into the fixed column order
//! the classifier was trained on ([`FEATURE_NAMES`]).

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

/// Number of model input features.
pub const NUM_FEATURES: usize = 5;

/// Column names in model input order.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "CGPA",
    "Internships",
    "Projects",
    "Communication",
    "ResumeScore",
];

/// Declared input range for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureBounds {
    /// Form field name (also the serde field name of [`StudentProfile`]).
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    /// Inclusive minimum.
    pub min: f64,
    /// Inclusive maximum.
    pub max: f64,
    /// Increment used by the input widget.
    pub step: f64,
}

impl FeatureBounds {
    /// Whether `value` lies within the inclusive range.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Like [`contains`](Self::contains), reporting the violation.
    pub fn check(&self, value: f64) -> Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(PlacementError::OutOfRange {
                field: self.label,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const CGPA_BOUNDS: FeatureBounds = FeatureBounds {
    name: "cgpa",
    label: "CGPA",
    min: 5.0,
    max: 10.0,
    step: 0.1,
};

pub const INTERNSHIPS_BOUNDS: FeatureBounds = FeatureBounds {
    name: "internships",
    label: "Internships",
    min: 0.0,
    max: 5.0,
    step: 1.0,
};

pub const PROJECTS_BOUNDS: FeatureBounds = FeatureBounds {
    name: "projects",
    label: "Projects",
    min: 0.0,
    max: 10.0,
    step: 1.0,
};

pub const COMMUNICATION_BOUNDS: FeatureBounds = FeatureBounds {
    name: "communication",
    label: "Communication Skills (1-10)",
    min: 1.0,
    max: 10.0,
    step: 1.0,
};

pub const RESUME_SCORE_BOUNDS: FeatureBounds = FeatureBounds {
    name: "resume_score",
    label: "Resume Score (0-100)",
    min: 0.0,
    max: 100.0,
    step: 1.0,
};

/// All field bounds in model input order.
pub const ALL_BOUNDS: [FeatureBounds; NUM_FEATURES] = [
    CGPA_BOUNDS,
    INTERNSHIPS_BOUNDS,
    PROJECTS_BOUNDS,
    COMMUNICATION_BOUNDS,
    RESUME_SCORE_BOUNDS,
];

/// The five attributes describing one student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub cgpa: f64,
    pub internships: u32,
    pub projects: u32,
    pub communication: u32,
    pub resume_score: u32,
}

impl Default for StudentProfile {
    /// Every field starts at its minimum, like a fresh form.
    fn default() -> Self {
        Self {
            cgpa: CGPA_BOUNDS.min,
            internships: INTERNSHIPS_BOUNDS.min as u32,
            projects: PROJECTS_BOUNDS.min as u32,
            communication: COMMUNICATION_BOUNDS.min as u32,
            resume_score: RESUME_SCORE_BOUNDS.min as u32,
        }
    }
}

impl StudentProfile {
    /// Create a profile without validating it.
    pub fn new(
        cgpa: f64,
        internships: u32,
        projects: u32,
        communication: u32,
        resume_score: u32,
    ) -> Self {
        Self {
            cgpa,
            internships,
            projects,
            communication,
            resume_score,
        }
    }

    /// Check every field against its declared range.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::OutOfRange`] for the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (bounds, value) in ALL_BOUNDS.iter().zip(self.to_features()) {
            bounds.check(value)?;
        }
        Ok(())
    }

    /// Feature vector in [`FEATURE_NAMES`] order.
    pub fn to_features(&self) -> [f64; NUM_FEATURES] {
        [
            self.cgpa,
            f64::from(self.internships),
            f64::from(self.projects),
            f64::from(self.communication),
            f64::from(self.resume_score),
        ]
    }
}
