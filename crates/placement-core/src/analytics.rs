//! Descriptive statistics over the historical dataset.
//!
//! Nothing here feeds back into the model: these are the numbers behind the
//! dashboard's analytics charts.

use serde::{Deserialize, Serialize};

use crate::dataset::{Column, PlacementDataset};
use crate::model::Classifier;

/// Placed vs. not-placed row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub placed: usize,
    pub not_placed: usize,
}

impl OutcomeCounts {
    pub fn from_dataset(dataset: &PlacementDataset) -> Self {
        let placed = dataset.records().iter().filter(|r| r.placed).count();
        Self {
            placed,
            not_placed: dataset.len() - placed,
        }
    }

    pub fn total(&self) -> usize {
        self.placed + self.not_placed
    }

    /// Share of placed students; `0.0` for an empty dataset.
    pub fn placed_fraction(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.placed as f64 / self.total() as f64
        }
    }
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` monotonically increasing bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Every bin is half-open except the last, which also takes values equal
    /// to the maximum. A zero-width range is widened to `[v - 0.5, v + 0.5]`,
    /// and an empty input spans `[0, 1]`. Non-finite values are skipped.
    /// A `bins` of zero is treated as one.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        let (mut lo, mut hi) = if finite.is_empty() {
            (0.0, 1.0)
        } else {
            finite.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; bins];
        for v in finite {
            let mut idx = ((v - lo) / width) as usize;
            if idx >= bins {
                idx = bins - 1;
            }
            // Guard against rounding putting a value one bin off its edge.
            if v < edges[idx] && idx > 0 {
                idx -= 1;
            } else if idx + 1 < bins && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Midpoint of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Width of each bin.
    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Pairwise Pearson correlations between dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major cells. `None` marks a pair involving a constant column,
    /// where the correlation is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of the six dataset columns.
    pub fn compute(dataset: &PlacementDataset) -> Self {
        let columns = Column::all();
        let data: Vec<Vec<f64>> = columns.iter().map(|c| dataset.column(*c)).collect();
        let labels = columns.iter().map(|c| c.header().to_string()).collect();
        Self::from_columns(labels, &data)
    }

    /// Correlate equally long columns.
    pub fn from_columns(labels: Vec<String>, columns: &[Vec<f64>]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let r = pearson(&columns[i], &columns[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self { labels, values }
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

/// Pearson correlation, clamped to `[-1, 1]`. `None` when either side has
/// zero variance or there are fewer than two points.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// One bar of the importance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub score: f64,
}

/// Pair the model's importance scores with its feature names.
pub fn feature_importances(model: &dyn Classifier) -> Vec<FeatureImportance> {
    model
        .feature_names()
        .iter()
        .zip(model.feature_importances())
        .map(|(name, score)| FeatureImportance {
            feature: name.clone(),
            score: *score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PlacementRecord;

    fn record(cgpa: f64, internships: f64, resume: f64, placed: bool) -> PlacementRecord {
        PlacementRecord {
            cgpa,
            internships,
            projects: internships * 2.0,
            communication: 5.0,
            resume_score: resume,
            placed,
        }
    }

    fn dataset() -> PlacementDataset {
        PlacementDataset::new(vec![
            record(8.5, 2.0, 82.0, true),
            record(6.1, 0.0, 40.0, false),
            record(7.2, 1.0, 65.0, true),
            record(5.5, 0.0, 30.0, false),
            record(9.1, 3.0, 95.0, true),
        ])
    }

    #[test]
    fn test_outcome_counts_sum_to_rows() {
        let ds = dataset();
        let counts = OutcomeCounts::from_dataset(&ds);
        assert_eq!(counts.placed, 3);
        assert_eq!(counts.not_placed, 2);
        assert_eq!(counts.total(), ds.len());
        assert!((counts.placed_fraction() - 0.6).abs() < 1e-12);

        let empty = OutcomeCounts::from_dataset(&PlacementDataset::default());
        assert_eq!(empty.total(), 0);
        assert_eq!(empty.placed_fraction(), 0.0);
    }

    #[test]
    fn test_histogram_edges_and_counts() {
        let values = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 100.0];
        let hist = Histogram::compute(&values, 5);
        assert_eq!(hist.edges, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        // 20 and 40 land in the bin they open; 100 lands in the closed last bin.
        assert_eq!(hist.counts, vec![2, 2, 2, 0, 1]);
        assert_eq!(hist.total(), values.len());
        assert_eq!(hist.centers()[0], 10.0);
        assert_eq!(hist.widths(), vec![20.0; 5]);
    }

    #[test]
    fn test_histogram_degenerate_ranges() {
        let hist = Histogram::compute(&[42.0, 42.0], 5);
        assert_eq!(hist.edges[0], 41.5);
        assert_eq!(hist.edges[5], 42.5);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.counts[2], 2);

        let hist = Histogram::compute(&[], 5);
        assert_eq!(hist.edges[0], 0.0);
        assert_eq!(hist.edges[5], 1.0);
        assert_eq!(hist.total(), 0);

        let hist = Histogram::compute(&[1.0, 2.0], 0);
        assert_eq!(hist.bins(), 1);
        assert_eq!(hist.counts, vec![2]);
    }

    #[test]
    fn test_histogram_counts_match_dataset_rows() {
        let ds = dataset();
        let hist = Histogram::compute(&ds.column(Column::ResumeScore), 5);
        assert_eq!(hist.total(), ds.len());
    }

    #[test]
    fn test_correlation_symmetric_unit_diagonal() {
        let matrix = CorrelationMatrix::compute(&dataset());
        assert_eq!(matrix.size(), 6);
        assert_eq!(matrix.labels[5], "Placed");
        for i in 0..matrix.size() {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in 0..matrix.size() {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                if let Some(r) = matrix.get(i, j) {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
        // Communication is constant in the fixture.
        assert_eq!(matrix.get(3, 0), None);
        // Internships and Projects are perfectly linear.
        assert!((matrix.get(1, 2).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
    }
}
