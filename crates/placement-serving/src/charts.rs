//! Plotly figure descriptions for the dashboard.
//!
//! Figures are plain serde structs mirroring the Plotly.js JSON schema
//! (`{"data": [...], "layout": {...}}`). The server embeds them in the page
//! and the browser hands them to `Plotly.newPlot`.

use placement_core::analytics::{
    feature_importances, CorrelationMatrix, FeatureImportance, Histogram, OutcomeCounts,
};
use placement_core::dataset::{Column, PlacementDataset};
use placement_core::model::Classifier;
use placement_core::prediction::ProbabilityBand;
use serde::Serialize;

/// A complete Plotly figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// One Plotly trace, tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Indicator(IndicatorTrace),
    Pie(PieTrace),
    Bar(BarTrace),
    Heatmap(HeatmapTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
        }
    }

    pub fn centered(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: Some(0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeAxis {
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeStep {
    pub range: [f64; 2],
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub axis: GaugeAxis,
    pub bar: Marker,
    pub steps: Vec<GaugeStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorTrace {
    pub mode: String,
    pub value: f64,
    pub title: Title,
    pub gauge: Gauge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub texttemplate: String,
    pub sort: bool,
}

/// A bar position: numeric for histograms, categorical for named bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapTrace {
    pub z: Vec<Vec<Option<f64>>>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub text: Vec<Vec<String>>,
    pub texttemplate: String,
    pub colorscale: String,
    pub zmin: f64,
    pub zmax: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
}

const WHITE_GRID: &str = "#EBF0F8";

impl Layout {
    /// White background with light grid lines (Plotly's "plotly_white" look).
    pub fn white(title: Title) -> Self {
        Self {
            title: Some(title),
            xaxis: Some(AxisLayout {
                gridcolor: Some(WHITE_GRID.to_string()),
                ..Default::default()
            }),
            yaxis: Some(AxisLayout {
                gridcolor: Some(WHITE_GRID.to_string()),
                ..Default::default()
            }),
            paper_bgcolor: Some("white".to_string()),
            plot_bgcolor: Some("white".to_string()),
            bargap: None,
        }
    }
}

/// Dial showing the placement probability, colored by [`ProbabilityBand`].
pub fn gauge_figure(percent: f64) -> Figure {
    let steps = ProbabilityBand::all()
        .iter()
        .map(|band| GaugeStep {
            range: band.range(),
            color: band.color().to_string(),
        })
        .collect();

    Figure {
        data: vec![Trace::Indicator(IndicatorTrace {
            mode: "gauge+number".to_string(),
            value: percent,
            title: Title::new("Placement Probability"),
            gauge: Gauge {
                axis: GaugeAxis {
                    range: [0.0, 100.0],
                },
                bar: Marker {
                    color: "darkblue".to_string(),
                },
                steps,
            },
        })],
        layout: Layout::default(),
    }
}

/// Placed vs. not-placed share of the dataset.
pub fn outcome_pie(counts: &OutcomeCounts) -> Figure {
    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: vec!["Placed".to_string(), "Not Placed".to_string()],
            values: vec![counts.placed, counts.not_placed],
            texttemplate: "%{label}<br>%{percent:.1%}".to_string(),
            sort: false,
        })],
        layout: Layout {
            title: Some(Title::new("Placement Distribution")),
            ..Default::default()
        },
    }
}

/// Pre-binned histogram drawn as touching bars.
pub fn histogram_bars(hist: &Histogram, title: &str) -> Figure {
    let hovertext = hist
        .edges
        .windows(2)
        .zip(&hist.counts)
        .map(|(w, c)| format!("{:.1} to {:.1}: {}", w[0], w[1], c))
        .collect();

    Figure {
        data: vec![Trace::Bar(BarTrace {
            x: hist.centers().into_iter().map(AxisValue::Number).collect(),
            y: hist.counts.iter().map(|c| *c as f64).collect(),
            width: Some(hist.widths()),
            hovertext: Some(hovertext),
            marker: Some(Marker {
                color: "#1f77b4".to_string(),
            }),
        })],
        layout: Layout {
            title: Some(Title::new(title)),
            bargap: Some(0.0),
            ..Default::default()
        },
    }
}

/// Per-feature importance bars.
pub fn importance_bar(importances: &[FeatureImportance]) -> Figure {
    let mut layout = Layout::white(Title::centered("Feature Importance (Model Insight)"));
    if let Some(x) = layout.xaxis.as_mut() {
        x.title = Some(Title::new("Features"));
    }
    if let Some(y) = layout.yaxis.as_mut() {
        y.title = Some(Title::new("Importance Score"));
    }

    Figure {
        data: vec![Trace::Bar(BarTrace {
            x: importances
                .iter()
                .map(|i| AxisValue::Label(i.feature.clone()))
                .collect(),
            y: importances.iter().map(|i| i.score).collect(),
            width: None,
            hovertext: None,
            marker: None,
        })],
        layout,
    }
}

/// Correlation matrix as an annotated diverging heatmap.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Figure {
    let text = matrix
        .values
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| v.map(|r| format!("{r:.2}")).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut layout = Layout::white(Title::centered("Feature Correlation Matrix"));
    if let Some(y) = layout.yaxis.as_mut() {
        y.autorange = Some("reversed".to_string());
    }

    Figure {
        data: vec![Trace::Heatmap(HeatmapTrace {
            z: matrix.values.clone(),
            x: matrix.labels.clone(),
            y: matrix.labels.clone(),
            text,
            texttemplate: "%{text}".to_string(),
            colorscale: "RdBu".to_string(),
            zmin: -1.0,
            zmax: 1.0,
        })],
        layout,
    }
}

/// The four analytics charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsFigures {
    pub outcome: Figure,
    pub resume_scores: Figure,
    pub importance: Figure,
    pub correlation: Figure,
}

/// Dataset and model statistics together with their charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub rows: usize,
    pub outcome: OutcomeCounts,
    pub resume_scores: Histogram,
    pub correlation: CorrelationMatrix,
    pub importances: Vec<FeatureImportance>,
    pub figures: AnalyticsFigures,
}

impl AnalyticsReport {
    pub fn build(dataset: &PlacementDataset, model: &dyn Classifier, bins: usize) -> Self {
        let outcome = OutcomeCounts::from_dataset(dataset);
        let resume_scores = Histogram::compute(&dataset.column(Column::ResumeScore), bins);
        let correlation = CorrelationMatrix::compute(dataset);
        let importances = feature_importances(model);

        let figures = AnalyticsFigures {
            outcome: outcome_pie(&outcome),
            resume_scores: histogram_bars(&resume_scores, "Resume Score Analysis"),
            importance: importance_bar(&importances),
            correlation: correlation_heatmap(&correlation),
        };

        Self {
            rows: dataset.len(),
            outcome,
            resume_scores,
            correlation,
            importances,
            figures,
        }
    }
}
