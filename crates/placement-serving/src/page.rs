//! Server-side rendering of the dashboard page.
//!
//! The page is a single HTML document: header, sidebar form, optional
//! prediction result, analytics charts and footer. Charts are drawn in the
//! browser by Plotly.js from figure JSON embedded in the page.

use std::fmt::{self, Write};

use placement_core::features::{FeatureBounds, ALL_BOUNDS};
use placement_core::prediction::{PredictionResult, Recommendation, Verdict};
use placement_core::{StudentProfile, NUM_FEATURES};
use serde::Serialize;

use crate::charts::{gauge_figure, AnalyticsFigures, Figure};
use crate::error::{ServingError, ServingResult};

/// Headline shown at the top of every page.
pub const HEADLINE: &str = "AI Smart Campus Placement Intelligence Dashboard";

const FOOTER: &str = "Final Year AI Dashboard Project";

const STYLE: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", Helvetica, Arial, sans-serif; color: #31333f; }
header h1 { text-align: center; color: #1f4e79; margin: 1rem 0 0.5rem; }
.layout { display: flex; align-items: flex-start; }
aside { width: 280px; min-height: 100vh; padding: 1.5rem; background: #f0f2f6; box-sizing: border-box; }
aside label { display: block; margin-top: 0.8rem; font-size: 0.9rem; }
aside input { width: 100%; padding: 0.4rem; box-sizing: border-box; }
aside button { margin-top: 1.2rem; width: 100%; padding: 0.6rem; background: #ff4b4b; color: white; border: 0; border-radius: 0.4rem; cursor: pointer; }
main { flex: 1; padding: 0 2rem 2rem; }
.row { display: flex; gap: 2rem; }
.row > div { flex: 1; min-width: 0; }
.notice { padding: 0.8rem 1rem; border-radius: 0.4rem; margin: 0.6rem 0; }
.notice.success { background: #dff5e3; color: #177233; }
.notice.warning { background: #fff6d6; color: #926c05; }
.notice.error { background: #ffe2e0; color: #9d1c15; }
.chart { width: 100%; min-height: 420px; }
footer { text-align: center; padding: 1rem; border-top: 1px solid #ddd; }
"#;

/// Prediction area state.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionPanel {
    /// A successful prediction.
    Result(PredictionResult),
    /// The submitted form was rejected.
    Rejected(String),
}

/// Analytics area state.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsPanel {
    Ready(Box<AnalyticsFigures>),
    /// The dataset could not be loaded; only this section degrades.
    Unavailable(String),
}

/// Everything needed to render one dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardPage<'a> {
    pub title: &'a str,
    pub plotly_js_url: &'a str,
    /// Raw form values in feature order, echoed back into the inputs.
    pub form_values: [String; NUM_FEATURES],
    pub prediction: Option<PredictionPanel>,
    pub analytics: AnalyticsPanel,
}

/// Form values for a profile, in feature order.
pub fn form_values(profile: &StudentProfile) -> [String; NUM_FEATURES] {
    profile.to_features().map(|v| v.to_string())
}

impl DashboardPage<'_> {
    /// Render the full HTML document.
    pub fn render(&self) -> ServingResult<String> {
        let mut scripts = Vec::new();
        let mut html = String::with_capacity(16 * 1024);

        write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{}</title>\n<script src=\"{}\"></script>\n<style>{}</style>\n</head>\n<body>\n",
            html_escape(self.title),
            html_escape(self.plotly_js_url),
            STYLE
        )?;
        write!(
            html,
            "<header><h1>&#127891; {}</h1><hr></header>\n<div class=\"layout\">\n",
            HEADLINE
        )?;

        self.render_form(&mut html)?;

        html.push_str("<main>\n");
        match &self.prediction {
            Some(PredictionPanel::Result(result)) => {
                render_result(&mut html, &mut scripts, result)?;
            }
            Some(PredictionPanel::Rejected(message)) => {
                write!(
                    html,
                    "<section id=\"prediction\"><div class=\"notice error\">{}</div></section>\n",
                    html_escape(message)
                )?;
            }
            None => {}
        }
        render_analytics(&mut html, &mut scripts, &self.analytics)?;
        html.push_str("</main>\n</div>\n");

        writeln!(html, "<footer>&#9989; {} &#127891;</footer>", FOOTER)?;
        for script in scripts {
            writeln!(html, "<script>{}</script>", script)?;
        }
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn render_form(&self, html: &mut String) -> fmt::Result {
        html.push_str(
            "<aside>\n<h2>&#127891; Student Input Details</h2>\n\
             <form id=\"student_form\" method=\"post\" action=\"/predict\">\n",
        );
        for (bounds, value) in ALL_BOUNDS.iter().zip(&self.form_values) {
            render_input(html, bounds, value)?;
        }
        html.push_str(
            "<button type=\"submit\">&#128302; Predict Placement</button>\n</form>\n</aside>\n",
        );
        Ok(())
    }
}

fn render_input(html: &mut String, bounds: &FeatureBounds, value: &str) -> fmt::Result {
    write!(
        html,
        "<label for=\"{name}\">{label}</label>\n\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" \
         step=\"{step}\" value=\"{value}\" required>\n",
        name = bounds.name,
        label = html_escape(bounds.label),
        min = bounds.min,
        max = bounds.max,
        step = bounds.step,
        value = html_escape(value),
    )
}

fn render_result(
    html: &mut String,
    scripts: &mut Vec<String>,
    result: &PredictionResult,
) -> ServingResult<()> {
    let verdict = result.verdict();
    let (verdict_class, verdict_icon) = match verdict {
        Verdict::Placed => ("success", "&#127881;"),
        Verdict::NotPlaced => ("error", "&#10060;"),
    };
    let recommendation = result.recommendation();
    let recommendation_class = match recommendation {
        Recommendation::Low => "error",
        Recommendation::Moderate => "warning",
        Recommendation::High => "success",
    };
    let recommendation_icon = if recommendation.is_warning() {
        "&#9888; "
    } else {
        ""
    };

    write!(
        html,
        "<section id=\"prediction\">\n<h2>&#9989; Prediction Result</h2>\n<div class=\"row\">\n\
         <div><div class=\"notice {}\">{} {}</div></div>\n\
         <div><div id=\"gauge\" class=\"chart\"></div></div>\n</div>\n\
         <div class=\"notice {}\">{}{}</div>\n</section>\n",
        verdict_class,
        verdict_icon,
        html_escape(verdict.message()),
        recommendation_class,
        recommendation_icon,
        html_escape(recommendation.message()),
    )?;
    scripts.push(plot_script("gauge", &gauge_figure(result.percent()))?);
    Ok(())
}

fn render_analytics(
    html: &mut String,
    scripts: &mut Vec<String>,
    analytics: &AnalyticsPanel,
) -> ServingResult<()> {
    html.push_str(
        "<section id=\"analytics\">\n<hr>\n<h2>&#128200; Placement Analytics Dashboard</h2>\n",
    );

    let figures = match analytics {
        AnalyticsPanel::Ready(figures) => figures,
        AnalyticsPanel::Unavailable(message) => {
            write!(
                html,
                "<div class=\"notice error\">{}</div>\n</section>\n",
                html_escape(message)
            )?;
            return Ok(());
        }
    };

    html.push_str(
        "<div class=\"row\">\n\
         <div><h3>&#9989; Placement Distribution</h3><div id=\"outcome-chart\" class=\"chart\"></div></div>\n\
         <div><h3>&#128196; Resume Score Analysis</h3><div id=\"resume-chart\" class=\"chart\"></div></div>\n\
         </div>\n\
         <h3>&#128202; Feature Importance Analysis</h3><div id=\"importance-chart\" class=\"chart\"></div>\n\
         <h3>&#128293; Correlation Heatmap</h3><div id=\"correlation-chart\" class=\"chart\"></div>\n\
         </section>\n",
    );
    scripts.push(plot_script("outcome-chart", &figures.outcome)?);
    scripts.push(plot_script("resume-chart", &figures.resume_scores)?);
    scripts.push(plot_script("importance-chart", &figures.importance)?);
    scripts.push(plot_script("correlation-chart", &figures.correlation)?);
    Ok(())
}

fn plot_script(element_id: &str, figure: &Figure) -> ServingResult<String> {
    Ok(format!(
        "(function(){{var f={};Plotly.newPlot(\"{}\",f.data,f.layout,{{responsive:true}});}})();",
        embed_json(figure)?,
        element_id
    ))
}

/// Serialize `value` for inclusion inside a `<script>` element.
///
/// `</` is escaped so embedded strings cannot close the script tag.
pub fn embed_json<T: Serialize>(value: &T) -> ServingResult<String> {
    let json = serde_json::to_string(value)
        .map_err(|e| ServingError::internal(format!("failed to encode figure: {e}")))?;
    Ok(json.replace("</", "<\\/"))
}

/// Escape text for HTML element content and quoted attributes.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
