//! Result rendering
//!
//! Pure functions from a workflow's state to what the operator sees: an
//! HTML fragment, or a label with its color.

use crate::display::{display_color, DisplayColor, ResultLabel};
use crate::models::ClusteringResult;
use crate::view_state::{ClusteringState, PhoneticState, PredictionState, WorkflowState};
use beard_common::Lifecycle;
use std::fmt;

/// A single colored label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelView {
    pub text: String,
    pub color: DisplayColor,
}

impl LabelView {
    pub fn new(label: &ResultLabel) -> Self {
        Self {
            text: label.text(),
            color: display_color(label),
        }
    }

    /// Centered heading in the label's color
    pub fn to_html(&self) -> String {
        format!(
            r#"<h1 class="text-center" style="color: {};">{}</h1>"#,
            self.color.hex(),
            escape_html(&self.text)
        )
    }
}

impl fmt::Display for LabelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.color)
    }
}

/// Result table for a clustering response
///
/// One row per cluster; the second cell joins the signature ids with `", "`
/// in the order the service returned them.
pub fn clustering_table_html(result: &ClusteringResult) -> String {
    let mut html = String::from(
        "<table class=\"table\"><thead><tr>\
         <th>Person #</th><th>Signatures</th></tr></thead><tbody>",
    );

    for cluster in &result.clusters {
        html.push_str(&format!(
            "<tr><th scope=\"row\">{}</th><td>{}</td></tr>",
            escape_html(&cluster.label),
            escape_html(&cluster.signature_ids.join(", "))
        ));
    }

    html.push_str("</tbody></table>");
    html
}

/// Clustering panel: placeholder, failure heading or the stored table
pub fn render_clustering(state: &ClusteringState) -> String {
    if state.lifecycle == Lifecycle::Failed {
        return LabelView::new(&failed_label(state)).to_html();
    }

    match &state.result {
        Some(view) => view.table_html.clone(),
        None => LabelView::new(&ResultLabel::Idle).to_html(),
    }
}

/// Clustering panel as plain text, one `label: ids` line per cluster
pub fn render_clustering_text(state: &ClusteringState) -> String {
    if state.lifecycle == Lifecycle::Failed {
        return LabelView::new(&failed_label(state)).to_string();
    }

    match &state.result {
        Some(view) => view
            .clusters
            .clusters
            .iter()
            .map(|c| format!("{}: {}", c.label, c.signature_ids.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
        None => LabelView::new(&ResultLabel::Idle).to_string(),
    }
}

/// Phonetic panel: the code (or "Idle") in the workflow's color
pub fn render_phonetic_block(state: &PhoneticState) -> LabelView {
    if state.lifecycle == Lifecycle::Failed {
        return LabelView::new(&failed_label(state));
    }

    let label = match &state.result {
        Some(view) => ResultLabel::Phonetic(view.code.clone()),
        None => ResultLabel::Idle,
    };
    LabelView {
        text: label.text(),
        color: state.color,
    }
}

/// Prediction panel: the decision (or "Idle") in the workflow's color
pub fn render_prediction(state: &PredictionState) -> LabelView {
    if state.lifecycle == Lifecycle::Failed {
        return LabelView::new(&failed_label(state));
    }

    let label = match &state.result {
        Some(view) => ResultLabel::Decision(view.decision.clone()),
        None => ResultLabel::Idle,
    };
    LabelView {
        text: label.text(),
        color: state.color,
    }
}

fn failed_label<I, R>(state: &WorkflowState<I, R>) -> ResultLabel {
    ResultLabel::Failed(
        state
            .error
            .clone()
            .unwrap_or_else(|| "Request failed".to_string()),
    )
}

/// Escape text for an HTML element body or attribute
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
