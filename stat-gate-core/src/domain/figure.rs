use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Boxplot,
    Histogram,
    QqPlot,
    Scatter,
    Bar,
}

/// Data-only visualization descriptor. An external rendering collaborator
/// turns each spec into an actual image; this engine never renders pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureSpec {
    pub chart_kind: ChartKind,
    pub title: String,
    /// Label -> numeric sequence, in insertion order for determinism.
    pub series: Vec<(String, Vec<f64>)>,
    pub x_label: String,
    pub y_label: String,
}

impl FigureSpec {
    pub fn new(
        chart_kind: ChartKind,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            chart_kind,
            title: title.into(),
            series: Vec::new(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }

    pub fn with_series(mut self, label: impl Into<String>, values: Vec<f64>) -> Self {
        self.series.push((label.into(), values));
        self
    }
}
