//! Text bar charts comparing strategies on one metric each.

use std::fmt::Write;

use crate::experiment::models::StrategySummary;

const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 18;

/// Goal shown in the chart title; rows meeting it get a check mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Above(f64),
    Below(f64),
}

impl Target {
    pub fn is_met(&self, value: f64) -> bool {
        match *self {
            Target::Above(t) => value > t,
            Target::Below(t) => value < t,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: &'static str,
    pub unit: &'static str,
    pub axis_max: f64,
    pub target: Target,
}

impl BarChart {
    pub fn render(&self, rows: &[(&str, f64)]) -> String {
        let mut out = String::new();
        let target_text = match self.target {
            Target::Above(t) => format!("target > {t}{}", self.unit),
            Target::Below(t) => format!("target < {t}{}", self.unit),
        };
        let _ = writeln!(out, "{} ({target_text})", self.title);

        for (label, value) in rows {
            let bar = "█".repeat(bar_len(*value, self.axis_max));
            let mark = if self.target.is_met(*value) { "✓" } else { " " };
            let _ = writeln!(
                out,
                "  {label:<lw$} {bar:<bw$} {value}{unit} {mark}",
                lw = LABEL_WIDTH,
                bw = BAR_WIDTH,
                unit = self.unit
            );
        }
        out
    }
}

fn bar_len(value: f64, axis_max: f64) -> usize {
    if axis_max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / axis_max) * BAR_WIDTH as f64)
        .round()
        .clamp(0.0, BAR_WIDTH as f64) as usize
}

/// Format compliance, parsing success, relevance and generation time charts
/// for every summary, in summary order.
pub fn render_charts(summaries: &[StrategySummary]) -> String {
    let rows = |metric: fn(&StrategySummary) -> f64| -> Vec<(&'static str, f64)> {
        summaries
            .iter()
            .map(|s| (s.strategy.label(), metric(s)))
            .collect()
    };
    let slowest = summaries.iter().map(|s| s.avg_time).fold(6.5_f64, f64::max);

    let charts = [
        (
            BarChart {
                title: "Format Compliance Score",
                unit: "",
                axis_max: 10.0,
                target: Target::Above(9.5),
            },
            rows(|s| s.avg_format),
        ),
        (
            BarChart {
                title: "Parsing Success Rate",
                unit: "%",
                axis_max: 100.0,
                target: Target::Above(95.0),
            },
            rows(|s| s.parse_success_rate),
        ),
        (
            BarChart {
                title: "Relevance to Job Description",
                unit: "",
                axis_max: 10.0,
                target: Target::Above(8.5),
            },
            rows(|s| s.avg_relevance),
        ),
        (
            BarChart {
                title: "Average Generation Time",
                unit: "s",
                axis_max: slowest,
                target: Target::Below(4.0),
            },
            rows(|s| s.avg_time),
        ),
    ];

    charts
        .iter()
        .map(|(chart, rows)| chart.render(rows))
        .collect::<Vec<_>>()
        .join("\n")
}
