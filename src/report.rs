//! Plain-text rendering of an analysis report
//!
//! The presentation adapter: formats segments, event correlations, and both
//! projections for the terminal. Chart output is out of scope.

use chrono::NaiveDateTime;

use crate::analysis::events::EventCorrelation;
use crate::analysis::prediction::{Prediction, ProjectedEmpty};
use crate::analysis::{AnalysisReport, Segment, Trend};

/// Timestamp format used throughout the report
const TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Render the whole report as terminal text.
pub fn render_text(report: &AnalysisReport) -> String {
    let Some(generated_at) = report.generated_at else {
        return "No battery data found to process.\n".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Battery usage report (as of {})\n",
        generated_at.format(TIME_FORMAT)
    ));

    out.push_str("\nSegments:\n");
    if report.segments.is_empty() {
        out.push_str("  (not enough samples to form a segment)\n");
    }
    for segment in &report.segments {
        out.push_str(&segment_line(segment));
    }

    if !report.correlations.is_empty() {
        out.push_str("\nEvents:\n");
        for correlation in &report.correlations {
            out.push_str(&correlation_line(correlation));
        }
    }

    out.push_str("\nPredictions:\n");
    out.push_str(&prediction_line(
        "Current trend",
        report.predictions.current_trend.as_ref(),
    ));
    out.push_str(&prediction_line(
        "Last 48h usage",
        report.predictions.recent_usage.as_ref(),
    ));

    out
}

fn segment_line(segment: &Segment) -> String {
    let trend = match segment.trend() {
        Some(Trend::Draining) => "drain",
        Some(Trend::Charging) => "charge",
        Some(Trend::Flat) => "flat",
        None => "n/a",
    };
    let gradient = match segment.average_gradient {
        Some(g) => format!("{:+.2} %/h", g),
        None => "n/a".to_string(),
    };
    format!(
        "  {} -> {}  {:6}  {}  (variability {:.2})\n",
        segment.start.timestamp.format(TIME_FORMAT),
        segment.end.timestamp.format(TIME_FORMAT),
        trend,
        gradient,
        segment.variability
    )
}

fn correlation_line(correlation: &EventCorrelation) -> String {
    let gradient = match correlation.gradient {
        Some(g) => format!("{:+.2} %/h over {} samples", g, correlation.sample_count),
        None => format!("n/a ({} samples in window)", correlation.sample_count),
    };
    format!(
        "  {}  {} -> {}  {}\n",
        correlation.event.label,
        correlation.event.start.format(TIME_FORMAT),
        correlation.event.end.format(TIME_FORMAT),
        gradient
    )
}

fn prediction_line(name: &str, prediction: Option<&Prediction>) -> String {
    let Some(prediction) = prediction else {
        return format!("  {}: not applicable\n", name);
    };
    match prediction.projected_empty {
        ProjectedEmpty::At(at) => format!(
            "  {}: {:+.2} %/h, empty in {} ({})\n",
            name,
            prediction.basis_gradient,
            format_time_left(prediction.generated_at, at),
            at.format(TIME_FORMAT)
        ),
        ProjectedEmpty::Never => format!(
            "  {}: {:+.2} %/h, never empties\n",
            name, prediction.basis_gradient
        ),
        ProjectedEmpty::AlreadyEmpty => format!("  {}: already empty\n", name),
    }
}

fn format_time_left(from: NaiveDateTime, to: NaiveDateTime) -> String {
    let minutes = (to - from).num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{run, Sample};
    use crate::config::AnalysisConfig;
    use chrono::NaiveDate;

    fn ts(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 24)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn test_no_data_report() {
        let report = run(&[], &[], &AnalysisConfig::default());
        assert_eq!(render_text(&report), "No battery data found to process.\n");
    }

    #[test]
    fn test_report_mentions_not_applicable_predictions() {
        // Charging tail: current trend does not apply, recent usage still
        // sees the earlier drain
        let samples = vec![
            Sample::new(ts(10, 0), 80.0),
            Sample::new(ts(12, 0), 60.0),
            Sample::new(ts(13, 0), 90.0),
        ];
        let report = run(&samples, &[], &AnalysisConfig::default());
        let text = render_text(&report);
        assert!(text.contains("Current trend: not applicable"));
        assert!(text.contains("Last 48h usage: -10.00 %/h"));
    }

    #[test]
    fn test_format_time_left() {
        assert_eq!(format_time_left(ts(10, 0), ts(12, 30)), "2h 30m");
        assert_eq!(format_time_left(ts(10, 0), ts(10, 0)), "0h 0m");
    }
}
