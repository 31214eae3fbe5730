//! Per-segment gradient and variability statistics

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analysis::segmenter::SegmentSpan;
use crate::analysis::{Sample, Trend};

/// One analyzed trend segment of the sample series
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    /// Index of the first sample in the segment
    pub start_index: usize,
    /// Index of the last sample, shared with the next segment's first
    pub end_index: usize,
    pub start: Sample,
    pub end: Sample,
    pub duration_hours: f64,
    /// Signed %/hour over the whole segment; `None` when the segment spans no time
    pub average_gradient: Option<f64>,
    /// Population standard deviation of the per-step gradients within the segment
    pub variability: f64,
}

impl Segment {
    pub fn trend(&self) -> Option<Trend> {
        self.average_gradient.map(Trend::of_gradient)
    }

    pub fn is_draining(&self) -> bool {
        matches!(self.trend(), Some(Trend::Draining))
    }

    pub fn sample_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }
}

/// Elapsed time between two instants in fractional hours (negative when reversed)
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

/// Instantaneous gradient between two consecutive samples in %/hour.
///
/// `None` when no time passed between the samples, so a duplicated timestamp
/// can never divide by zero downstream.
pub fn gradient_between(a: &Sample, b: &Sample) -> Option<f64> {
    let hours = hours_between(a.timestamp, b.timestamp);
    if hours <= 0.0 {
        return None;
    }
    Some((b.level - a.level) / hours)
}

/// Per-step gradients over a sample run, zero-duration steps skipped
pub fn step_gradients(samples: &[Sample]) -> Vec<f64> {
    samples
        .windows(2)
        .filter_map(|pair| gradient_between(&pair[0], &pair[1]))
        .collect()
}

/// Compute the metrics for one segment span.
pub fn analyze_span(samples: &[Sample], span: SegmentSpan) -> Segment {
    let start = samples[span.start];
    let end = samples[span.end];
    let steps = step_gradients(&samples[span.start..=span.end]);
    // A single defined step has nothing to vary against
    let variability = if steps.len() > 1 {
        population_std_dev(&steps)
    } else {
        0.0
    };

    Segment {
        start_index: span.start,
        end_index: span.end,
        start,
        end,
        duration_hours: hours_between(start.timestamp, end.timestamp),
        average_gradient: gradient_between(&start, &end),
        variability,
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
