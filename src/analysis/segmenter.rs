//! Trend-change segmentation of the battery sample series
//!
//! Walks consecutive sample pairs and closes the open segment whenever the
//! instantaneous gradient flips sign (drain to charge or back) or, within one
//! trend, drifts from the open segment's running average by more than the
//! configured relative tolerance. The boundary sample ends one segment and
//! starts the next, so adjacent segments share exactly that index and the
//! spans partition the whole series.

use serde::Serialize;

use crate::analysis::{metrics, Sample};
use crate::config::AnalysisConfig;

/// Contiguous index range of one trend segment, endpoints inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentSpan {
    pub start: usize,
    pub end: usize,
}

/// Gradient sign of an established trend; zero gradients carry no sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Negative,
    Positive,
}

impl Sign {
    fn of(gradient: f64) -> Option<Sign> {
        if gradient < 0.0 {
            Some(Sign::Negative)
        } else if gradient > 0.0 {
            Some(Sign::Positive)
        } else {
            None
        }
    }
}

/// State of the open segment, carried by value through the fold
#[derive(Debug, Clone, Copy)]
struct SpanAccumulator {
    start: usize,
    sign: Option<Sign>,
}

impl SpanAccumulator {
    fn begin(start: usize) -> Self {
        Self { start, sign: None }
    }

    /// Absorb one step gradient; the first non-flat step establishes the sign
    fn extended(self, step: f64) -> Self {
        Self {
            start: self.start,
            sign: self.sign.or_else(|| Sign::of(step)),
        }
    }
}

/// Split the ordered sample series into trend segments.
///
/// Fewer than two samples yield no spans. Pairs with zero elapsed time have an
/// undefined gradient and fold into the open segment without being considered
/// for a boundary. The first sample always starts span 0 and the last sample
/// always ends the final span, so the output is deterministic for a given
/// input and configuration.
pub fn split_segments(samples: &[Sample], config: &AnalysisConfig) -> Vec<SegmentSpan> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut acc = SpanAccumulator::begin(0);

    for i in 0..samples.len() - 1 {
        let step = match metrics::gradient_between(&samples[i], &samples[i + 1]) {
            Some(gradient) => gradient,
            None => continue,
        };

        if is_boundary(samples, &acc, i, step, config) {
            spans.push(SegmentSpan {
                start: acc.start,
                end: i,
            });
            acc = SpanAccumulator::begin(i);
        }
        acc = acc.extended(step);
    }

    spans.push(SegmentSpan {
        start: acc.start,
        end: samples.len() - 1,
    });
    spans
}

/// Decide whether the step leaving index `i` ends the open segment there.
fn is_boundary(
    samples: &[Sample],
    acc: &SpanAccumulator,
    i: usize,
    step: f64,
    config: &AnalysisConfig,
) -> bool {
    // (a) trend reversal
    if let (Some(open), Some(current)) = (acc.sign, Sign::of(step)) {
        if open != current {
            log::debug!(
                "trend flip at {} ({:+.2} %/h)",
                samples[i + 1].timestamp,
                step
            );
            return true;
        }
    }

    // (b) rate-regime change within one trend, once the open segment has
    // enough history for its average to mean something
    let open_hours = metrics::hours_between(samples[acc.start].timestamp, samples[i].timestamp);
    if open_hours <= 0.0 || open_hours < config.min_segment_hours {
        return false;
    }
    let running_average = (samples[i].level - samples[acc.start].level) / open_hours;
    if (step - running_average).abs() > config.gradient_tolerance * running_average.abs() {
        log::debug!(
            "rate change at {} ({:+.2} -> {:+.2} %/h)",
            samples[i + 1].timestamp,
            running_average,
            step
        );
        return true;
    }

    false
}
