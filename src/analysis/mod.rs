//! Battery series analysis
//!
//! The one-shot pipeline over an ordered battery-percentage series: split the
//! series into monotonic-trend segments, compute per-segment drain statistics,
//! join user-logged events onto the samples they overlap, and project two
//! time-to-empty estimates. Every stage is a pure function of its inputs; the
//! whole run is a synchronous batch computation with no shared state.

pub mod events;
pub mod metrics;
pub mod prediction;
pub mod segmenter;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use events::{Event, EventCorrelation};
use prediction::PredictionSet;

pub use metrics::Segment;
pub use segmenter::SegmentSpan;

/// One battery reading: a fully resolved instant and a level in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub level: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, level: f64) -> Self {
        Self { timestamp, level }
    }
}

/// Trend direction of a segment, derived from the gradient sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    /// Battery level falling (negative gradient)
    Draining,
    /// Battery level rising (positive gradient)
    Charging,
    /// No net level change
    Flat,
}

impl Trend {
    pub fn of_gradient(gradient: f64) -> Self {
        if gradient < 0.0 {
            Trend::Draining
        } else if gradient > 0.0 {
            Trend::Charging
        } else {
            Trend::Flat
        }
    }
}

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Ordered trend segments partitioning the sample series
    pub segments: Vec<Segment>,
    /// One correlation per input event, in input order
    pub correlations: Vec<EventCorrelation>,
    /// The two time-to-empty projections, each absent when not applicable
    pub predictions: PredictionSet,
    /// Timestamp of the last sample; `None` when the input held no samples
    pub generated_at: Option<NaiveDateTime>,
}

impl AnalysisReport {
    /// Whether the run saw any samples at all
    pub fn has_data(&self) -> bool {
        self.generated_at.is_some()
    }

    fn no_data() -> Self {
        Self {
            segments: Vec::new(),
            correlations: Vec::new(),
            predictions: PredictionSet::default(),
            generated_at: None,
        }
    }
}

/// Run the full pipeline: segment, analyze, correlate, predict.
///
/// Samples must be ascending by timestamp with duplicates already dropped (the
/// loader guarantees this). A structurally empty input short-circuits into the
/// explicit no-data report; a single sample yields zero segments and no
/// predictions, but is not an error.
pub fn run(samples: &[Sample], events: &[Event], config: &AnalysisConfig) -> AnalysisReport {
    if samples.is_empty() {
        log::warn!("no battery samples to analyze");
        return AnalysisReport::no_data();
    }

    let spans = segmenter::split_segments(samples, config);
    let segments: Vec<Segment> = spans
        .iter()
        .map(|&span| metrics::analyze_span(samples, span))
        .collect();
    log::info!(
        "analyzed {} samples into {} segments",
        samples.len(),
        segments.len()
    );

    let correlations = events::correlate_events(samples, events);
    let predictions = prediction::predict(samples, &segments, config);

    AnalysisReport {
        segments,
        correlations,
        predictions,
        generated_at: samples.last().map(|s| s.timestamp),
    }
}
