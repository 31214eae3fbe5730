//! Event correlation against the battery sample series
//!
//! A read-only join: each event is mapped onto the samples whose timestamps
//! fall inside its window and gets the average gradient over that sub-range.
//! Events never move segment boundaries and are independent of each other.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::analysis::{metrics, Sample};

/// A labeled time interval logged by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Color the presentation layer should use for this event
    pub color: String,
}

impl Event {
    /// Build an event from its start and length, the way event logs record them
    pub fn new(
        label: impl Into<String>,
        color: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: i64,
    ) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
            start,
            end: start + Duration::minutes(duration_minutes),
        }
    }
}

/// An event joined with the gradient of the samples it overlaps
#[derive(Debug, Clone, Serialize)]
pub struct EventCorrelation {
    pub event: Event,
    /// Average %/hour over the overlapped sub-range; `None` when fewer than
    /// two samples fall inside the event window
    pub gradient: Option<f64>,
    /// First and last sample inside the window, for drawing the trend line
    pub endpoints: Option<(Sample, Sample)>,
    /// How many samples the window covered
    pub sample_count: usize,
}

/// Correlate every event against the sample series, in input order.
pub fn correlate_events(samples: &[Sample], events: &[Event]) -> Vec<EventCorrelation> {
    events
        .iter()
        .map(|event| correlate(samples, event))
        .collect()
}

fn correlate(samples: &[Sample], event: &Event) -> EventCorrelation {
    // Samples are ascending, so the window is a contiguous run; both bounds inclusive
    let lo = samples.partition_point(|s| s.timestamp < event.start);
    let hi = samples.partition_point(|s| s.timestamp <= event.end);
    let inside = &samples[lo..hi];

    if inside.len() < 2 {
        log::debug!(
            "event '{}' covers {} samples, gradient undefined",
            event.label,
            inside.len()
        );
        return EventCorrelation {
            event: event.clone(),
            gradient: None,
            endpoints: None,
            sample_count: inside.len(),
        };
    }

    let first = inside[0];
    let last = inside[inside.len() - 1];
    EventCorrelation {
        event: event.clone(),
        gradient: metrics::gradient_between(&first, &last),
        endpoints: Some((first, last)),
        sample_count: inside.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 24)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn test_event_end_derived_from_duration() {
        let event = Event::new("Workout", "blue", ts(17, 46), 17);
        assert_eq!(event.end, ts(18, 3));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let samples = vec![
            Sample::new(ts(10, 0), 50.0),
            Sample::new(ts(11, 0), 45.0),
            Sample::new(ts(12, 0), 40.0),
        ];
        let event = Event::new("Session", "red", ts(10, 0), 120);
        let correlation = correlate(&samples, &event);

        assert_eq!(correlation.sample_count, 3);
        assert_eq!(correlation.gradient, Some(-5.0));
    }
}
