//! Time-to-empty projections from the analyzed segments
//!
//! Two independent linear projections anchored at the last sample: one from
//! the most recent segment's gradient ("if the current drain keeps up"), one
//! from the duration-weighted average drain over the recent-usage window
//! ("at my usual rate"). Charging and flat segments never contribute to the
//! second basis: it measures usage rate, not net rate. Each projection also
//! carries a discretized depletion curve for staircase-style rendering.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::analysis::{metrics, Sample, Segment};
use crate::config::AnalysisConfig;

/// Which gradient a projection was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionBasis {
    /// Gradient of the most recent segment
    CurrentTrend,
    /// Duration-weighted drain average over the recent-usage window
    RecentUsage,
}

/// When the battery is projected to hit empty
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ProjectedEmpty {
    At(NaiveDateTime),
    /// Non-negative basis gradient; the level never reaches zero
    Never,
    /// The series already ends at zero
    AlreadyEmpty,
}

/// One projected point on the depletion curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub timestamp: NaiveDateTime,
    pub level: f64,
}

/// A single forward projection
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub basis: PredictionBasis,
    /// Signed %/hour the projection extrapolates with
    pub basis_gradient: f64,
    /// The "now" anchor, the timestamp of the last sample
    pub generated_at: NaiveDateTime,
    pub projected_empty: ProjectedEmpty,
    /// Points from `(now, current level)` down to `(projected empty, 0)`,
    /// strictly decreasing in level and never below zero
    pub step_curve: Vec<CurvePoint>,
}

/// The two projections of one run; each absent when not applicable
#[derive(Debug, Clone, Default, Serialize)]
pub struct PredictionSet {
    pub current_trend: Option<Prediction>,
    pub recent_usage: Option<Prediction>,
}

/// Compute both projections from the segment sequence.
pub fn predict(samples: &[Sample], segments: &[Segment], config: &AnalysisConfig) -> PredictionSet {
    let Some(last) = samples.last() else {
        return PredictionSet::default();
    };
    let now = last.timestamp;
    let level = last.level;

    let current_trend = current_trend_basis(segments)
        .map(|g| build_prediction(PredictionBasis::CurrentTrend, g, now, level, config));
    let recent_usage = recent_usage_basis(segments, now, config)
        .map(|g| build_prediction(PredictionBasis::RecentUsage, g, now, level, config));

    PredictionSet {
        current_trend,
        recent_usage,
    }
}

/// Gradient of the most recent segment, provided it is draining.
fn current_trend_basis(segments: &[Segment]) -> Option<f64> {
    let last = segments.last()?;
    match last.average_gradient {
        Some(gradient) if gradient < 0.0 => Some(gradient),
        _ => {
            log::debug!("last segment is not draining, current-trend projection not applicable");
            None
        }
    }
}

/// Duration-weighted average gradient of the draining segments overlapping the
/// usage window, each weighted by its overlap with the window.
fn recent_usage_basis(
    segments: &[Segment],
    now: NaiveDateTime,
    config: &AnalysisConfig,
) -> Option<f64> {
    let window_start = now - hours_duration(config.usage_window_hours);
    let mut weighted_sum = 0.0;
    let mut total_hours = 0.0;

    for segment in segments {
        let Some(gradient) = segment.average_gradient else {
            continue;
        };
        if gradient >= 0.0 {
            continue;
        }
        let overlap_start = segment.start.timestamp.max(window_start);
        let overlap_end = segment.end.timestamp.min(now);
        let overlap_hours = metrics::hours_between(overlap_start, overlap_end);
        if overlap_hours <= 0.0 {
            continue;
        }
        weighted_sum += gradient * overlap_hours;
        total_hours += overlap_hours;
    }

    if total_hours > 0.0 {
        Some(weighted_sum / total_hours)
    } else {
        log::debug!("no draining segment in the usage window, projection not applicable");
        None
    }
}

/// Extrapolate one basis gradient into a projection with its depletion curve.
fn build_prediction(
    basis: PredictionBasis,
    gradient: f64,
    now: NaiveDateTime,
    level: f64,
    config: &AnalysisConfig,
) -> Prediction {
    if level <= 0.0 {
        return Prediction {
            basis,
            basis_gradient: gradient,
            generated_at: now,
            projected_empty: ProjectedEmpty::AlreadyEmpty,
            step_curve: vec![CurvePoint {
                timestamp: now,
                level: 0.0,
            }],
        };
    }
    if gradient >= 0.0 {
        return Prediction {
            basis,
            basis_gradient: gradient,
            generated_at: now,
            projected_empty: ProjectedEmpty::Never,
            step_curve: vec![CurvePoint {
                timestamp: now,
                level,
            }],
        };
    }

    let hours_to_empty = level / -gradient;
    let empty_at = now + hours_duration(hours_to_empty);

    // Walk the step grid while the projected level stays above zero; a grid
    // point landing exactly on zero is dropped in favor of the exact terminus
    let mut step_curve = Vec::new();
    let mut step = 0u32;
    loop {
        let hours = f64::from(step) * config.step_hours;
        let projected = level + gradient * hours;
        if projected <= 0.0 {
            break;
        }
        step_curve.push(CurvePoint {
            timestamp: now + hours_duration(hours),
            level: projected,
        });
        step += 1;
    }
    step_curve.push(CurvePoint {
        timestamp: empty_at,
        level: 0.0,
    });

    log::debug!(
        "{:?} projection: {:+.2} %/h, empty in {:.1} h",
        basis,
        gradient,
        hours_to_empty
    );

    Prediction {
        basis,
        basis_gradient: gradient,
        generated_at: now,
        projected_empty: ProjectedEmpty::At(empty_at),
        step_curve,
    }
}

fn hours_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::segmenter::SegmentSpan;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn segment(samples: &[Sample], start: usize, end: usize) -> Segment {
        metrics::analyze_span(samples, SegmentSpan { start, end })
    }

    #[test]
    fn test_current_trend_uses_last_draining_segment() {
        let samples = vec![
            Sample::new(ts(24, 10), 80.0),
            Sample::new(ts(24, 12), 70.0),
        ];
        let segments = vec![segment(&samples, 0, 1)];
        assert_eq!(current_trend_basis(&segments), Some(-5.0));
    }

    #[test]
    fn test_current_trend_not_applicable_when_charging() {
        let samples = vec![
            Sample::new(ts(24, 10), 50.0),
            Sample::new(ts(24, 12), 70.0),
        ];
        let segments = vec![segment(&samples, 0, 1)];
        assert_eq!(current_trend_basis(&segments), None);
    }

    #[test]
    fn test_equal_duration_weighting() {
        // Two two-hour draining segments at -5 and -15 %/h average to -10
        let samples = vec![
            Sample::new(ts(24, 10), 80.0),
            Sample::new(ts(24, 12), 70.0),
            Sample::new(ts(24, 14), 40.0),
        ];
        let segments = vec![segment(&samples, 0, 1), segment(&samples, 1, 2)];
        let config = AnalysisConfig::default();
        let basis = recent_usage_basis(&segments, ts(24, 14), &config).unwrap();
        assert!((basis - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_charging_segments_do_not_move_the_usage_basis() {
        let samples = vec![
            Sample::new(ts(24, 10), 80.0),
            Sample::new(ts(24, 12), 70.0),
            Sample::new(ts(24, 13), 95.0),
            Sample::new(ts(24, 15), 85.0),
        ];
        let draining_only = vec![segment(&samples, 0, 1), segment(&samples, 2, 3)];
        let with_charge = vec![
            segment(&samples, 0, 1),
            segment(&samples, 1, 2),
            segment(&samples, 2, 3),
        ];
        let config = AnalysisConfig::default();
        let now = ts(24, 15);
        assert_eq!(
            recent_usage_basis(&draining_only, now, &config),
            recent_usage_basis(&with_charge, now, &config)
        );
    }

    #[test]
    fn test_step_curve_endpoints_and_monotonicity() {
        let config = AnalysisConfig::default();
        let now = ts(25, 15);
        let prediction =
            build_prediction(PredictionBasis::CurrentTrend, -10.0, now, 35.0, &config);

        let first = prediction.step_curve.first().unwrap();
        assert_eq!(first.timestamp, now);
        assert_eq!(first.level, 35.0);

        let last = prediction.step_curve.last().unwrap();
        assert_eq!(last.level, 0.0);
        match prediction.projected_empty {
            ProjectedEmpty::At(at) => assert_eq!(last.timestamp, at),
            other => panic!("expected a projected-empty instant, got {:?}", other),
        }

        for pair in prediction.step_curve.windows(2) {
            assert!(pair[1].level < pair[0].level);
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
    }

    #[test]
    fn test_grid_point_on_zero_is_not_duplicated() {
        // 30% at -10 %/h empties exactly on the third hourly step
        let config = AnalysisConfig::default();
        let now = ts(25, 15);
        let prediction =
            build_prediction(PredictionBasis::CurrentTrend, -10.0, now, 30.0, &config);

        assert_eq!(prediction.step_curve.len(), 4);
        assert_eq!(prediction.projected_empty, ProjectedEmpty::At(ts(25, 18)));
    }

    #[test]
    fn test_non_negative_gradient_never_empties() {
        let config = AnalysisConfig::default();
        let prediction =
            build_prediction(PredictionBasis::RecentUsage, 0.0, ts(25, 15), 50.0, &config);
        assert_eq!(prediction.projected_empty, ProjectedEmpty::Never);
        assert_eq!(prediction.step_curve.len(), 1);
    }

    #[test]
    fn test_empty_series_already_empty() {
        let config = AnalysisConfig::default();
        let prediction =
            build_prediction(PredictionBasis::CurrentTrend, -5.0, ts(25, 15), 0.0, &config);
        assert_eq!(prediction.projected_empty, ProjectedEmpty::AlreadyEmpty);
    }
}
