//! Loader adapters for the text log formats
//!
//! The analysis core assumes ascending, duplicate-free samples with fully
//! resolved timestamps and levels inside [0, 100]. These adapters establish
//! that invariant from the raw log text and report every line they drop;
//! nothing here ever aborts a whole load over a single bad record.

mod battery_log;
mod event_log;

pub use battery_log::{parse_battery_log, read_battery_log, LoadedSamples};
pub use event_log::{parse_event_log, read_event_log, LoadedEvents};

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Date component format of both log formats
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Why a log line was dropped at the loader boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// Line did not match the expected grammar
    Malformed,
    /// Battery level outside [0, 100]
    LevelOutOfRange,
    /// Timestamp earlier than the preceding sample's
    NonMonotonicTimestamp,
    /// Timestamp identical to the preceding sample's (the first one wins)
    DuplicateTimestamp,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Malformed => write!(f, "malformed line"),
            RejectReason::LevelOutOfRange => write!(f, "battery level outside 0-100"),
            RejectReason::NonMonotonicTimestamp => write!(f, "timestamp goes backwards"),
            RejectReason::DuplicateTimestamp => write!(f, "duplicate timestamp"),
        }
    }
}

/// An input line dropped at the loader boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub line_number: usize,
    pub line: String,
    pub reason: RejectReason,
}

impl RejectedRecord {
    fn new(line_number: usize, line: &str, reason: RejectReason) -> Self {
        Self {
            line_number,
            line: line.to_string(),
            reason,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Parse a `HHMM` or `HMM` clock field
pub(crate) fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let value: u32 = raw.parse().ok()?;
    NaiveTime::from_hms_opt(value / 100, value % 100, 0)
}
