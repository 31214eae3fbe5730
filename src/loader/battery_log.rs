//! Battery log parsing
//!
//! One reading per line: `24.8.2025 1007 47`. The date may be omitted on
//! continuation lines and is carried forward from the last dated line, the
//! way the spreadsheet source leaves repeated dates blank. Blank lines and
//! `#` comments are ignored.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::Sample;
use crate::error::Result;
use crate::loader::{parse_clock, parse_date, RejectReason, RejectedRecord};

lazy_static! {
    /// Optional date, clock, level: `[D.M.YYYY] HHMM LEVEL`
    static ref SAMPLE_LINE: Regex =
        Regex::new(r"^(?:(\d{1,2}\.\d{1,2}\.\d{4})\s+)?(\d{3,4})\s+(\d+(?:\.\d+)?)$").unwrap();
}

/// Result of parsing one battery log
#[derive(Debug, Clone, Default)]
pub struct LoadedSamples {
    /// Ascending, duplicate-free samples ready for analysis
    pub samples: Vec<Sample>,
    /// Input lines dropped at this boundary, with reasons
    pub rejected: Vec<RejectedRecord>,
}

/// Read and parse a battery log file.
pub fn read_battery_log(path: &Path) -> Result<LoadedSamples> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_battery_log(&contents))
}

/// Parse battery log text into samples plus the rejected-record list.
pub fn parse_battery_log(input: &str) -> LoadedSamples {
    let mut loaded = LoadedSamples::default();
    let mut carried_date: Option<NaiveDate> = None;

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_number = index + 1;

        let Some(captures) = SAMPLE_LINE.captures(line) else {
            loaded
                .rejected
                .push(RejectedRecord::new(line_number, line, RejectReason::Malformed));
            continue;
        };

        let date = match captures.get(1) {
            Some(field) => match parse_date(field.as_str()) {
                Some(date) => {
                    carried_date = Some(date);
                    date
                }
                None => {
                    loaded.rejected.push(RejectedRecord::new(
                        line_number,
                        line,
                        RejectReason::Malformed,
                    ));
                    continue;
                }
            },
            // Date omitted: forward-fill from the last dated line
            None => match carried_date {
                Some(date) => date,
                None => {
                    loaded.rejected.push(RejectedRecord::new(
                        line_number,
                        line,
                        RejectReason::Malformed,
                    ));
                    continue;
                }
            },
        };

        let (time, level) = match (parse_clock(&captures[2]), captures[3].parse::<f64>().ok()) {
            (Some(time), Some(level)) => (time, level),
            _ => {
                loaded.rejected.push(RejectedRecord::new(
                    line_number,
                    line,
                    RejectReason::Malformed,
                ));
                continue;
            }
        };

        if !(0.0..=100.0).contains(&level) {
            loaded.rejected.push(RejectedRecord::new(
                line_number,
                line,
                RejectReason::LevelOutOfRange,
            ));
            continue;
        }

        let timestamp = NaiveDateTime::new(date, time);
        match loaded.samples.last() {
            Some(prev) if timestamp == prev.timestamp => {
                loaded.rejected.push(RejectedRecord::new(
                    line_number,
                    line,
                    RejectReason::DuplicateTimestamp,
                ));
            }
            Some(prev) if timestamp < prev.timestamp => {
                loaded.rejected.push(RejectedRecord::new(
                    line_number,
                    line,
                    RejectReason::NonMonotonicTimestamp,
                ));
            }
            _ => loaded.samples.push(Sample::new(timestamp, level)),
        }
    }

    if !loaded.rejected.is_empty() {
        log::warn!(
            "dropped {} battery log line(s), kept {}",
            loaded.rejected.len(),
            loaded.samples.len()
        );
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_lines() {
        let loaded = parse_battery_log("24.8.2025 1007 47\n24.8.2025 1211 43\n");
        assert_eq!(loaded.samples.len(), 2);
        assert!(loaded.rejected.is_empty());
        assert_eq!(loaded.samples[0].level, 47.0);
    }
}
