//! Event log parsing
//!
//! One event per line: `label, color, D.M.YYYY HHMM, duration-minutes`,
//! e.g. `Workout, blue, 24.8.2025 1746, 17`.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::events::Event;
use crate::error::Result;
use crate::loader::{parse_clock, parse_date, RejectReason, RejectedRecord};

lazy_static! {
    /// Event start field: `D.M.YYYY HHMM`
    static ref START_FIELD: Regex = Regex::new(r"^(\d{1,2}\.\d{1,2}\.\d{4})\s+(\d{3,4})$").unwrap();
}

/// Result of parsing one event log
#[derive(Debug, Clone, Default)]
pub struct LoadedEvents {
    /// Events sorted ascending by start time
    pub events: Vec<Event>,
    /// Input lines dropped at this boundary, with reasons
    pub rejected: Vec<RejectedRecord>,
}

/// Read and parse an event log file.
pub fn read_event_log(path: &Path) -> Result<LoadedEvents> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_event_log(&contents))
}

/// Parse event log text into events plus the rejected-record list.
pub fn parse_event_log(input: &str) -> LoadedEvents {
    let mut loaded = LoadedEvents::default();

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_number = index + 1;

        match parse_event_line(line) {
            Some(event) => loaded.events.push(event),
            None => loaded
                .rejected
                .push(RejectedRecord::new(line_number, line, RejectReason::Malformed)),
        }
    }

    loaded.events.sort_by_key(|event| event.start);
    if !loaded.rejected.is_empty() {
        log::warn!(
            "dropped {} event log line(s), kept {}",
            loaded.rejected.len(),
            loaded.events.len()
        );
    }
    loaded
}

fn parse_event_line(line: &str) -> Option<Event> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let &[label, color, start, minutes] = fields.as_slice() else {
        return None;
    };
    if label.is_empty() || color.is_empty() {
        return None;
    }

    let captures = START_FIELD.captures(start)?;
    let date = parse_date(&captures[1])?;
    let time = parse_clock(&captures[2])?;
    let start = NaiveDateTime::new(date, time);

    let duration_minutes: i64 = minutes.parse().ok()?;
    if duration_minutes < 0 {
        return None;
    }

    Some(Event::new(label, color, start, duration_minutes))
}
