//! Free-text weekly-hours parser
//!
//! The feed carries opening hours as one comma-separated string of
//! segments shaped `"<Weekday> <H:MM> <AM|PM> - <H:MM> <AM|PM>"`, e.g.
//!
//! ```text
//! Monday 7:20 AM - 10:40 PM, Tuesday 7:00 AM - 7:00 PM
//! ```
//!
//! Each segment becomes an [`OpenHour`] with HHMM-encoded times (7:20 AM →
//! 720, 10:40 PM → 2240). A malformed segment is a hard error: rows are
//! validated as a batch before anything is persisted, so one bad segment
//! fails the whole import.

use crate::db::schemas::{Day, OpenHour};
use crate::types::{Result, SignpostError};

/// Parse a weekly-hours string into opening intervals
///
/// Empty segments are dropped; an empty input yields no intervals.
pub fn parse_weekly(text: &str) -> Result<Vec<OpenHour>> {
    text.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> Result<OpenHour> {
    let lowered = segment.to_lowercase();
    let parts: Vec<&str> = lowered.split_whitespace().collect();

    if parts.len() != 6 || parts[3] != "-" {
        return Err(malformed(segment, "expected '<day> <h:mm> <am|pm> - <h:mm> <am|pm>'"));
    }

    let day = Day::parse(parts[0])
        .ok_or_else(|| malformed(segment, &format!("'{}' is not a weekday", parts[0])))?;

    let start = parse_clock(segment, parts[1], parts[2])?;
    let end = parse_clock(segment, parts[4], parts[5])?;

    Ok(OpenHour { day, start, end })
}

/// Strip the colon to get the 3-4 digit HHMM number; add 1200 for PM times
fn parse_clock(segment: &str, time: &str, meridiem: &str) -> Result<i32> {
    let digits = time.replace(':', "");
    let value: i32 = digits
        .parse()
        .map_err(|_| malformed(segment, &format!("'{time}' is not a clock time")))?;

    if meridiem.contains("pm") {
        Ok(value + 1200)
    } else {
        Ok(value)
    }
}

fn malformed(segment: &str, reason: &str) -> SignpostError {
    SignpostError::MalformedSourceData(format!("open hours segment '{segment}': {reason}"))
}
