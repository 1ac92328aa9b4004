//! Elapsed working time of an attendance day.
//!
//! Both calculations anchor every clock string on a single calendar date, so
//! shifts crossing midnight are not supported.

use chrono::{NaiveDate, NaiveDateTime};

use super::time_parser::{TimeParseError, stamp_on};
use crate::model::attendance::AttendanceDay;

fn span_ms(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_milliseconds()
}

/// Running total while the shift may still be open.
///
/// The shift ends at `time_out` if recorded, else at `now`. Closed breaks are
/// subtracted in full and an open break is subtracted up to `now`.
pub fn working_ms_live(day: &AttendanceDay, now: NaiveDateTime) -> Result<i64, TimeParseError> {
    let date = now.date();
    let Some(start) = stamp_on(date, day.time_in.as_deref())? else {
        return Ok(0);
    };
    let end = stamp_on(date, day.time_out.as_deref())?.unwrap_or(now);

    let mut total = span_ms(start, end);
    for (_, slot) in day.breaks.slots() {
        let break_in = stamp_on(date, slot.start.as_deref())?;
        let break_out = stamp_on(date, slot.end.as_deref())?;
        match (break_in, break_out) {
            (Some(b_in), Some(b_out)) => total -= span_ms(b_in, b_out),
            (Some(b_in), None) => total -= span_ms(b_in, now),
            _ => {}
        }
    }

    Ok(total.max(0))
}

/// Authoritative total of a closed shift.
///
/// Zero until both `time_in` and `time_out` exist. A break that was opened but
/// never closed is not subtracted.
pub fn working_ms_final(day: &AttendanceDay, date: NaiveDate) -> Result<i64, TimeParseError> {
    let start = stamp_on(date, day.time_in.as_deref())?;
    let end = stamp_on(date, day.time_out.as_deref())?;
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(0);
    };

    let mut total = span_ms(start, end);
    for (_, slot) in day.breaks.slots() {
        if !slot.is_closed() {
            continue;
        }
        if let (Some(b_in), Some(b_out)) = (
            stamp_on(date, slot.start.as_deref())?,
            stamp_on(date, slot.end.as_deref())?,
        ) {
            total -= span_ms(b_in, b_out);
        }
    }

    Ok(total.max(0))
}

/// Length of one closed break, never negative.
pub fn break_duration_ms(
    date: NaiveDate,
    break_in: Option<&str>,
    break_out: Option<&str>,
) -> Result<i64, TimeParseError> {
    match (stamp_on(date, break_in)?, stamp_on(date, break_out)?) {
        (Some(b_in), Some(b_out)) => Ok(span_ms(b_in, b_out).max(0)),
        _ => Ok(0),
    }
}

/// `"<H>h <M>m"`, truncated to whole minutes.
pub fn format_working_time(ms: i64) -> String {
    let total_minutes = ms.max(0) / 60_000;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}
