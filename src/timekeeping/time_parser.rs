use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use derive_more::Display;

/// Format every attendance stamp is written in, e.g. `02:30 PM`.
pub const CLOCK_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "Invalid clock time `{}`", _0)]
pub struct TimeParseError(pub String);

impl std::error::Error for TimeParseError {}

/// Parses `hh:mm AM|PM` or `HH:mm[:ss]` into a time of day.
///
/// Blank input means "not recorded" and yields `Ok(None)`.
pub fn parse_clock_time(value: &str) -> Result<Option<NaiveTime>, TimeParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let invalid = || TimeParseError(value.to_string());

    let (hour, minute, second) = match value.split_once(' ') {
        Some((clock, meridiem)) => {
            let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;
            let hour: u32 = hour.parse().map_err(|_| invalid())?;
            let minute: u32 = minute.parse().map_err(|_| invalid())?;
            if !(1..=12).contains(&hour) {
                return Err(invalid());
            }
            // 12 AM is midnight, 12 PM is noon
            let hour = match meridiem.trim().to_ascii_uppercase().as_str() {
                "AM" => hour % 12,
                "PM" => hour % 12 + 12,
                _ => return Err(invalid()),
            };
            (hour, minute, 0)
        }
        None => {
            let mut parts = value.split(':');
            let hour: u32 = parse_part(parts.next()).ok_or_else(invalid)?;
            let minute: u32 = parse_part(parts.next()).ok_or_else(invalid)?;
            let second: u32 = match parts.next() {
                Some(s) => s.parse().map_err(|_| invalid())?,
                None => 0,
            };
            if parts.next().is_some() {
                return Err(invalid());
            }
            (hour, minute, second)
        }
    };

    NaiveTime::from_hms_opt(hour, minute, second)
        .map(Some)
        .ok_or_else(invalid)
}

fn parse_part(part: Option<&str>) -> Option<u32> {
    part.and_then(|p| p.parse().ok())
}

/// Anchors a clock string on `date`. Clock strings carry no date of their own.
pub fn parse_time_on(date: NaiveDate, value: &str) -> Result<Option<NaiveDateTime>, TimeParseError> {
    Ok(parse_clock_time(value)?.map(|time| date.and_time(time)))
}

/// Same as [`parse_time_on`] for an optional stored field.
pub fn stamp_on(date: NaiveDate, value: Option<&str>) -> Result<Option<NaiveDateTime>, TimeParseError> {
    match value {
        Some(v) => parse_time_on(date, v),
        None => Ok(None),
    }
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn twelve_hour_meridiem_conversion() {
        assert_eq!(parse_clock_time("12:15 AM").unwrap(), Some(hm(0, 15)));
        assert_eq!(parse_clock_time("12:15 PM").unwrap(), Some(hm(12, 15)));
        assert_eq!(parse_clock_time("02:30 PM").unwrap(), Some(hm(14, 30)));
        assert_eq!(parse_clock_time("09:05 AM").unwrap(), Some(hm(9, 5)));
    }

    #[test]
    fn meridiem_is_case_insensitive() {
        assert_eq!(parse_clock_time("11:06 pm").unwrap(), Some(hm(23, 6)));
        assert_eq!(parse_clock_time("7:00 am").unwrap(), Some(hm(7, 0)));
    }

    #[test]
    fn twenty_four_hour_with_optional_seconds() {
        assert_eq!(parse_clock_time("14:30:00").unwrap(), Some(hm(14, 30)));
        assert_eq!(parse_clock_time("14:30").unwrap(), Some(hm(14, 30)));
        assert_eq!(
            parse_clock_time("08:01:59").unwrap(),
            NaiveTime::from_hms_opt(8, 1, 59)
        );
    }

    #[test]
    fn blank_input_is_not_recorded() {
        assert_eq!(parse_clock_time("").unwrap(), None);
        assert_eq!(parse_clock_time("   ").unwrap(), None);
    }

    #[test]
    fn malformed_input_is_a_typed_error() {
        for bad in ["abc", "13:00 PM", "00:10 AM", "10:61 AM", "10:00 XM", "25:00", "10", "1:2:3:4"] {
            let err = parse_clock_time(bad).unwrap_err();
            assert_eq!(err, TimeParseError(bad.to_string()), "input {bad}");
        }
    }

    #[test]
    fn parse_then_format_keeps_the_displayed_time() {
        for hour in 1..=12 {
            for minute in [0, 7, 30, 59] {
                for meridiem in ["AM", "PM"] {
                    let text = format!("{hour:02}:{minute:02} {meridiem}");
                    let parsed = parse_clock_time(&text).unwrap().unwrap();
                    assert_eq!(format_clock(parsed), text);
                }
            }
        }
    }

    #[test]
    fn anchors_on_the_given_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let at = parse_time_on(date, "06:00 PM").unwrap().unwrap();
        assert_eq!(at, date.and_hms_opt(18, 0, 0).unwrap());
        assert_eq!(stamp_on(date, None).unwrap(), None);
    }
}
