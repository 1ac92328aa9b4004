use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::attendance::AttendanceDay;
use crate::model::report::{DayStatus, MonthlyReportEntry};

/// Which days count as weekend leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekendPolicy {
    pub sundays: bool,
    /// Saturday ordinals within the month (1 = first Saturday).
    pub saturdays: Vec<u32>,
}

impl Default for WeekendPolicy {
    fn default() -> Self {
        Self {
            sundays: true,
            saturdays: vec![1, 3],
        }
    }
}

impl WeekendPolicy {
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Sun => self.sundays,
            Weekday::Sat => self.saturdays.contains(&week_of_month(date)),
            _ => false,
        }
    }
}

/// `ceil(day / 7)`: the n-th occurrence of that weekday in the month.
pub fn week_of_month(date: NaiveDate) -> u32 {
    date.day().div_ceil(7)
}

/// `[first day, first day of next month)`, `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// Every day of the month up to and including `today`.
pub fn report_days(year: i32, month: u32, today: NaiveDate) -> Option<Vec<NaiveDate>> {
    let (start, end) = month_bounds(year, month)?;
    Some(
        start
            .iter_days()
            .take_while(|day| *day < end && *day <= today)
            .collect(),
    )
}

/// Classifies each reportable day of the month.
///
/// A day with a recorded time-in is present even on a weekend; otherwise the
/// weekend policy decides between weekend leave and absence.
pub fn build_monthly_report(
    year: i32,
    month: u32,
    today: NaiveDate,
    records: &[AttendanceDay],
    policy: &WeekendPolicy,
) -> Option<Vec<MonthlyReportEntry>> {
    let mut by_date: HashMap<NaiveDate, &AttendanceDay> = HashMap::with_capacity(records.len());
    for record in records {
        by_date.entry(record.date).or_insert(record);
    }

    let entries = report_days(year, month, today)?
        .into_iter()
        .map(|date| match by_date.get(&date) {
            // A present day always carries both times; an open shift reports "" as time out
            Some(record) if record.is_present() => MonthlyReportEntry {
                time_in: Some(record.time_in.clone().unwrap_or_default()),
                time_out: Some(record.time_out.clone().unwrap_or_default()),
                ..MonthlyReportEntry::new(date, DayStatus::Present)
            },
            _ if policy.is_weekend(date) => MonthlyReportEntry::new(date, DayStatus::WeekendLeave),
            _ => MonthlyReportEntry::new(date, DayStatus::AbsentLeave),
        })
        .collect();

    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn present(date: NaiveDate) -> AttendanceDay {
        let mut day = AttendanceDay::opened(date.day() as u64, 42, date, "09:00 AM");
        day.time_out = Some("06:00 PM".into());
        day
    }

    #[test]
    fn month_bounds_handles_december_and_invalid_months() {
        assert_eq!(month_bounds(2024, 12), Some((ymd(2024, 12, 1), ymd(2025, 1, 1))));
        assert_eq!(month_bounds(2024, 2), Some((ymd(2024, 2, 1), ymd(2024, 3, 1))));
        assert_eq!(month_bounds(2024, 0), None);
        assert_eq!(month_bounds(2024, 13), None);
    }

    #[test]
    fn week_of_month_is_ceiling_of_day_over_seven() {
        assert_eq!(week_of_month(ymd(2025, 2, 1)), 1);
        assert_eq!(week_of_month(ymd(2025, 2, 7)), 1);
        assert_eq!(week_of_month(ymd(2025, 2, 8)), 2);
        assert_eq!(week_of_month(ymd(2025, 2, 15)), 3);
        assert_eq!(week_of_month(ymd(2025, 3, 29)), 5);
    }

    #[test]
    fn past_february_has_every_day() {
        let report = build_monthly_report(2025, 2, ymd(2025, 6, 1), &[], &WeekendPolicy::default()).unwrap();
        assert_eq!(report.len(), 28);
        assert_eq!(report.first().unwrap().date, ymd(2025, 2, 1));
        assert_eq!(report.last().unwrap().date, ymd(2025, 2, 28));

        let weekend: Vec<u32> = report
            .iter()
            .filter(|e| e.status == DayStatus::WeekendLeave)
            .map(|e| e.date.day())
            .collect();
        // Saturdays 1st and 15th, Sundays 2, 9, 16, 23
        assert_eq!(weekend, vec![1, 2, 9, 15, 16, 23]);

        let sat_8 = &report[7];
        assert_eq!(sat_8.status, DayStatus::AbsentLeave);
        assert_eq!(sat_8.color, "red");
    }

    #[test]
    fn leap_february_has_29_days() {
        let report = build_monthly_report(2024, 2, ymd(2025, 1, 1), &[], &WeekendPolicy::default()).unwrap();
        assert_eq!(report.len(), 29);
    }

    #[test]
    fn current_month_stops_at_today() {
        let report = build_monthly_report(2025, 3, ymd(2025, 3, 10), &[], &WeekendPolicy::default()).unwrap();
        assert_eq!(report.len(), 10);
        assert_eq!(report.last().unwrap().date, ymd(2025, 3, 10));
    }

    #[test]
    fn future_month_is_empty() {
        let report = build_monthly_report(2025, 4, ymd(2025, 3, 10), &[], &WeekendPolicy::default()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn presence_wins_over_weekend() {
        let records = vec![present(ymd(2025, 2, 2)), present(ymd(2025, 2, 4))];
        let report = build_monthly_report(2025, 2, ymd(2025, 3, 1), &records, &WeekendPolicy::default()).unwrap();

        let sunday = &report[1];
        assert_eq!(sunday.status, DayStatus::Present);
        assert_eq!(sunday.color, "green");
        assert_eq!(sunday.time_in.as_deref(), Some("09:00 AM"));
        assert_eq!(sunday.time_out.as_deref(), Some("06:00 PM"));
        assert_eq!(report[3].status, DayStatus::Present);
        assert_eq!(report[2].status, DayStatus::AbsentLeave);
    }

    #[test]
    fn open_shift_reports_blank_time_out() {
        let open = AttendanceDay::opened(1, 42, ymd(2025, 2, 4), "09:00 AM");
        let report = build_monthly_report(2025, 2, ymd(2025, 2, 4), &[open], &WeekendPolicy::default()).unwrap();

        let entry = serde_json::to_value(&report[3]).unwrap();
        assert_eq!(entry["status"], "Present");
        assert_eq!(entry["timeIn"], "09:00 AM");
        assert_eq!(entry["timeOut"], "");

        let absent = serde_json::to_value(&report[2]).unwrap();
        assert!(absent.get("timeOut").is_none());
    }

    #[test]
    fn record_without_time_in_is_not_presence() {
        let mut blank = present(ymd(2025, 2, 4));
        blank.time_in = None;
        let report = build_monthly_report(2025, 2, ymd(2025, 3, 1), &[blank], &WeekendPolicy::default()).unwrap();
        assert_eq!(report[3].status, DayStatus::AbsentLeave);
        assert_eq!(report[3].time_in, None);
    }

    #[test]
    fn custom_policy() {
        let policy = WeekendPolicy {
            sundays: false,
            saturdays: vec![1, 2, 3, 4, 5],
        };
        assert!(policy.is_weekend(ymd(2025, 2, 8)));
        assert!(!policy.is_weekend(ymd(2025, 2, 9)));
        assert!(!policy.is_weekend(ymd(2025, 2, 10)));
    }

    #[test]
    fn invalid_month_is_none() {
        assert!(build_monthly_report(2025, 13, ymd(2025, 3, 1), &[], &WeekendPolicy::default()).is_none());
    }

    #[test]
    fn entries_serialize_with_wire_names() {
        let report = build_monthly_report(2025, 2, ymd(2025, 2, 2), &[present(ymd(2025, 2, 1))], &WeekendPolicy::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json[0]["status"], "Present");
        assert_eq!(json[0]["timeIn"], "09:00 AM");
        assert_eq!(json[1]["status"], "Weekend Leave");
        assert_eq!(json[1]["color"], "lightblue");
        assert!(json[1].get("timeIn").is_none());
    }
}
