use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timekeeping::breaks::{BreakLedger, BreakSlot};

/// One user's clock-in/out and break record for a single calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceDay {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub time_in: Option<String>,
    /// Absent while the shift is still open.
    pub time_out: Option<String>,
    pub breaks: BreakLedger,
    /// Final working time, written when the day is closed.
    pub total_working_ms: i64,
}

impl AttendanceDay {
    pub fn opened(id: u64, user_id: u64, date: NaiveDate, time_in: &str) -> Self {
        Self {
            id,
            user_id,
            date,
            time_in: Some(time_in.to_string()),
            time_out: None,
            breaks: BreakLedger::default(),
            total_working_ms: 0,
        }
    }

    pub fn is_present(&self) -> bool {
        self.time_in.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub time_in: Option<String>,
    pub time_out: Option<String>,
    pub mg_break_in: Option<String>,
    pub mg_break_out: Option<String>,
    pub lunch_break_in: Option<String>,
    pub lunch_break_out: Option<String>,
    pub eve_break_in: Option<String>,
    pub eve_break_out: Option<String>,
    pub total_working_ms: i64,
}

// Blank strings are treated as "not recorded".
fn recorded(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<AttendanceRow> for AttendanceDay {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            time_in: recorded(row.time_in),
            time_out: recorded(row.time_out),
            breaks: BreakLedger {
                morning: BreakSlot::new(recorded(row.mg_break_in), recorded(row.mg_break_out)),
                lunch: BreakSlot::new(recorded(row.lunch_break_in), recorded(row.lunch_break_out)),
                evening: BreakSlot::new(recorded(row.eve_break_in), recorded(row.eve_break_out)),
            },
            total_working_ms: row.total_working_ms,
        }
    }
}
