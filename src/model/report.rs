use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum DayStatus {
    Present,
    #[serde(rename = "Weekend Leave")]
    WeekendLeave,
    #[serde(rename = "Absent Leave")]
    AbsentLeave,
}

impl DayStatus {
    pub fn color(self) -> &'static str {
        match self {
            DayStatus::Present => "green",
            DayStatus::WeekendLeave => "lightblue",
            DayStatus::AbsentLeave => "red",
        }
    }
}

/// One calendar day of a monthly presence report. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReportEntry {
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: DayStatus,
    #[schema(example = "green")]
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "09:00 AM", nullable = true)]
    pub time_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "06:00 PM", nullable = true)]
    pub time_out: Option<String>,
}

impl MonthlyReportEntry {
    pub fn new(date: NaiveDate, status: DayStatus) -> Self {
        Self {
            date,
            status,
            color: status.color().to_string(),
            time_in: None,
            time_out: None,
        }
    }
}
