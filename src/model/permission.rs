use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A per-day permission slip (late arrival / early leave), independent of attendance.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "10:00 AM")]
    pub permission_in: String,
    #[schema(example = "11:30 AM")]
    pub permission_out: String,
    #[schema(example = "Bank visit")]
    pub reason: String,
    #[schema(example = "2025-02-03T04:30:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
