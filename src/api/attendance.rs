use std::str::FromStr;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::attendance::AttendanceDay;
use crate::services::attendance::{AttendanceService, TrackedDay};
use crate::timekeeping::breaks::BreakSlot;
use crate::timekeeping::state_machine::AttendanceAction;
use crate::timekeeping::working_time::{break_duration_ms, format_working_time};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    #[schema(example = 42)]
    pub user_id: u64,
    /// One of TIME_IN, MG_IN, MG_OUT, LUNCH_IN, LUNCH_OUT, EVE_IN, EVE_OUT, TIME_OUT
    #[schema(example = "LUNCH_IN")]
    pub action: String,
}

/// `[in, out]` per break slot.
#[derive(Serialize, ToSchema)]
pub struct BreaksView {
    #[schema(example = json!(["10:30 AM", "10:45 AM"]))]
    pub mg: Vec<Option<String>>,
    #[schema(example = json!(["12:00 PM", null]))]
    pub lunch: Vec<Option<String>>,
    #[schema(example = json!([null, null]))]
    pub evening: Vec<Option<String>>,
}

fn pair(slot: &BreakSlot) -> Vec<Option<String>> {
    vec![slot.start.clone(), slot.end.clone()]
}

impl From<&AttendanceDay> for BreaksView {
    fn from(day: &AttendanceDay) -> Self {
        Self {
            mg: pair(&day.breaks.morning),
            lunch: pair(&day.breaks.lunch),
            evening: pair(&day.breaks.evening),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    #[schema(example = 1)]
    pub task_group_id: u64,
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub date: chrono::NaiveDate,
    #[schema(example = "09:00 AM", nullable = true)]
    pub time_in: Option<String>,
    #[schema(example = "06:00 PM", nullable = true)]
    pub time_out: Option<String>,
    pub breaks: BreaksView,
    #[schema(example = 28800000)]
    pub working_ms: i64,
    #[schema(example = "8h 0m")]
    pub working_time: String,
}

impl From<TrackedDay> for AttendanceResponse {
    fn from(tracked: TrackedDay) -> Self {
        let TrackedDay { day, working_ms } = tracked;
        Self {
            task_group_id: day.id,
            date: day.date,
            breaks: BreaksView::from(&day),
            time_in: day.time_in,
            time_out: day.time_out,
            working_ms,
            working_time: format_working_time(working_ms),
        }
    }
}

/// A stored record with its final totals, as listed for a month.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub date: chrono::NaiveDate,
    #[schema(example = "09:00 AM", nullable = true)]
    pub time_in: Option<String>,
    #[schema(example = "06:00 PM", nullable = true)]
    pub time_out: Option<String>,
    pub breaks: BreaksView,
    /// Sum of closed breaks
    #[schema(example = 3600000)]
    pub break_ms: i64,
    #[schema(example = 28800000)]
    pub total_working_ms: i64,
    #[schema(example = "8h 0m")]
    pub working_time: String,
}

impl TryFrom<AttendanceDay> for RecordResponse {
    type Error = AppError;

    fn try_from(day: AttendanceDay) -> Result<Self, Self::Error> {
        let mut break_ms = 0;
        for (_, slot) in day.breaks.slots() {
            break_ms += break_duration_ms(day.date, slot.start.as_deref(), slot.end.as_deref())?;
        }

        Ok(Self {
            id: day.id,
            user_id: day.user_id,
            date: day.date,
            breaks: BreaksView::from(&day),
            break_ms,
            total_working_ms: day.total_working_ms,
            working_time: format_working_time(day.total_working_ms),
            time_in: day.time_in,
            time_out: day.time_out,
        })
    }
}

/// Record an attendance action for today
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Action recorded", body = AttendanceResponse),
        (status = 400, description = "Invalid action or action not allowed in the current state", body = MessageResponse,
         example = json!({"message": "Lunch break already started"})),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_action(
    service: web::Data<AttendanceService>,
    payload: web::Json<AttendanceRequest>,
) -> Result<HttpResponse, AppError> {
    let action = AttendanceAction::from_str(payload.action.trim())
        .map_err(|_| AppError::Validation("Invalid action".into()))?;

    let tracked = service.handle_action(payload.user_id, action).await?;

    Ok(HttpResponse::Ok().json(AttendanceResponse::from(tracked)))
}

/// Today's attendance with the running working time
#[utoipa::path(
    get,
    path = "/api/attendance/today/{user_id}",
    params(
        ("user_id" = u64, Path, description = "Owner of the record")
    ),
    responses(
        (status = 200, description = "Today's record", body = AttendanceResponse),
        (status = 404, description = "Not timed in today", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    service: web::Data<AttendanceService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let tracked = service.today(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AttendanceResponse::from(tracked)))
}

/// Stored attendance records of one month
#[utoipa::path(
    get,
    path = "/api/attendance/records/{user_id}/{month}/{year}",
    params(
        ("user_id" = u64, Path, description = "Owner of the records"),
        ("month" = u32, Path, description = "Month, 1-12"),
        ("year" = i32, Path, description = "Four digit year")
    ),
    responses(
        (status = 200, description = "Records of the month, oldest first", body = [RecordResponse]),
        (status = 400, description = "Invalid month or year", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn month_records(
    service: web::Data<AttendanceService>,
    path: web::Path<(u64, u32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, month, year) = path.into_inner();

    let records = service
        .month_records(user_id, month, year)
        .await?
        .into_iter()
        .map(RecordResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(records))
}

/// Delete one of the caller's attendance records
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse,
         example = json!({"message": "Attendance record deleted"})),
        (status = 404, description = "Not found or not owned by the caller", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn delete_record(
    auth: AuthUser,
    service: web::Data<AttendanceService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    service.delete(id, auth.user_id).await?;
    tracing::info!(id, username = %auth.username, "Record removed by owner");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted"
    })))
}
