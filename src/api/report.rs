use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::services::report::ReportService;

/// Day-by-day presence report of one month
#[utoipa::path(
    get,
    path = "/api/reports/monthly/{user_id}/{month}/{year}",
    params(
        ("user_id" = u64, Path, description = "Employee whose attendance is reported"),
        ("month" = u32, Path, description = "Month, 1-12"),
        ("year" = i32, Path, description = "Four digit year")
    ),
    responses(
        (status = 200, description = "One entry per day up to today", body = [MonthlyReportEntry]),
        (status = 400, description = "Invalid month or year", body = MessageResponse,
         example = json!({"message": "Invalid month 13"})),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn monthly_report(
    service: web::Data<ReportService>,
    path: web::Path<(u64, u32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, month, year) = path.into_inner();
    let report = service.monthly(user_id, month, year).await?;
    Ok(HttpResponse::Ok().json(report))
}
