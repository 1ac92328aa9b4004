use std::sync::Arc;

use tracing::debug;

use super::attendance::validate_period;
use crate::error::AppError;
use crate::model::report::MonthlyReportEntry;
use crate::store::AttendanceStore;
use crate::timekeeping::clock::Clock;
use crate::timekeeping::monthly_report::{WeekendPolicy, build_monthly_report};

pub struct ReportService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    policy: WeekendPolicy,
}

impl ReportService {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>, policy: WeekendPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// Day-by-day presence for one user and month, recomputed on every call.
    pub async fn monthly(
        &self,
        user_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<MonthlyReportEntry>, AppError> {
        let (from, until) = validate_period(month, year)?;
        let records = self.store.list_range(user_id, from, until).await?;
        let today = self.clock.today();

        debug!(user_id, month, year, records = records.len(), "Building monthly report");

        build_monthly_report(year, month, today, &records, &self.policy)
            .ok_or_else(|| AppError::Validation(format!("Invalid month {month}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceDay;
    use crate::model::report::DayStatus;
    use crate::store::memory::MemoryAttendanceStore;
    use crate::timekeeping::clock::ManualClock;
    use chrono::NaiveDate;

    fn service(store: Arc<MemoryAttendanceStore>, today: NaiveDate) -> ReportService {
        let clock = ManualClock::at(today.and_hms_opt(12, 0, 0).unwrap());
        ReportService::new(store, Arc::new(clock), WeekendPolicy::default())
    }

    #[actix_web::test]
    async fn only_the_requested_users_month_counts() {
        let store = Arc::new(MemoryAttendanceStore::default());
        let feb_3 = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        store.insert(AttendanceDay::opened(0, 42, feb_3, "09:00 AM"));
        store.insert(AttendanceDay::opened(0, 7, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(), "09:00 AM"));
        store.insert(AttendanceDay::opened(0, 42, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), "09:00 AM"));

        let report = service(store, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
            .monthly(42, 2, 2025)
            .await
            .unwrap();

        assert_eq!(report.len(), 28);
        let present: Vec<_> = report
            .iter()
            .filter(|e| e.status == DayStatus::Present)
            .map(|e| e.date)
            .collect();
        assert_eq!(present, vec![feb_3]);
        assert_eq!(report[3].status, DayStatus::AbsentLeave);
    }

    #[actix_web::test]
    async fn invalid_period_is_rejected() {
        let store = Arc::new(MemoryAttendanceStore::default());
        let svc = service(store, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
        assert!(matches!(svc.monthly(42, 13, 2025).await, Err(AppError::Validation(_))));
        assert!(matches!(svc.monthly(42, 0, 2025).await, Err(AppError::Validation(_))));
        assert!(matches!(svc.monthly(42, 1, 1800).await, Err(AppError::Validation(_))));
    }
}
