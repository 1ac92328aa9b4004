use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Display, From};

use crate::model::attendance::AttendanceDay;
use crate::model::task::{NewTask, Task};
use crate::timekeeping::breaks::{BreakKind, BreakLedger};
use crate::utils::db_utils::Assignment;

pub mod mysql;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Display, From)]
pub enum StoreError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "attendance record {} vanished after insert", _0)]
    #[from(ignore)]
    Missing(u64),
}

impl std::error::Error for StoreError {}

#[derive(Debug)]
pub enum CreateOutcome {
    Created(AttendanceDay),
    /// A record already exists for that user and date.
    Duplicate,
}

/// Persistence for attendance days.
///
/// Each state change is a single conditional update whose predicate is the
/// transition's precondition. The `bool` results report whether it applied.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_day(&self, user_id: u64, date: NaiveDate) -> Result<Option<AttendanceDay>, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceDay>, StoreError>;

    async fn create_day(
        &self,
        user_id: u64,
        date: NaiveDate,
        time_in: &str,
    ) -> Result<CreateOutcome, StoreError>;

    /// Sets the break's start where it is still unset.
    async fn open_break(
        &self,
        user_id: u64,
        date: NaiveDate,
        kind: BreakKind,
        at: &str,
    ) -> Result<bool, StoreError>;

    /// Sets the break's end where the start is set and the end is not.
    async fn close_break(
        &self,
        user_id: u64,
        date: NaiveDate,
        kind: BreakKind,
        at: &str,
    ) -> Result<bool, StoreError>;

    /// Sets `time_out` and the final total where `time_out` is still unset
    /// and the stored breaks are exactly `breaks`, the ledger the total was
    /// computed from.
    async fn close_day(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: &str,
        breaks: &BreakLedger,
        total_working_ms: i64,
    ) -> Result<bool, StoreError>;

    /// Records dated in `[from, until)`, oldest first.
    async fn list_range(
        &self,
        user_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<AttendanceDay>, StoreError>;

    async fn delete_day(&self, id: u64, user_id: u64) -> Result<bool, StoreError>;
}

/// Work log entries kept under an attendance day.
///
/// Every call is scoped to the day's owner: a day that does not exist or
/// belongs to someone else behaves as missing.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// `None` when the day is not the user's.
    async fn list_tasks(&self, user_id: u64, attendance_id: u64) -> Result<Option<Vec<Task>>, StoreError>;

    /// `false` when the day is not the user's.
    async fn add_task(&self, user_id: u64, attendance_id: u64, task: &NewTask) -> Result<bool, StoreError>;

    /// `false` when no such task exists under the user's day.
    async fn update_task(
        &self,
        user_id: u64,
        attendance_id: u64,
        task_id: u64,
        changes: Vec<Assignment>,
    ) -> Result<bool, StoreError>;

    /// Number of tasks removed.
    async fn delete_tasks(&self, user_id: u64, attendance_id: u64, task_ids: &[u64]) -> Result<u64, StoreError>;
}
