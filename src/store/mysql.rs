use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use super::{AttendanceStore, CreateOutcome, StoreError, TaskStore};
use crate::model::attendance::{AttendanceDay, AttendanceRow};
use crate::model::task::{NewTask, Task};
use crate::timekeeping::breaks::{BreakKind, BreakLedger};
use crate::utils::db_utils::{Assignment, build_update_sql, execute_update};

const SELECT_DAY: &str = r#"
    SELECT id, user_id, date, time_in, time_out,
           mg_break_in, mg_break_out,
           lunch_break_in, lunch_break_out,
           eve_break_in, eve_break_out,
           total_working_ms
    FROM attendance_days
"#;

// MySQL integrity constraint violation (duplicate key)
const DUPLICATE_KEY: &str = "23000";

#[derive(Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn find_day(&self, user_id: u64, date: NaiveDate) -> Result<Option<AttendanceDay>, StoreError> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{SELECT_DAY} WHERE user_id = ? AND date = ?"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AttendanceDay::from))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceDay>, StoreError> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!("{SELECT_DAY} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AttendanceDay::from))
    }

    async fn create_day(
        &self,
        user_id: u64,
        date: NaiveDate,
        time_in: &str,
    ) -> Result<CreateOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_days (user_id, date, time_in)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(time_in)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_id();
                let day = self.find_by_id(id).await?.ok_or(StoreError::Missing(id))?;
                Ok(CreateOutcome::Created(day))
            }
            Err(e) => {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some(DUPLICATE_KEY) {
                        return Ok(CreateOutcome::Duplicate);
                    }
                }
                Err(e.into())
            }
        }
    }

    async fn open_break(
        &self,
        user_id: u64,
        date: NaiveDate,
        kind: BreakKind,
        at: &str,
    ) -> Result<bool, StoreError> {
        let (break_in, _) = kind.columns();
        let sql = format!(
            "UPDATE attendance_days SET {break_in} = ? \
             WHERE user_id = ? AND date = ? AND {break_in} IS NULL"
        );

        let result = sqlx::query(&sql)
            .bind(at)
            .bind(user_id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn close_break(
        &self,
        user_id: u64,
        date: NaiveDate,
        kind: BreakKind,
        at: &str,
    ) -> Result<bool, StoreError> {
        let (break_in, break_out) = kind.columns();
        let sql = format!(
            "UPDATE attendance_days SET {break_out} = ? \
             WHERE user_id = ? AND date = ? AND {break_in} IS NOT NULL AND {break_out} IS NULL"
        );

        let result = sqlx::query(&sql)
            .bind(at)
            .bind(user_id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn close_day(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: &str,
        breaks: &BreakLedger,
        total_working_ms: i64,
    ) -> Result<bool, StoreError> {
        // `<=>` is NULL-safe equality; blank columns read back as unset
        let mut query = sqlx::query(
            r#"
            UPDATE attendance_days
            SET time_out = ?, total_working_ms = ?
            WHERE user_id = ?
            AND date = ?
            AND time_out IS NULL
            AND NULLIF(mg_break_in, '') <=> ? AND NULLIF(mg_break_out, '') <=> ?
            AND NULLIF(lunch_break_in, '') <=> ? AND NULLIF(lunch_break_out, '') <=> ?
            AND NULLIF(eve_break_in, '') <=> ? AND NULLIF(eve_break_out, '') <=> ?
            "#,
        )
        .bind(at)
        .bind(total_working_ms)
        .bind(user_id)
        .bind(date);

        for (_, slot) in breaks.slots() {
            query = query.bind(slot.start.as_deref()).bind(slot.end.as_deref());
        }

        let result = query.execute(&self.pool).await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_range(
        &self,
        user_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<AttendanceDay>, StoreError> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            "{SELECT_DAY} WHERE user_id = ? AND date >= ? AND date < ? ORDER BY date, id"
        ))
        .bind(user_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceDay::from).collect())
    }

    async fn delete_day(&self, id: u64, user_id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendance_days WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for MySqlAttendanceStore {
    async fn list_tasks(&self, user_id: u64, attendance_id: u64) -> Result<Option<Vec<Task>>, StoreError> {
        let owned = sqlx::query("SELECT id FROM attendance_days WHERE id = ? AND user_id = ?")
            .bind(attendance_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        if owned.is_none() {
            return Ok(None);
        }

        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, attendance_id, name, timing, issue, status
            FROM tasks
            WHERE attendance_id = ? AND user_id = ?
            ORDER BY id
            "#,
        )
        .bind(attendance_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(tasks))
    }

    async fn add_task(&self, user_id: u64, attendance_id: u64, task: &NewTask) -> Result<bool, StoreError> {
        // Inserts nothing unless the day exists and is the user's
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (attendance_id, user_id, name, timing, issue, status)
            SELECT id, user_id, ?, ?, ?, ?
            FROM attendance_days
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&task.name)
        .bind(&task.timing)
        .bind(&task.issue)
        .bind(&task.status)
        .bind(attendance_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_task(
        &self,
        user_id: u64,
        attendance_id: u64,
        task_id: u64,
        changes: Vec<Assignment>,
    ) -> Result<bool, StoreError> {
        let update = build_update_sql(
            "tasks",
            changes,
            &[("id", task_id), ("attendance_id", attendance_id), ("user_id", user_id)],
        );

        Ok(execute_update(&self.pool, update).await? > 0)
    }

    async fn delete_tasks(&self, user_id: u64, attendance_id: u64, task_ids: &[u64]) -> Result<u64, StoreError> {
        if task_ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; task_ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM tasks WHERE attendance_id = ? AND user_id = ? AND id IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql).bind(attendance_id).bind(user_id);
        for id in task_ids {
            query = query.bind(*id);
        }

        Ok(query.execute(&self.pool).await?.rows_affected())
    }
}
