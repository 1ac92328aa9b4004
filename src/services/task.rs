use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::model::task::{NewTask, Task};
use crate::store::TaskStore;
use crate::utils::db_utils::{Updatable, parse_patch};

const UPDATABLE: &[Updatable] = &[
    Updatable { field: "name", column: "name" },
    Updatable { field: "timing", column: "timing" },
    Updatable { field: "issue", column: "issue" },
    Updatable { field: "status", column: "status" },
];

/// The work log of one attendance day, answered after every change.
#[derive(Debug)]
pub struct TaskLog {
    pub attendance_id: u64,
    pub tasks: Vec<Task>,
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, user_id: u64, attendance_id: u64) -> Result<TaskLog, AppError> {
        let tasks = self
            .store
            .list_tasks(user_id, attendance_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Attendance record not found".into()))?;
        Ok(TaskLog { attendance_id, tasks })
    }

    pub async fn add(&self, user_id: u64, attendance_id: u64, task: &NewTask) -> Result<TaskLog, AppError> {
        if !self.store.add_task(user_id, attendance_id, task).await? {
            return Err(AppError::NotFound("Attendance record not found".into()));
        }
        info!(user_id, attendance_id, "Task added");
        self.list(user_id, attendance_id).await
    }

    /// Partial update of name, timing, issue or status.
    pub async fn update(
        &self,
        user_id: u64,
        attendance_id: u64,
        task_id: u64,
        patch: &Value,
    ) -> Result<TaskLog, AppError> {
        let changes = parse_patch(patch, UPDATABLE)?;
        if !self.store.update_task(user_id, attendance_id, task_id, changes).await? {
            return Err(AppError::NotFound("Task not found".into()));
        }
        self.list(user_id, attendance_id).await
    }

    pub async fn delete(&self, user_id: u64, attendance_id: u64, task_id: u64) -> Result<TaskLog, AppError> {
        let removed = self.store.delete_tasks(user_id, attendance_id, &[task_id]).await?;
        let log = self.list(user_id, attendance_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        info!(user_id, attendance_id, task_id, "Task deleted");
        Ok(log)
    }

    /// Removes every listed task; ids that do not exist are skipped.
    pub async fn delete_many(
        &self,
        user_id: u64,
        attendance_id: u64,
        task_ids: &[u64],
    ) -> Result<TaskLog, AppError> {
        let removed = self.store.delete_tasks(user_id, attendance_id, task_ids).await?;
        let log = self.list(user_id, attendance_id).await?;
        info!(user_id, attendance_id, removed, "Tasks deleted");
        Ok(log)
    }
}
