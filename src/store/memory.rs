use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AttendanceStore, CreateOutcome, StoreError, TaskStore};
use crate::model::attendance::AttendanceDay;
use crate::model::task::{NewTask, Task};
use crate::timekeeping::breaks::{BreakKind, BreakLedger};
use crate::utils::db_utils::{Assignment, SqlValue};

/// In-process store with the same conditional-update semantics as MySQL.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    days: Vec<AttendanceDay>,
    next_task_id: u64,
    /// `(owner, task)`
    tasks: Vec<(u64, Task)>,
}

impl State {
    fn day_mut(&mut self, user_id: u64, date: NaiveDate) -> Option<&mut AttendanceDay> {
        self.days
            .iter_mut()
            .find(|d| d.user_id == user_id && d.date == date)
    }

    fn owns(&self, user_id: u64, attendance_id: u64) -> bool {
        self.days.iter().any(|d| d.id == attendance_id && d.user_id == user_id)
    }
}

impl MemoryAttendanceStore {
    pub fn insert(&self, mut day: AttendanceDay) -> AttendanceDay {
        let mut state = self.state.lock().expect("store poisoned");
        state.next_id += 1;
        day.id = state.next_id;
        state.days.push(day.clone());
        day
    }

    pub fn get(&self, user_id: u64, date: NaiveDate) -> Option<AttendanceDay> {
        let mut state = self.state.lock().expect("store poisoned");
        state.day_mut(user_id, date).cloned()
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn find_day(&self, user_id: u64, date: NaiveDate) -> Result<Option<AttendanceDay>, StoreError> {
        Ok(self.get(user_id, date))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceDay>, StoreError> {
        let state = self.state.lock().expect("store poisoned");
        Ok(state.days.iter().find(|d| d.id == id).cloned())
    }

    async fn create_day(
        &self,
        user_id: u64,
        date: NaiveDate,
        time_in: &str,
    ) -> Result<CreateOutcome, StoreError> {
        if self.get(user_id, date).is_some() {
            return Ok(CreateOutcome::Duplicate);
        }
        let day = self.insert(AttendanceDay::opened(0, user_id, date, time_in));
        Ok(CreateOutcome::Created(day))
    }

    async fn open_break(
        &self,
        user_id: u64,
        date: NaiveDate,
        kind: BreakKind,
        at: &str,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        Ok(state
            .day_mut(user_id, date)
            .is_some_and(|d| d.breaks.slot_mut(kind).open(at).is_ok()))
    }

    async fn close_break(
        &self,
        user_id: u64,
        date: NaiveDate,
        kind: BreakKind,
        at: &str,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        Ok(state
            .day_mut(user_id, date)
            .is_some_and(|d| d.breaks.slot_mut(kind).close(at).is_ok()))
    }

    async fn close_day(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: &str,
        breaks: &BreakLedger,
        total_working_ms: i64,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        match state.day_mut(user_id, date) {
            Some(day) if day.time_out.is_none() && day.breaks == *breaks => {
                day.time_out = Some(at.to_string());
                day.total_working_ms = total_working_ms;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_range(
        &self,
        user_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<AttendanceDay>, StoreError> {
        let state = self.state.lock().expect("store poisoned");
        let mut days: Vec<_> = state
            .days
            .iter()
            .filter(|d| d.user_id == user_id && d.date >= from && d.date < until)
            .cloned()
            .collect();
        days.sort_by_key(|d| (d.date, d.id));
        Ok(days)
    }

    async fn delete_day(&self, id: u64, user_id: u64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        let before = state.days.len();
        state.days.retain(|d| !(d.id == id && d.user_id == user_id));
        let deleted = state.days.len() != before;
        if deleted {
            state.tasks.retain(|(_, t)| t.attendance_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl TaskStore for MemoryAttendanceStore {
    async fn list_tasks(&self, user_id: u64, attendance_id: u64) -> Result<Option<Vec<Task>>, StoreError> {
        let state = self.state.lock().expect("store poisoned");
        if !state.owns(user_id, attendance_id) {
            return Ok(None);
        }
        Ok(Some(
            state
                .tasks
                .iter()
                .filter(|(_, t)| t.attendance_id == attendance_id)
                .map(|(_, t)| t.clone())
                .collect(),
        ))
    }

    async fn add_task(&self, user_id: u64, attendance_id: u64, task: &NewTask) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        if !state.owns(user_id, attendance_id) {
            return Ok(false);
        }
        state.next_task_id += 1;
        let id = state.next_task_id;
        state.tasks.push((
            user_id,
            Task {
                id,
                attendance_id,
                name: task.name.clone(),
                timing: task.timing.clone(),
                issue: task.issue.clone(),
                status: task.status.clone(),
            },
        ));
        Ok(true)
    }

    async fn update_task(
        &self,
        user_id: u64,
        attendance_id: u64,
        task_id: u64,
        changes: Vec<Assignment>,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        let Some((_, task)) = state
            .tasks
            .iter_mut()
            .find(|(owner, t)| *owner == user_id && t.attendance_id == attendance_id && t.id == task_id)
        else {
            return Ok(false);
        };

        for (column, value) in changes {
            let SqlValue::String(value) = value else { continue };
            match column {
                "name" => task.name = value,
                "timing" => task.timing = value,
                "issue" => task.issue = value,
                "status" => task.status = value,
                _ => {}
            }
        }
        Ok(true)
    }

    async fn delete_tasks(&self, user_id: u64, attendance_id: u64, task_ids: &[u64]) -> Result<u64, StoreError> {
        let mut state = self.state.lock().expect("store poisoned");
        let before = state.tasks.len();
        state.tasks.retain(|(owner, t)| {
            !(*owner == user_id && t.attendance_id == attendance_id && task_ids.contains(&t.id))
        });
        Ok((before - state.tasks.len()) as u64)
    }
}
