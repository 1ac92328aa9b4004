use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::attendance::AttendanceDay;
use crate::store::{AttendanceStore, CreateOutcome};
use crate::timekeeping::clock::Clock;
use crate::timekeeping::monthly_report::month_bounds;
use crate::timekeeping::state_machine::{AttendanceAction, Mutation, Rejection, Transition};
use crate::timekeeping::time_parser::format_clock;
use crate::timekeeping::working_time::{working_ms_final, working_ms_live};

const MAX_ATTEMPTS: u32 = 3;

/// A record plus its live working time at the moment it was read.
#[derive(Debug, Clone)]
pub struct TrackedDay {
    pub day: AttendanceDay,
    pub working_ms: i64,
}

pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Runs one attendance action against the user's record for today.
    ///
    /// A conditional update that loses to a concurrent change is retried on a
    /// fresh read while the action is still allowed.
    pub async fn handle_action(
        &self,
        user_id: u64,
        action: AttendanceAction,
    ) -> Result<TrackedDay, AppError> {
        let now = self.clock.now();
        let date = now.date();
        let stamp = format_clock(now.time());
        let transition = action.transition();

        let mut attempt = 1;
        let day = loop {
            let snapshot = self.store.find_day(user_id, date).await?;
            if let Err(rejection) = transition.check(snapshot.as_ref()) {
                debug!(user_id, action = action.as_ref(), %rejection, "Attendance action rejected");
                return Err(rejection.into());
            }

            match (transition, snapshot) {
                (Transition::TimeIn, _) => match self.store.create_day(user_id, date, &stamp).await? {
                    CreateOutcome::Created(day) => break day,
                    CreateOutcome::Duplicate => return Err(Rejection::AlreadyTimedIn.into()),
                },
                (Transition::Update(_), None) => return Err(Rejection::MustTimeInFirst.into()),
                (Transition::Update(mutation), Some(snapshot)) => {
                    let mut day = snapshot.clone();
                    mutation.apply(&mut day, &stamp)?;
                    if mutation == Mutation::TimeOut {
                        day.total_working_ms = working_ms_final(&day, date)?;
                    }
                    if self.commit(user_id, date, mutation, &snapshot, &day, &stamp).await? {
                        break day;
                    }

                    let rejection = self.diagnose(user_id, date, mutation).await?;
                    if rejection != Rejection::ConcurrentUpdate || attempt == MAX_ATTEMPTS {
                        return Err(rejection.into());
                    }
                    attempt += 1;
                }
            }
        };

        let working_ms = working_ms_live(&day, now)?;
        info!(user_id, action = action.as_ref(), %date, working_ms, "Attendance action recorded");

        Ok(TrackedDay { day, working_ms })
    }

    async fn commit(
        &self,
        user_id: u64,
        date: NaiveDate,
        mutation: Mutation,
        snapshot: &AttendanceDay,
        day: &AttendanceDay,
        stamp: &str,
    ) -> Result<bool, AppError> {
        let applied = match mutation {
            Mutation::BreakIn(kind) => self.store.open_break(user_id, date, kind, stamp).await?,
            Mutation::BreakOut(kind) => self.store.close_break(user_id, date, kind, stamp).await?,
            Mutation::TimeOut => {
                self.store
                    .close_day(user_id, date, stamp, &snapshot.breaks, day.total_working_ms)
                    .await?
            }
        };
        Ok(applied)
    }

    /// Explains a conditional update that matched no row.
    async fn diagnose(
        &self,
        user_id: u64,
        date: NaiveDate,
        mutation: Mutation,
    ) -> Result<Rejection, AppError> {
        let current = self.store.find_day(user_id, date).await?;
        let rejection = match Transition::Update(mutation).check(current.as_ref()) {
            Err(rejection) => rejection,
            Ok(()) => Rejection::ConcurrentUpdate,
        };
        debug!(user_id, %date, %rejection, "Conditional update lost a race");
        Ok(rejection)
    }

    /// Today's record with its running total.
    pub async fn today(&self, user_id: u64) -> Result<TrackedDay, AppError> {
        let now = self.clock.now();
        let day = self
            .store
            .find_day(user_id, now.date())
            .await?
            .ok_or_else(|| AppError::NotFound("No attendance recorded today".into()))?;
        let working_ms = working_ms_live(&day, now)?;
        Ok(TrackedDay { day, working_ms })
    }

    /// Raw records of one month, oldest first.
    pub async fn month_records(
        &self,
        user_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Vec<AttendanceDay>, AppError> {
        let (from, until) = validate_period(month, year)?;
        Ok(self.store.list_range(user_id, from, until).await?)
    }

    pub async fn delete(&self, id: u64, owner_id: u64) -> Result<(), AppError> {
        if self.store.delete_day(id, owner_id).await? {
            info!(id, user_id = owner_id, "Attendance record deleted");
            Ok(())
        } else {
            Err(AppError::NotFound("Attendance record not found".into()))
        }
    }
}

/// Checks a report period and returns its `[first, next-first)` bounds.
pub fn validate_period(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), AppError> {
    if !(1970..=9999).contains(&year) {
        return Err(AppError::Validation(format!("Invalid year {year}")));
    }
    month_bounds(year, month).ok_or_else(|| AppError::Validation(format!("Invalid month {month}")))
}
