use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

use super::breaks::{BreakKind, SlotError};
use crate::model::attendance::AttendanceDay;

/// Actions a client can send against today's record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceAction {
    TimeIn,
    MgIn,
    MgOut,
    LunchIn,
    LunchOut,
    EveIn,
    EveOut,
    TimeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Creates the day's record.
    TimeIn,
    /// Changes an existing record.
    Update(Mutation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    BreakIn(BreakKind),
    BreakOut(BreakKind),
    TimeOut,
}

impl AttendanceAction {
    pub fn transition(self) -> Transition {
        use AttendanceAction::*;
        match self {
            TimeIn => Transition::TimeIn,
            MgIn => Transition::Update(Mutation::BreakIn(BreakKind::Morning)),
            MgOut => Transition::Update(Mutation::BreakOut(BreakKind::Morning)),
            LunchIn => Transition::Update(Mutation::BreakIn(BreakKind::Lunch)),
            LunchOut => Transition::Update(Mutation::BreakOut(BreakKind::Lunch)),
            EveIn => Transition::Update(Mutation::BreakIn(BreakKind::Evening)),
            EveOut => Transition::Update(Mutation::BreakOut(BreakKind::Evening)),
            TimeOut => Transition::Update(Mutation::TimeOut),
        }
    }
}

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    #[display(fmt = "{} break already started", _0)]
    AlreadyOpen(BreakKind),
    #[display(fmt = "{} break not active", _0)]
    NotActive(BreakKind),
    #[display(fmt = "Already timed out")]
    AlreadyClosed,
    #[display(fmt = "Please Time In first")]
    MustTimeInFirst,
    #[display(fmt = "Already timed in today")]
    AlreadyTimedIn,
    #[display(fmt = "Attendance record changed concurrently, retry")]
    ConcurrentUpdate,
}

impl Transition {
    /// Checks the transition against today's record, if any.
    pub fn check(self, day: Option<&AttendanceDay>) -> Result<(), Rejection> {
        match (self, day) {
            (Transition::TimeIn, None) => Ok(()),
            (Transition::TimeIn, Some(_)) => Err(Rejection::AlreadyTimedIn),
            (Transition::Update(_), None) => Err(Rejection::MustTimeInFirst),
            (Transition::Update(mutation), Some(day)) => mutation.apply(&mut day.clone(), ""),
        }
    }
}

impl Mutation {
    /// Stamps `at` into `day`, or explains why the record is in the wrong state.
    pub fn apply(self, day: &mut AttendanceDay, at: &str) -> Result<(), Rejection> {
        match self {
            Mutation::BreakIn(kind) => day.breaks.slot_mut(kind).open(at).map_err(|e| match e {
                SlotError::AlreadyOpen => Rejection::AlreadyOpen(kind),
                SlotError::NotActive => Rejection::NotActive(kind),
            }),
            Mutation::BreakOut(kind) => {
                day.breaks
                    .slot_mut(kind)
                    .close(at)
                    .map_err(|_| Rejection::NotActive(kind))
            }
            Mutation::TimeOut => {
                if day.time_out.is_some() {
                    return Err(Rejection::AlreadyClosed);
                }
                day.time_out = Some(at.to_string());
                Ok(())
            }
        }
    }
}
