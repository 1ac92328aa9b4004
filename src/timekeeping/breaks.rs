use strum_macros::Display;

/// The three break slots an attendance day carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BreakKind {
    #[strum(serialize = "MG")]
    Morning,
    #[strum(serialize = "Lunch")]
    Lunch,
    #[strum(serialize = "Evening")]
    Evening,
}

impl BreakKind {
    pub const ALL: [BreakKind; 3] = [BreakKind::Morning, BreakKind::Lunch, BreakKind::Evening];

    /// `(in, out)` column names in `attendance_days`.
    pub fn columns(self) -> (&'static str, &'static str) {
        match self {
            BreakKind::Morning => ("mg_break_in", "mg_break_out"),
            BreakKind::Lunch => ("lunch_break_in", "lunch_break_out"),
            BreakKind::Evening => ("eve_break_in", "eve_break_out"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    AlreadyOpen,
    NotActive,
}

/// One break interval. `start` without `end` is an open break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakSlot {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl BreakSlot {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn open(&mut self, at: &str) -> Result<(), SlotError> {
        if self.start.is_some() {
            return Err(SlotError::AlreadyOpen);
        }
        self.start = Some(at.to_string());
        Ok(())
    }

    pub fn close(&mut self, at: &str) -> Result<(), SlotError> {
        if !self.is_open() {
            return Err(SlotError::NotActive);
        }
        self.end = Some(at.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakLedger {
    pub morning: BreakSlot,
    pub lunch: BreakSlot,
    pub evening: BreakSlot,
}

impl BreakLedger {
    pub fn slot(&self, kind: BreakKind) -> &BreakSlot {
        match kind {
            BreakKind::Morning => &self.morning,
            BreakKind::Lunch => &self.lunch,
            BreakKind::Evening => &self.evening,
        }
    }

    pub fn slot_mut(&mut self, kind: BreakKind) -> &mut BreakSlot {
        match kind {
            BreakKind::Morning => &mut self.morning,
            BreakKind::Lunch => &mut self.lunch,
            BreakKind::Evening => &mut self.evening,
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = (BreakKind, &BreakSlot)> {
        BreakKind::ALL.into_iter().map(move |kind| (kind, self.slot(kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close() {
        let mut slot = BreakSlot::default();
        slot.open("12:00 PM").unwrap();
        assert!(slot.is_open());
        slot.close("12:45 PM").unwrap();
        assert!(slot.is_closed());
        assert_eq!(slot.end.as_deref(), Some("12:45 PM"));
    }

    #[test]
    fn second_open_is_rejected_even_after_close() {
        let mut slot = BreakSlot::default();
        slot.open("10:00 AM").unwrap();
        assert_eq!(slot.open("10:05 AM"), Err(SlotError::AlreadyOpen));
        slot.close("10:15 AM").unwrap();
        assert_eq!(slot.open("11:00 AM"), Err(SlotError::AlreadyOpen));
        assert_eq!(slot.start.as_deref(), Some("10:00 AM"));
    }

    #[test]
    fn closing_an_inactive_slot_is_rejected() {
        let mut slot = BreakSlot::default();
        assert_eq!(slot.close("10:00 AM"), Err(SlotError::NotActive));
        assert_eq!(slot.end, None);

        slot.open("10:00 AM").unwrap();
        slot.close("10:10 AM").unwrap();
        assert_eq!(slot.close("10:20 AM"), Err(SlotError::NotActive));
        assert_eq!(slot.end.as_deref(), Some("10:10 AM"));
    }

    #[test]
    fn slots_are_independent() {
        let mut ledger = BreakLedger::default();
        ledger.slot_mut(BreakKind::Lunch).open("12:00 PM").unwrap();
        ledger.slot_mut(BreakKind::Evening).open("04:00 PM").unwrap();
        ledger.slot_mut(BreakKind::Lunch).close("12:30 PM").unwrap();

        assert_eq!(ledger.morning, BreakSlot::default());
        assert!(ledger.lunch.is_closed());
        assert!(ledger.evening.is_open());
        assert_eq!(ledger.slots().count(), 3);
    }

    #[test]
    fn break_kind_labels_and_columns() {
        assert_eq!(BreakKind::Morning.to_string(), "MG");
        assert_eq!(BreakKind::Lunch.columns(), ("lunch_break_in", "lunch_break_out"));
    }
}
