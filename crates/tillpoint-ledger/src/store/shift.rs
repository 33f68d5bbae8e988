//! # Shift Store
//!
//! Shift records plus the two lifecycle queries the till UI needs:
//! the active shift (at most one, single-till) and the most recently
//! completed one (used to pre-fill the next opening float display).

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use tillpoint_core::{Money, Shift};

/// In-memory shift store.
#[derive(Debug, Default)]
pub struct ShiftStore {
    shifts: Vec<Shift>,
}

impl ShiftStore {
    pub fn new() -> Self {
        ShiftStore { shifts: Vec::new() }
    }

    /// Creates a new active shift. The single-active-shift invariant is
    /// enforced by the engine before calling this.
    pub fn create(&mut self, operator_id: &str, start_float: Money) -> Shift {
        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            operator_id: operator_id.to_string(),
            start_time: Utc::now(),
            end_time: None,
            start_float,
            end_float: None,
            sales_total: Money::zero(),
            transaction_count: 0,
        };

        debug!(id = %shift.id, operator = %operator_id, "Creating shift");
        self.shifts.push(shift.clone());
        shift
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Shift> {
        self.shifts.iter_mut().find(|s| s.id == id)
    }

    /// The shift with no end time, if any.
    pub fn active(&self) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.is_active())
    }

    /// The most recently ended shift, by `end_time` descending.
    ///
    /// Informational only: it pre-fills the next opening-float display and
    /// is never authoritative for reconciliation.
    pub fn last_completed(&self) -> Option<&Shift> {
        self.shifts
            .iter()
            .filter(|s| s.end_time.is_some())
            .max_by_key(|s| s.end_time)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_and_active() {
        let mut store = ShiftStore::new();
        assert!(store.active().is_none());

        let shift = store.create("op-1", Money::from_cents(50_000));
        assert!(shift.is_active());
        assert_eq!(shift.sales_total, Money::zero());
        assert_eq!(shift.transaction_count, 0);
        assert_eq!(store.active().unwrap().id, shift.id);
    }

    #[test]
    fn test_last_completed_orders_by_end_time() {
        let mut store = ShiftStore::new();
        let first = store.create("op-1", Money::from_cents(10_000));
        let second = store.create("op-2", Money::from_cents(20_000));

        let now = Utc::now();
        // Close the first shift *after* the second to check ordering is by
        // end_time, not insertion order
        store.find_by_id_mut(&second.id).unwrap().end_time = Some(now - Duration::hours(1));
        store.find_by_id_mut(&first.id).unwrap().end_time = Some(now);

        assert_eq!(store.last_completed().unwrap().id, first.id);
    }

    #[test]
    fn test_last_completed_ignores_active() {
        let mut store = ShiftStore::new();
        store.create("op-1", Money::zero());
        assert!(store.last_completed().is_none());
    }
}
