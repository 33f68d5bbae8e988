//! # Refund Log
//!
//! Append-only store of refund events. Each entry is mirrored by exactly
//! one `is_refund` transaction in the transaction log; this log exists so
//! the refund report can show per-product rows with name snapshots.

use tracing::debug;
use uuid::Uuid;

use tillpoint_core::Refund;

/// Append-only refund log.
#[derive(Debug, Default)]
pub struct RefundLog {
    entries: Vec<Refund>,
}

impl RefundLog {
    pub fn new() -> Self {
        RefundLog {
            entries: Vec::new(),
        }
    }

    /// Appends a committed refund. Immutable from here on.
    pub fn append(&mut self, refund: Refund) {
        debug!(
            id = %refund.id,
            shift_id = %refund.shift_id,
            product_id = refund.product_id,
            amount = %refund.amount,
            "Appending refund"
        );
        self.entries.push(refund);
    }

    /// All refunds, oldest first.
    pub fn all(&self) -> &[Refund] {
        &self.entries
    }

    /// Refunds belonging to one shift, oldest first.
    pub fn for_shift<'a>(&'a self, shift_id: &'a str) -> impl Iterator<Item = &'a Refund> {
        self.entries.iter().filter(move |r| r.shift_id == shift_id)
    }
}

/// Generates a new refund id.
pub fn generate_refund_id() -> String {
    Uuid::new_v4().to_string()
}
