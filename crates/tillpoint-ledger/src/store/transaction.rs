//! # Transaction Log
//!
//! Append-only store of committed sale and refund events.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE LOG IS THE SOURCE OF TRUTH                                         │
//! │                                                                         │
//! │  • No update. No delete. Corrections are new refund events.            │
//! │  • Shift aggregates are re-derived from here at till-close.            │
//! │  • Every report is a fold over this log, computed on demand.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;
use uuid::Uuid;

use tillpoint_core::Transaction;

/// Append-only transaction log.
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog {
            entries: Vec::new(),
        }
    }

    /// Appends a committed transaction. The entry is immutable from here on.
    pub fn append(&mut self, transaction: Transaction) {
        debug!(
            id = %transaction.id,
            shift_id = %transaction.shift_id,
            total = %transaction.total,
            is_refund = transaction.is_refund,
            "Appending transaction"
        );
        self.entries.push(transaction);
    }

    /// All transactions, oldest first.
    pub fn all(&self) -> &[Transaction] {
        &self.entries
    }

    /// Transactions belonging to one shift, oldest first.
    pub fn for_shift<'a>(&'a self, shift_id: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.entries.iter().filter(move |t| t.shift_id == shift_id)
    }
}

/// Generates a new transaction id.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().to_string()
}
