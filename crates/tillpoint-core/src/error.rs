//! # Error Types
//!
//! Domain error taxonomy for the till ledger.
//!
//! ## Propagation Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Everything here is RECOVERABLE.                                        │
//! │                                                                         │
//! │  ValidationError ──► LedgerError ──► UI message ──► operator retries    │
//! │                                                                         │
//! │  A failed operation leaves stock, logs and aggregates untouched, so    │
//! │  a corrected re-submission can never double-count. Nothing in this     │
//! │  core is fatal to the process and nothing is retried automatically —   │
//! │  "retry" means the human re-submits corrected input.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive, never manual `Display` impls
//! 2. Errors are enum variants with context, never bare strings
//! 3. Each variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Ledger Error
// =============================================================================

/// Failures surfaced by the ledger engine's call interface.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The operation is not valid in the current lifecycle state.
    ///
    /// ## When This Occurs
    /// - Starting a shift while another is still active (single till)
    /// - Ending a shift that is already closed
    /// - Recording a sale or refund against a closed shift
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An account payment (direct, or as a split leg) has no resolvable
    /// customer: no customer id and no name/phone pair on the leg.
    #[error("Account payment requires customer details")]
    MissingCustomerInfo,

    /// Input validation failure (wraps [`ValidationError`]).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl LedgerError {
    /// Convenience constructor for [`LedgerError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any state is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A transaction must carry at least one line item.
    #[error("Transaction has no items")]
    EmptyItems,

    /// Line and refund quantities must be greater than zero.
    #[error("Quantity must be positive, got {quantity} for product {product_id}")]
    NonPositiveQuantity { product_id: u64, quantity: i64 },

    /// A refund amount must be greater than zero.
    #[error("Refund amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Money },

    /// A split payment was submitted without its leg decomposition.
    #[error("Split payment requires split details")]
    SplitDetailsMissing,

    /// A split leg may not itself be a split.
    #[error("Split payment leg cannot be 'split'")]
    NestedSplit,

    /// The split legs do not sum to the transaction total within the
    /// 0.01-currency-unit tolerance.
    #[error("Split payments sum to {legs} but transaction total is {total}")]
    SplitTotalMismatch { total: Money, legs: Money },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
