//! # Domain Types
//!
//! Core domain types used throughout Tillpoint.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Shift       │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  operator_id    │   │  shift_id (FK)  │       │
//! │  │  price          │   │  start_float    │   │  items[]        │       │
//! │  │  stock?         │   │  sales_total    │   │  payment_method │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Refund      │   │ PaymentMethod   │   │  RefundMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_name   │   │  Cash           │   │  Cash           │       │
//! │  │  (snapshot)     │   │  Card           │   │  Shop2Shop      │       │
//! │  │  amount         │   │  Shop2Shop      │   └─────────────────┘       │
//! │  │  method         │   │  Account        │                             │
//! │  └─────────────────┘   │  Split          │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transactions and refunds are immutable once appended to their logs;
//! corrections are represented as new events, never in-place edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Payment Methods
// =============================================================================

/// How a sale was settled.
///
/// A closed enum (rather than free-form strings) so the breakdown fold can
/// match exhaustively: adding a tender type forces every report to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash in the drawer.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Shop2Shop voucher/QR settlement.
    Shop2Shop,
    /// Charged to a customer's running account balance.
    Account,
    /// More than one method on a single sale; see [`SplitPayment`].
    Split,
}

/// How a refund is paid out.
///
/// Deliberately narrower than [`PaymentMethod`]: a refund is always settled
/// against a single method, even when the original sale was split-paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RefundMethod {
    Cash,
    Shop2Shop,
}

impl RefundMethod {
    /// The payment method recorded on the mirrored refund transaction.
    #[inline]
    pub const fn as_payment_method(self) -> PaymentMethod {
        match self {
            RefundMethod::Cash => PaymentMethod::Cash,
            RefundMethod::Shop2Shop => PaymentMethod::Shop2Shop,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier, monotonically increasing.
    pub id: u64,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Selling price per unit.
    pub price: Money,

    /// Units on hand. `None` means the product is untracked (e.g. airtime):
    /// sales and refunds never touch it and it never appears in low-stock.
    pub stock: Option<i64>,
}

impl Product {
    /// Whether inventory is tracked for this product.
    #[inline]
    pub const fn tracks_stock(&self) -> bool {
        self.stock.is_some()
    }
}

/// Input for creating a product; the catalogue assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub stock: Option<i64>,
}

/// Partial update for a product. `None` fields are left unchanged;
/// `stock: Some(None)` switches the product to untracked.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<Option<i64>>,
}

// =============================================================================
// Shift
// =============================================================================

/// One operator session from till-open to till-close.
///
/// `sales_total` and `transaction_count` are maintained incrementally as
/// transactions commit, but they are a cache: closing the shift recomputes
/// both from the transaction log, which is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub operator_id: String,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    /// Set once by till-close; a shift with `end_time` is terminal.
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
    /// Cash physically placed in the drawer at open.
    pub start_float: Money,
    /// Cash counted in the drawer at close.
    pub end_float: Option<Money>,
    /// Running sales minus refunds for this shift.
    pub sales_total: Money,
    /// Running count of sale and refund transactions.
    pub transaction_count: u64,
}

impl Shift {
    /// A shift is active until `end_time` is stamped.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A line item on a transaction. The unit price is frozen at sale time so
/// later catalogue edits cannot rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub product_id: u64,
    pub quantity: i64,
    pub unit_price: Money,
}

impl TransactionItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// One leg of a split payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SplitPayment {
    /// Settlement method for this leg; never [`PaymentMethod::Split`].
    pub method: PaymentMethod,
    pub amount: Money,
    /// Customer reference for an account leg.
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// A committed sale or refund event in the transaction log.
///
/// The log is append-only and is the single source of truth for monetary
/// aggregates: every refund is mirrored here as a transaction with
/// `is_refund = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub shift_id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub total: Money,
    pub items: Vec<TransactionItem>,
    /// Cash tendered by the customer (zero for non-cash methods).
    pub cash_received: Money,
    /// Change handed back: `cash_received − total` for cash, zero otherwise.
    pub change: Money,
    pub payment_method: PaymentMethod,
    pub customer_id: Option<String>,
    /// Present iff `payment_method == Split`; legs sum to `total` within
    /// the split tolerance.
    pub split_payments: Option<Vec<SplitPayment>>,
    pub is_refund: bool,
}

impl Transaction {
    /// Cash actually taken into the drawer by this transaction: the full
    /// total for a cash sale, the cash leg for a split, zero otherwise.
    pub fn cash_component(&self) -> Money {
        match self.payment_method {
            PaymentMethod::Cash => self.total,
            PaymentMethod::Split => self
                .split_payments
                .iter()
                .flatten()
                .filter(|leg| leg.method == PaymentMethod::Cash)
                .map(|leg| leg.amount)
                .sum(),
            _ => Money::zero(),
        }
    }

    /// Whether this transaction moved cash (pure cash, or a split with a
    /// cash leg). Change given on these is cash leaving the drawer.
    pub fn is_cash_bearing(&self) -> bool {
        !self.cash_component().is_zero() || self.payment_method == PaymentMethod::Cash
    }
}

// =============================================================================
// Refund
// =============================================================================

/// A refund event in the refund log.
///
/// `product_name` is snapshotted at refund time so the refund report stays
/// readable after catalogue edits or deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub id: String,
    pub shift_id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub product_id: u64,
    pub product_name: String,
    pub quantity: i64,
    pub amount: Money,
    pub method: RefundMethod,
}

// =============================================================================
// Report Types
// =============================================================================

/// Per-method totals for a shift, derived from the transaction log.
///
/// Sales add to their bucket, refunds subtract from theirs, and split sales
/// distribute each leg into the leg's bucket. There is no `split` bucket:
/// split sales exist in the report only through their legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub cash: Money,
    pub card: Money,
    pub shop2shop: Money,
    pub account: Money,
}

impl PaymentBreakdown {
    /// Sum of all buckets; equals the shift's sales total.
    pub fn total(&self) -> Money {
        self.cash + self.card + self.shop2shop + self.account
    }
}

/// One row of the refund report (one per refund event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefundLine {
    pub product_id: u64,
    pub product_name: String,
    pub quantity: i64,
    pub amount: Money,
}

/// Refund report for a shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RefundBreakdown {
    pub total: Money,
    pub items: Vec<RefundLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
