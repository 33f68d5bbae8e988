//! # Ledger Engine
//!
//! The till ledger's single write path: transaction and refund creation,
//! stock mutation, shift lifecycle, and the derived cashup views.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   One Lock, One Commit                                  │
//! │                                                                         │
//! │  create_transaction(request)                                            │
//! │       │                                                                 │
//! │       ▼  lock ledger state                                              │
//! │  1. VALIDATE  shift active, items, split legs, customer info,          │
//! │               products exist           ── any failure → return,        │
//! │       │                                   nothing touched              │
//! │       ▼                                                                 │
//! │  2. COMMIT    adjust stock ──► bump shift aggregates ──► append log    │
//! │       │                                                                 │
//! │       ▼  unlock                                                         │
//! │  Either all three effects happen or none do. Two concurrent checkouts  │
//! │  can never observe a half-applied stock decrement.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The incremental shift aggregates are a cache. Till-close recomputes them
//! from the transaction log, which heals any drift and keeps the log the
//! single source of truth.

use std::sync::Mutex;

use chrono::Utc;
use tracing::{info, warn};

use tillpoint_core::validation::{
    validate_customer_info, validate_items, validate_refund, validate_split,
};
use tillpoint_core::{
    LedgerError, LedgerResult, Money, NewProduct, PaymentBreakdown, PaymentMethod, Product,
    ProductUpdate, Refund, RefundBreakdown, RefundMethod, Shift, SplitPayment, Transaction,
    TransactionItem,
};

use crate::reports;
use crate::store::{
    refund::generate_refund_id, transaction::generate_transaction_id, CatalogueStore, RefundLog,
    ShiftStore, TransactionLog,
};

// =============================================================================
// Requests
// =============================================================================

/// Checkout submission from the cart UI.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub shift_id: String,
    /// Line items with prices frozen at cart time.
    pub items: Vec<TransactionItem>,
    /// Cash tendered; only meaningful for cash payments.
    pub cash_received: Money,
    pub payment_method: PaymentMethod,
    /// Customer reference for account payments.
    pub customer_id: Option<String>,
    /// Leg decomposition; required iff `payment_method` is `Split`.
    pub split_payments: Option<Vec<SplitPayment>>,
}

// =============================================================================
// Ledger State
// =============================================================================

/// Everything the engine owns, guarded as one unit.
#[derive(Debug, Default)]
struct LedgerState {
    catalogue: CatalogueStore,
    shifts: ShiftStore,
    transactions: TransactionLog,
    refunds: RefundLog,
}

impl LedgerState {
    /// Commits a validated transaction: stock, shift aggregates, log append.
    ///
    /// Callers must have validated everything first — this function cannot
    /// fail, which is what makes the commit all-or-nothing.
    fn commit(&mut self, txn: Transaction) {
        let stock_sign: i64 = if txn.is_refund { 1 } else { -1 };
        for item in &txn.items {
            if let Some(level) = self
                .catalogue
                .apply_stock_delta(item.product_id, stock_sign * item.quantity)
            {
                if level < 0 {
                    warn!(
                        product_id = item.product_id,
                        stock = level,
                        "Stock went negative on commit"
                    );
                }
            }
        }

        if let Some(shift) = self.shifts.find_by_id_mut(&txn.shift_id) {
            if txn.is_refund {
                shift.sales_total -= txn.total;
            } else {
                shift.sales_total += txn.total;
            }
            shift.transaction_count += 1;
        }

        info!(
            id = %txn.id,
            shift_id = %txn.shift_id,
            total = %txn.total,
            method = ?txn.payment_method,
            is_refund = txn.is_refund,
            "Committed transaction"
        );
        self.transactions.append(txn);
    }

    /// Resolves a shift that must still be open, or explains why not.
    fn require_active_shift(&self, shift_id: &str) -> LedgerResult<&Shift> {
        let shift = self
            .shifts
            .find_by_id(shift_id)
            .ok_or_else(|| LedgerError::not_found("Shift", shift_id))?;
        if !shift.is_active() {
            return Err(LedgerError::InvalidState(format!(
                "shift {shift_id} has already ended"
            )));
        }
        Ok(shift)
    }

    /// Resolves any shift, open or closed (reports work on both).
    fn require_shift(&self, shift_id: &str) -> LedgerResult<&Shift> {
        self.shifts
            .find_by_id(shift_id)
            .ok_or_else(|| LedgerError::not_found("Shift", shift_id))
    }
}

// =============================================================================
// Ledger Engine
// =============================================================================

/// The till ledger and shift-reconciliation engine.
///
/// Construct one per process (or one per test) and share it by reference;
/// there is no global state. All mutations — checkout and refund flows
/// alike — serialize through the internal mutex, so the catalogue and the
/// logs sit behind a single boundary.
///
/// ## Usage
/// ```rust
/// use tillpoint_core::{Money, NewProduct, PaymentMethod, TransactionItem};
/// use tillpoint_ledger::{LedgerEngine, TransactionRequest};
///
/// let engine = LedgerEngine::new();
/// let product = engine.add_product(NewProduct {
///     name: "Bread".into(),
///     price: Money::from_cents(1800),
///     stock: Some(20),
/// });
/// let shift = engine.start_shift("op-1", Money::from_cents(50_000)).unwrap();
///
/// let txn = engine
///     .create_transaction(TransactionRequest {
///         shift_id: shift.id.clone(),
///         items: vec![TransactionItem {
///             product_id: product.id,
///             quantity: 1,
///             unit_price: product.price,
///         }],
///         cash_received: Money::from_cents(2000),
///         payment_method: PaymentMethod::Cash,
///         customer_id: None,
///         split_payments: None,
///     })
///     .unwrap();
/// assert_eq!(txn.change.cents(), 200);
/// ```
#[derive(Debug, Default)]
pub struct LedgerEngine {
    inner: Mutex<LedgerState>,
}

impl LedgerEngine {
    /// Creates an engine with empty stores.
    pub fn new() -> Self {
        LedgerEngine {
            inner: Mutex::new(LedgerState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.inner.lock().expect("ledger mutex poisoned")
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Adds a product to the catalogue.
    pub fn add_product(&self, new: NewProduct) -> Product {
        self.state().catalogue.add(new)
    }

    /// Applies a partial product update.
    pub fn update_product(&self, id: u64, update: ProductUpdate) -> LedgerResult<Product> {
        self.state()
            .catalogue
            .update(id, update)
            .ok_or_else(|| LedgerError::not_found("Product", id))
    }

    /// Deletes a product; returns whether it existed.
    pub fn delete_product(&self, id: u64) -> bool {
        self.state().catalogue.delete(id)
    }

    /// Looks up a product by id.
    pub fn find_product(&self, id: u64) -> Option<Product> {
        self.state().catalogue.find_by_id(id).cloned()
    }

    /// Lists the whole catalogue in id order.
    pub fn list_products(&self) -> Vec<Product> {
        self.state().catalogue.list().cloned().collect()
    }

    /// Tracked products with `0 < stock <= threshold`.
    pub fn low_stock_products(&self, threshold: i64) -> Vec<Product> {
        self.state().catalogue.low_stock(threshold)
    }

    // =========================================================================
    // Shift Lifecycle
    // =========================================================================

    /// Opens a shift with the counted starting float.
    ///
    /// ## Errors
    /// `InvalidState` if a shift is already active: this is a single-till
    /// ledger and at most one shift may be open.
    pub fn start_shift(&self, operator_id: &str, start_float: Money) -> LedgerResult<Shift> {
        let mut state = self.state();

        if let Some(active) = state.shifts.active() {
            return Err(LedgerError::InvalidState(format!(
                "shift {} is still active",
                active.id
            )));
        }

        let shift = state.shifts.create(operator_id, start_float);
        info!(id = %shift.id, operator = %operator_id, float = %start_float, "Shift started");
        Ok(shift)
    }

    /// The currently open shift, if any.
    pub fn active_shift(&self) -> Option<Shift> {
        self.state().shifts.active().cloned()
    }

    /// The most recently ended shift (pre-fills the next float display).
    pub fn last_completed_shift(&self) -> Option<Shift> {
        self.state().shifts.last_completed().cloned()
    }

    /// Closes a shift with the counted ending float.
    ///
    /// ## Reconciliation Guard
    /// `sales_total` and `transaction_count` are recomputed strictly from
    /// the transaction log — the incrementally maintained values are never
    /// trusted here. Any drift the cache picked up during the shift is
    /// healed by this recomputation.
    ///
    /// ## Errors
    /// - `NotFound` if no shift has this id
    /// - `InvalidState` if the shift is already closed (closing is terminal)
    pub fn end_shift(&self, shift_id: &str, end_float: Money) -> LedgerResult<Shift> {
        let mut state = self.state();

        state.require_active_shift(shift_id)?;

        let mut sales_total = Money::zero();
        let mut transaction_count: u64 = 0;
        for txn in state.transactions.for_shift(shift_id) {
            if txn.is_refund {
                sales_total -= txn.total;
            } else {
                sales_total += txn.total;
            }
            transaction_count += 1;
        }

        let now = Utc::now();
        // Lookup cannot fail: require_active_shift resolved it above
        let shift = match state.shifts.find_by_id_mut(shift_id) {
            Some(shift) => shift,
            None => return Err(LedgerError::not_found("Shift", shift_id)),
        };
        shift.sales_total = sales_total;
        shift.transaction_count = transaction_count;
        shift.end_time = Some(now);
        shift.end_float = Some(end_float);

        let closed = shift.clone();
        info!(
            id = %closed.id,
            sales_total = %closed.sales_total,
            transactions = closed.transaction_count,
            end_float = %end_float,
            "Shift ended"
        );
        Ok(closed)
    }

    // =========================================================================
    // Transactions & Refunds
    // =========================================================================

    /// Records a sale against an active shift.
    ///
    /// Validates, then commits log append + stock mutation + shift
    /// aggregate as one step under the ledger lock. A failed submission
    /// leaves no trace, so the operator can correct and resubmit.
    ///
    /// ## Errors
    /// - `NotFound` — unknown shift or line product
    /// - `InvalidState` — shift already ended
    /// - `Validation` — empty items, non-positive quantity, bad split legs
    /// - `MissingCustomerInfo` — account tender with no resolvable customer
    pub fn create_transaction(&self, request: TransactionRequest) -> LedgerResult<Transaction> {
        let mut state = self.state();

        state.require_active_shift(&request.shift_id)?;
        validate_items(&request.items)?;
        for item in &request.items {
            if state.catalogue.find_by_id(item.product_id).is_none() {
                return Err(LedgerError::not_found("Product", item.product_id));
            }
        }

        let total: Money = request.items.iter().map(|i| i.line_total()).sum();

        if request.payment_method == PaymentMethod::Split {
            validate_split(total, request.split_payments.as_deref())?;
        }
        validate_customer_info(
            request.payment_method,
            request.customer_id.as_deref(),
            request.split_payments.as_deref(),
        )?;

        let change = match request.payment_method {
            PaymentMethod::Cash => request.cash_received - total,
            _ => Money::zero(),
        };

        let txn = Transaction {
            id: generate_transaction_id(),
            shift_id: request.shift_id,
            timestamp: Utc::now(),
            total,
            items: request.items,
            cash_received: request.cash_received,
            change,
            payment_method: request.payment_method,
            customer_id: request.customer_id,
            split_payments: if request.payment_method == PaymentMethod::Split {
                request.split_payments
            } else {
                None
            },
            is_refund: false,
        };

        state.commit(txn.clone());
        Ok(txn)
    }

    /// Records a refund against an active shift.
    ///
    /// Appends one refund row and exactly one mirrored transaction with
    /// `is_refund = true` and `total` equal to the refund amount, restocking
    /// the product when it is tracked. The mirror keeps the transaction log
    /// the single source of truth for monetary aggregates.
    pub fn create_refund(
        &self,
        shift_id: &str,
        product_id: u64,
        quantity: i64,
        amount: Money,
        method: RefundMethod,
    ) -> LedgerResult<Refund> {
        let mut state = self.state();

        state.require_active_shift(shift_id)?;
        validate_refund(product_id, quantity, amount)?;
        let product = state
            .catalogue
            .find_by_id(product_id)
            .ok_or_else(|| LedgerError::not_found("Product", product_id))?;

        let refund = Refund {
            id: generate_refund_id(),
            shift_id: shift_id.to_string(),
            timestamp: Utc::now(),
            product_id,
            product_name: product.name.clone(),
            quantity,
            amount,
            method,
        };

        // Mirror transaction: the line snapshots the catalogue unit price,
        // the total carries the refund amount exactly.
        let mirror = Transaction {
            id: generate_transaction_id(),
            shift_id: shift_id.to_string(),
            timestamp: refund.timestamp,
            total: amount,
            items: vec![TransactionItem {
                product_id,
                quantity,
                unit_price: product.price,
            }],
            cash_received: Money::zero(),
            change: Money::zero(),
            payment_method: method.as_payment_method(),
            customer_id: None,
            split_payments: None,
            is_refund: true,
        };

        state.refunds.append(refund.clone());
        state.commit(mirror);
        Ok(refund)
    }

    /// All transactions for a shift, oldest first.
    pub fn shift_transactions(&self, shift_id: &str) -> LedgerResult<Vec<Transaction>> {
        let state = self.state();
        state.require_shift(shift_id)?;
        Ok(state.transactions.for_shift(shift_id).cloned().collect())
    }

    // =========================================================================
    // Derived Views (computed, never cached)
    // =========================================================================

    /// Per-method totals for a shift, folded from the transaction log.
    pub fn shift_payment_breakdown(&self, shift_id: &str) -> LedgerResult<PaymentBreakdown> {
        let state = self.state();
        state.require_shift(shift_id)?;
        Ok(reports::payment_breakdown(
            state.transactions.for_shift(shift_id),
        ))
    }

    /// Refund report for a shift, one row per refund event.
    pub fn shift_refund_breakdown(&self, shift_id: &str) -> LedgerResult<RefundBreakdown> {
        let state = self.state();
        state.require_shift(shift_id)?;
        Ok(reports::refund_breakdown(state.refunds.for_shift(shift_id)))
    }

    /// What the drawer should hold right now for the given shift.
    pub fn expected_cash_in_drawer(&self, shift_id: &str) -> LedgerResult<Money> {
        let state = self.state();
        let shift = state.require_shift(shift_id)?;
        let start_float = shift.start_float;
        let transactions: Vec<&Transaction> = state.transactions.for_shift(shift_id).collect();
        Ok(reports::expected_cash_in_drawer(start_float, transactions))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tillpoint_core::ValidationError;

    fn engine_with_product(price_cents: i64, stock: Option<i64>) -> (LedgerEngine, Product, Shift) {
        let engine = LedgerEngine::new();
        let product = engine.add_product(NewProduct {
            name: "Bread".into(),
            price: Money::from_cents(price_cents),
            stock,
        });
        let shift = engine
            .start_shift("op-1", Money::from_cents(50_000))
            .unwrap();
        (engine, product, shift)
    }

    fn cash_request(shift: &Shift, product: &Product, qty: i64, tendered: i64) -> TransactionRequest {
        TransactionRequest {
            shift_id: shift.id.clone(),
            items: vec![TransactionItem {
                product_id: product.id,
                quantity: qty,
                unit_price: product.price,
            }],
            cash_received: Money::from_cents(tendered),
            payment_method: PaymentMethod::Cash,
            customer_id: None,
            split_payments: None,
        }
    }

    fn split_leg(method: PaymentMethod, cents: i64) -> SplitPayment {
        SplitPayment {
            method,
            amount: Money::from_cents(cents),
            customer_name: None,
            customer_phone: None,
        }
    }

    // -------------------------------------------------------------------------
    // Worked scenario: float 500, sell 2×85 cash with 200 tendered,
    // then refund one for 85 cash.
    // -------------------------------------------------------------------------

    #[test]
    fn test_cash_sale_scenario() {
        let (engine, product, shift) = engine_with_product(8_500, Some(50));

        let txn = engine
            .create_transaction(cash_request(&shift, &product, 2, 20_000))
            .unwrap();

        assert_eq!(txn.total.cents(), 17_000);
        assert_eq!(txn.change.cents(), 3_000);
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(48));

        let active = engine.active_shift().unwrap();
        assert_eq!(active.sales_total.cents(), 17_000);
        assert_eq!(active.transaction_count, 1);

        // 500 + 170 − 30 = 640
        assert_eq!(
            engine.expected_cash_in_drawer(&shift.id).unwrap().cents(),
            64_000
        );
    }

    #[test]
    fn test_refund_scenario_follows_sale() {
        let (engine, product, shift) = engine_with_product(8_500, Some(50));
        engine
            .create_transaction(cash_request(&shift, &product, 2, 20_000))
            .unwrap();

        let refund = engine
            .create_refund(
                &shift.id,
                product.id,
                1,
                Money::from_cents(8_500),
                RefundMethod::Cash,
            )
            .unwrap();
        assert_eq!(refund.product_name, "Bread");

        // Stock restored by the refunded quantity
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(49));

        // Cash bucket 170 − 85 = 85
        let breakdown = engine.shift_payment_breakdown(&shift.id).unwrap();
        assert_eq!(breakdown.cash.cents(), 8_500);

        // 500 + 85 − 30 = 555
        assert_eq!(
            engine.expected_cash_in_drawer(&shift.id).unwrap().cents(),
            55_500
        );
    }

    #[test]
    fn test_refund_round_trip_one_row_one_mirror() {
        let (engine, product, shift) = engine_with_product(8_500, Some(50));
        engine
            .create_refund(
                &shift.id,
                product.id,
                1,
                Money::from_cents(8_500),
                RefundMethod::Shop2Shop,
            )
            .unwrap();

        let refunds = engine.shift_refund_breakdown(&shift.id).unwrap();
        assert_eq!(refunds.items.len(), 1);
        assert_eq!(refunds.total.cents(), 8_500);

        let txns = engine.shift_transactions(&shift.id).unwrap();
        assert_eq!(txns.len(), 1);
        let mirror = &txns[0];
        assert!(mirror.is_refund);
        assert_eq!(mirror.total.cents(), 8_500);
        assert_eq!(mirror.payment_method, PaymentMethod::Shop2Shop);
    }

    #[test]
    fn test_refund_mirror_total_equals_partial_amount() {
        // Partial refund: amount below quantity × unit price still mirrors
        // exactly.
        let (engine, product, shift) = engine_with_product(8_500, Some(50));
        engine
            .create_refund(
                &shift.id,
                product.id,
                3,
                Money::from_cents(10_001),
                RefundMethod::Cash,
            )
            .unwrap();

        let txns = engine.shift_transactions(&shift.id).unwrap();
        assert_eq!(txns[0].total.cents(), 10_001);
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(53));
    }

    // -------------------------------------------------------------------------
    // Split payments
    // -------------------------------------------------------------------------

    #[test]
    fn test_split_payment_distributes_legs() {
        let (engine, product, shift) = engine_with_product(10_000, None);

        let txn = engine
            .create_transaction(TransactionRequest {
                shift_id: shift.id.clone(),
                items: vec![TransactionItem {
                    product_id: product.id,
                    quantity: 3,
                    unit_price: product.price,
                }],
                cash_received: Money::zero(),
                payment_method: PaymentMethod::Split,
                customer_id: None,
                split_payments: Some(vec![
                    split_leg(PaymentMethod::Cash, 10_000),
                    split_leg(PaymentMethod::Card, 10_000),
                    split_leg(PaymentMethod::Shop2Shop, 10_000),
                ]),
            })
            .unwrap();

        assert_eq!(txn.payment_method, PaymentMethod::Split);
        assert_eq!(engine.shift_transactions(&shift.id).unwrap().len(), 1);

        let b = engine.shift_payment_breakdown(&shift.id).unwrap();
        assert_eq!(b.cash.cents(), 10_000);
        assert_eq!(b.card.cents(), 10_000);
        assert_eq!(b.shop2shop.cents(), 10_000);
    }

    #[test]
    fn test_split_mismatch_rejected_with_zero_side_effects() {
        let (engine, product, shift) = engine_with_product(10_000, Some(30));

        // Legs sum to 299.50 against a 300.00 cart
        let err = engine
            .create_transaction(TransactionRequest {
                shift_id: shift.id.clone(),
                items: vec![TransactionItem {
                    product_id: product.id,
                    quantity: 3,
                    unit_price: product.price,
                }],
                cash_received: Money::zero(),
                payment_method: PaymentMethod::Split,
                customer_id: None,
                split_payments: Some(vec![
                    split_leg(PaymentMethod::Cash, 10_000),
                    split_leg(PaymentMethod::Card, 9_950),
                    split_leg(PaymentMethod::Shop2Shop, 10_000),
                ]),
            })
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::SplitTotalMismatch { .. })
        ));

        // Nothing moved: no log entry, stock untouched, aggregates untouched
        assert!(engine.shift_transactions(&shift.id).unwrap().is_empty());
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(30));
        assert_eq!(engine.active_shift().unwrap().transaction_count, 0);
    }

    #[test]
    fn test_account_tender_requires_customer() {
        let (engine, product, shift) = engine_with_product(5_000, Some(10));

        let mut request = cash_request(&shift, &product, 1, 0);
        request.payment_method = PaymentMethod::Account;
        let err = engine.create_transaction(request.clone()).unwrap_err();
        assert!(matches!(err, LedgerError::MissingCustomerInfo));
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(10));

        request.customer_id = Some("cust-9".into());
        let txn = engine.create_transaction(request).unwrap();
        assert_eq!(txn.change.cents(), 0);
        assert_eq!(txn.payment_method, PaymentMethod::Account);
    }

    // -------------------------------------------------------------------------
    // Stock behaviour
    // -------------------------------------------------------------------------

    #[test]
    fn test_untracked_product_never_decrements() {
        let (engine, product, shift) = engine_with_product(1_000, None);
        engine
            .create_transaction(cash_request(&shift, &product, 5, 5_000))
            .unwrap();
        assert_eq!(engine.find_product(product.id).unwrap().stock, None);
    }

    #[test]
    fn test_oversell_goes_negative_and_commits() {
        let (engine, product, shift) = engine_with_product(1_000, Some(2));
        engine
            .create_transaction(cash_request(&shift, &product, 5, 5_000))
            .unwrap();
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(-3));
        assert_eq!(engine.active_shift().unwrap().transaction_count, 1);
    }

    #[test]
    fn test_stock_conservation_over_mixed_sequence() {
        let (engine, product, shift) = engine_with_product(1_000, Some(20));

        engine
            .create_transaction(cash_request(&shift, &product, 4, 4_000))
            .unwrap();
        engine
            .create_transaction(cash_request(&shift, &product, 3, 3_000))
            .unwrap();
        engine
            .create_refund(&shift.id, product.id, 2, Money::from_cents(2_000), RefundMethod::Cash)
            .unwrap();

        // 20 − 4 − 3 + 2 = 15
        assert_eq!(engine.find_product(product.id).unwrap().stock, Some(15));
    }

    #[test]
    fn test_unknown_product_rejected_before_commit() {
        let (engine, _product, shift) = engine_with_product(1_000, Some(5));
        let request = TransactionRequest {
            shift_id: shift.id.clone(),
            items: vec![TransactionItem {
                product_id: 999,
                quantity: 1,
                unit_price: Money::from_cents(1_000),
            }],
            cash_received: Money::from_cents(1_000),
            payment_method: PaymentMethod::Cash,
            customer_id: None,
            split_payments: None,
        };
        let err = engine.create_transaction(request).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { entity: "Product", .. }));
        assert!(engine.shift_transactions(&shift.id).unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // Shift lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_single_active_shift_enforced() {
        let engine = LedgerEngine::new();
        engine.start_shift("op-1", Money::zero()).unwrap();

        let err = engine.start_shift("op-2", Money::zero()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState(_)));
    }

    #[test]
    fn test_end_shift_recomputes_from_log() {
        let (engine, product, shift) = engine_with_product(8_500, Some(50));
        engine
            .create_transaction(cash_request(&shift, &product, 2, 17_000))
            .unwrap();
        engine
            .create_refund(&shift.id, product.id, 1, Money::from_cents(8_500), RefundMethod::Cash)
            .unwrap();

        // Corrupt the incremental cache; close-out must heal it from the log
        {
            let mut state = engine.inner.lock().unwrap();
            let cached = state.shifts.find_by_id_mut(&shift.id).unwrap();
            cached.sales_total = Money::from_cents(999_999);
            cached.transaction_count = 42;
        }

        let closed = engine.end_shift(&shift.id, Money::from_cents(55_500)).unwrap();
        assert_eq!(closed.sales_total.cents(), 8_500); // 170 − 85
        assert_eq!(closed.transaction_count, 2); // sale + refund mirror
        assert_eq!(closed.end_float, Some(Money::from_cents(55_500)));
        assert!(!closed.is_active());
    }

    #[test]
    fn test_end_shift_twice_is_invalid_state() {
        let engine = LedgerEngine::new();
        let shift = engine.start_shift("op-1", Money::zero()).unwrap();
        engine.end_shift(&shift.id, Money::zero()).unwrap();

        let err = engine.end_shift(&shift.id, Money::zero()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState(_)));
    }

    #[test]
    fn test_end_unknown_shift_is_not_found() {
        let engine = LedgerEngine::new();
        let err = engine.end_shift("missing", Money::zero()).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { entity: "Shift", .. }));
    }

    #[test]
    fn test_closed_shift_rejects_new_transactions() {
        let (engine, product, shift) = engine_with_product(1_000, Some(5));
        engine.end_shift(&shift.id, Money::zero()).unwrap();

        let err = engine
            .create_transaction(cash_request(&shift, &product, 1, 1_000))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState(_)));

        let err = engine
            .create_refund(&shift.id, product.id, 1, Money::from_cents(1_000), RefundMethod::Cash)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState(_)));
    }

    #[test]
    fn test_last_completed_prefills_next_float() {
        let engine = LedgerEngine::new();
        let first = engine.start_shift("op-1", Money::from_cents(30_000)).unwrap();
        engine.end_shift(&first.id, Money::from_cents(31_000)).unwrap();

        let second = engine.start_shift("op-2", Money::from_cents(31_000)).unwrap();
        assert_eq!(
            engine.last_completed_shift().unwrap().id,
            first.id
        );
        engine.end_shift(&second.id, Money::from_cents(31_000)).unwrap();
        assert_eq!(engine.last_completed_shift().unwrap().id, second.id);
    }

    // -------------------------------------------------------------------------
    // Aggregate / breakdown agreement
    // -------------------------------------------------------------------------

    #[test]
    fn test_breakdown_sums_to_sales_total() {
        let (engine, product, shift) = engine_with_product(2_500, Some(100));

        engine
            .create_transaction(cash_request(&shift, &product, 2, 5_000))
            .unwrap();
        let mut card = cash_request(&shift, &product, 1, 0);
        card.payment_method = PaymentMethod::Card;
        engine.create_transaction(card).unwrap();
        engine
            .create_refund(&shift.id, product.id, 1, Money::from_cents(2_500), RefundMethod::Cash)
            .unwrap();

        let breakdown = engine.shift_payment_breakdown(&shift.id).unwrap();
        let closed = engine.end_shift(&shift.id, Money::zero()).unwrap();
        assert_eq!(breakdown.total(), closed.sales_total);
    }
}
