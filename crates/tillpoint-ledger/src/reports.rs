//! # Derived Reports
//!
//! Pure folds over the transaction and refund logs. Nothing here is stored
//! or cached: every view is recomputed from the log on demand, so it can
//! never drift from what actually happened at the till.
//!
//! ## The Breakdown Fold
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Three kinds of transaction, three treatments:                          │
//! │                                                                         │
//! │  plain sale     ──►  total ADDED to its method bucket                   │
//! │  refund mirror  ──►  total SUBTRACTED from its method bucket            │
//! │  split sale     ──►  each leg's amount ADDED to the leg's bucket        │
//! │                                                                         │
//! │  A refund of a split-paid sale is NOT decomposed: refunds are always   │
//! │  settled against one method and subtract from that bucket alone.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tillpoint_core::{
    Money, PaymentBreakdown, PaymentMethod, Refund, RefundBreakdown, RefundLine, Transaction,
};

// =============================================================================
// Payment Breakdown
// =============================================================================

/// Folds a shift's transactions into per-method totals.
pub fn payment_breakdown<'a, I>(transactions: I) -> PaymentBreakdown
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut breakdown = PaymentBreakdown::default();

    for txn in transactions {
        // Refund mirrors subtract, sales add
        let sign: i64 = if txn.is_refund { -1 } else { 1 };

        match txn.payment_method {
            PaymentMethod::Split => {
                for leg in txn.split_payments.iter().flatten() {
                    let amount = leg.amount * sign;
                    match leg.method {
                        PaymentMethod::Cash => breakdown.cash += amount,
                        PaymentMethod::Card => breakdown.card += amount,
                        PaymentMethod::Shop2Shop => breakdown.shop2shop += amount,
                        PaymentMethod::Account => breakdown.account += amount,
                        // Nested splits are rejected at validation
                        PaymentMethod::Split => {}
                    }
                }
            }
            PaymentMethod::Cash => breakdown.cash += txn.total * sign,
            PaymentMethod::Card => breakdown.card += txn.total * sign,
            PaymentMethod::Shop2Shop => breakdown.shop2shop += txn.total * sign,
            PaymentMethod::Account => breakdown.account += txn.total * sign,
        }
    }

    breakdown
}

// =============================================================================
// Refund Breakdown
// =============================================================================

/// One report row per refund event; `total` is the sum of amounts.
pub fn refund_breakdown<'a, I>(refunds: I) -> RefundBreakdown
where
    I: IntoIterator<Item = &'a Refund>,
{
    let mut breakdown = RefundBreakdown::default();

    for refund in refunds {
        breakdown.total += refund.amount;
        breakdown.items.push(RefundLine {
            product_id: refund.product_id,
            product_name: refund.product_name.clone(),
            quantity: refund.quantity,
            amount: refund.amount,
        });
    }

    breakdown
}

// =============================================================================
// Expected Cash In Drawer
// =============================================================================

/// What the drawer should hold at count time:
///
/// `start_float + cash bucket − Σ change on non-refund cash-bearing sales`
///
/// The cash bucket already nets out cash refunds (the breakdown subtracts
/// them), so change given on refund mirrors is *not* subtracted again here.
/// Cash-bearing covers pure cash sales and the cash leg of splits.
pub fn expected_cash_in_drawer<'a, I>(start_float: Money, transactions: I) -> Money
where
    I: IntoIterator<Item = &'a Transaction> + Clone,
{
    let cash_taken = payment_breakdown(transactions.clone()).cash;

    let change_given: Money = transactions
        .into_iter()
        .filter(|t| !t.is_refund && t.is_cash_bearing())
        .map(|t| t.change)
        .sum();

    start_float + cash_taken - change_given
}

// =============================================================================
// Unit Tests
// =============================================================================
