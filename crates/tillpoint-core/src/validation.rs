//! # Validation Module
//!
//! Pure input validation for ledger operations.
//!
//! Every check here runs before any store is touched: a submission that
//! fails validation produces zero side effects, so the operator can correct
//! and resubmit without double-counting.

use crate::error::{LedgerError, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, SplitPayment, TransactionItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Line Items
// =============================================================================

/// Validates the line items of a transaction.
///
/// ## Rules
/// - At least one item
/// - Every quantity strictly positive
///
/// ## Example
/// ```rust
/// use tillpoint_core::money::Money;
/// use tillpoint_core::types::TransactionItem;
/// use tillpoint_core::validation::validate_items;
///
/// let items = vec![TransactionItem {
///     product_id: 1,
///     quantity: 2,
///     unit_price: Money::from_cents(8500),
/// }];
/// assert!(validate_items(&items).is_ok());
/// assert!(validate_items(&[]).is_err());
/// ```
pub fn validate_items(items: &[TransactionItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }

    for item in items {
        if item.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Split Payments
// =============================================================================

/// Validates a split-payment decomposition against the computed total.
///
/// ## Rules
/// - Legs must be present (a missing or empty decomposition is rejected)
/// - No leg may itself use [`PaymentMethod::Split`]
/// - Leg amounts must sum to `total` within the 0.01-unit tolerance
pub fn validate_split(total: Money, legs: Option<&[SplitPayment]>) -> ValidationResult<()> {
    let legs = match legs {
        Some(legs) if !legs.is_empty() => legs,
        _ => return Err(ValidationError::SplitDetailsMissing),
    };

    if legs.iter().any(|leg| leg.method == PaymentMethod::Split) {
        return Err(ValidationError::NestedSplit);
    }

    let leg_sum: Money = legs.iter().map(|leg| leg.amount).sum();
    if !total.within_split_tolerance(leg_sum) {
        return Err(ValidationError::SplitTotalMismatch {
            total,
            legs: leg_sum,
        });
    }

    Ok(())
}

// =============================================================================
// Customer Info (account tender)
// =============================================================================

/// Validates that an account payment can be tied to a customer.
///
/// Applies to a direct `Account` tender and to every `Account` leg of a
/// split: each needs the transaction-level `customer_id`, or (for a split
/// leg) a name **and** phone captured on the leg itself.
pub fn validate_customer_info(
    payment_method: PaymentMethod,
    customer_id: Option<&str>,
    split_payments: Option<&[SplitPayment]>,
) -> Result<(), LedgerError> {
    let has_customer_id = customer_id.is_some_and(|id| !id.trim().is_empty());

    match payment_method {
        PaymentMethod::Account if !has_customer_id => Err(LedgerError::MissingCustomerInfo),
        PaymentMethod::Split => {
            for leg in split_payments.iter().copied().flatten() {
                if leg.method != PaymentMethod::Account {
                    continue;
                }
                let has_leg_contact = leg
                    .customer_name
                    .as_deref()
                    .is_some_and(|n| !n.trim().is_empty())
                    && leg
                        .customer_phone
                        .as_deref()
                        .is_some_and(|p| !p.trim().is_empty());
                if !has_customer_id && !has_leg_contact {
                    return Err(LedgerError::MissingCustomerInfo);
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Refunds
// =============================================================================

/// Validates refund quantity and amount.
pub fn validate_refund(product_id: u64, quantity: i64, amount: Money) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity {
            product_id,
            quantity,
        });
    }
    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount { amount });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: u64, quantity: i64) -> TransactionItem {
        TransactionItem {
            product_id,
            quantity,
            unit_price: Money::from_cents(1000),
        }
    }

    fn leg(method: PaymentMethod, cents: i64) -> SplitPayment {
        SplitPayment {
            method,
            amount: Money::from_cents(cents),
            customer_name: None,
            customer_phone: None,
        }
    }

    #[test]
    fn test_validate_items() {
        assert!(validate_items(&[item(1, 1)]).is_ok());
        assert_eq!(validate_items(&[]), Err(ValidationError::EmptyItems));
        assert_eq!(
            validate_items(&[item(1, 1), item(2, 0)]),
            Err(ValidationError::NonPositiveQuantity {
                product_id: 2,
                quantity: 0
            })
        );
        assert!(validate_items(&[item(1, -3)]).is_err());
    }

    #[test]
    fn test_validate_split_ok() {
        let total = Money::from_cents(30_000);
        let legs = vec![
            leg(PaymentMethod::Cash, 10_000),
            leg(PaymentMethod::Card, 10_000),
            leg(PaymentMethod::Shop2Shop, 10_000),
        ];
        assert!(validate_split(total, Some(&legs)).is_ok());
    }

    #[test]
    fn test_validate_split_one_cent_off_is_tolerated() {
        let total = Money::from_cents(30_000);
        let legs = vec![leg(PaymentMethod::Cash, 29_999)];
        assert!(validate_split(total, Some(&legs)).is_ok());
    }

    #[test]
    fn test_validate_split_mismatch_rejected() {
        // 299.50 against a 300.00 total
        let total = Money::from_cents(30_000);
        let legs = vec![
            leg(PaymentMethod::Cash, 10_000),
            leg(PaymentMethod::Card, 10_000),
            leg(PaymentMethod::Shop2Shop, 9_950),
        ];
        assert_eq!(
            validate_split(total, Some(&legs)),
            Err(ValidationError::SplitTotalMismatch {
                total,
                legs: Money::from_cents(29_950),
            })
        );
    }

    #[test]
    fn test_validate_split_missing_or_empty() {
        let total = Money::from_cents(100);
        assert_eq!(
            validate_split(total, None),
            Err(ValidationError::SplitDetailsMissing)
        );
        assert_eq!(
            validate_split(total, Some(&[])),
            Err(ValidationError::SplitDetailsMissing)
        );
    }

    #[test]
    fn test_validate_split_nested() {
        let total = Money::from_cents(100);
        let legs = vec![leg(PaymentMethod::Split, 100)];
        assert_eq!(
            validate_split(total, Some(&legs)),
            Err(ValidationError::NestedSplit)
        );
    }

    #[test]
    fn test_account_requires_customer() {
        assert!(matches!(
            validate_customer_info(PaymentMethod::Account, None, None),
            Err(LedgerError::MissingCustomerInfo)
        ));
        assert!(validate_customer_info(PaymentMethod::Account, Some("cust-9"), None).is_ok());
        // Whitespace-only id does not count
        assert!(matches!(
            validate_customer_info(PaymentMethod::Account, Some("  "), None),
            Err(LedgerError::MissingCustomerInfo)
        ));
    }

    #[test]
    fn test_split_account_leg_requires_contact_or_customer() {
        let mut account_leg = leg(PaymentMethod::Account, 5000);
        let legs = vec![leg(PaymentMethod::Cash, 5000), account_leg.clone()];

        // No customer id, no contact pair on the leg
        assert!(matches!(
            validate_customer_info(PaymentMethod::Split, None, Some(&legs)),
            Err(LedgerError::MissingCustomerInfo)
        ));

        // Transaction-level customer id resolves it
        assert!(validate_customer_info(PaymentMethod::Split, Some("cust-9"), Some(&legs)).is_ok());

        // Name + phone on the leg also resolves it
        account_leg.customer_name = Some("T. Dube".into());
        account_leg.customer_phone = Some("0821234567".into());
        let legs = vec![leg(PaymentMethod::Cash, 5000), account_leg.clone()];
        assert!(validate_customer_info(PaymentMethod::Split, None, Some(&legs)).is_ok());

        // Name without phone is not enough
        account_leg.customer_phone = None;
        let legs = vec![account_leg];
        assert!(matches!(
            validate_customer_info(PaymentMethod::Split, None, Some(&legs)),
            Err(LedgerError::MissingCustomerInfo)
        ));
    }

    #[test]
    fn test_validate_refund() {
        assert!(validate_refund(1, 1, Money::from_cents(8500)).is_ok());
        assert!(validate_refund(1, 0, Money::from_cents(8500)).is_err());
        assert_eq!(
            validate_refund(1, 1, Money::zero()),
            Err(ValidationError::NonPositiveAmount {
                amount: Money::zero()
            })
        );
    }
}
