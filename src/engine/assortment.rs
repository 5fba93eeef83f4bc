//! Assortment reconciliation: which products a customer carries.
//!
//! Pure function over in-memory inputs. The persisted confirmed-price
//! table doubles as the membership matrix: a (product, customer) row
//! exists iff the customer carries the product.

use crate::domain::{ConfirmedPriceRecord, CustomerKey, Product, ProductKey};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Result of reconciling a customer's desired assortment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssortmentOutcome {
    /// Full replacement set of records for the customer.
    pub records: Vec<ConfirmedPriceRecord>,
    /// Desired keys that are missing from the product master and were
    /// therefore not materialized. Surfaced to the operator, never fatal.
    pub skipped: Vec<ProductKey>,
}

/// Reconcile the desired product set against current confirmed records.
///
/// Still-desired products keep their existing record untouched (confirmed
/// prices survive matrix edits). Newly desired products get a placeholder
/// record at the standard price with zeroed analysis figures. Products no
/// longer desired are dropped.
pub fn reconcile(
    customer: &CustomerKey,
    desired: &BTreeSet<ProductKey>,
    current: &[ConfirmedPriceRecord],
    catalog: &[Product],
    now: DateTime<Utc>,
) -> AssortmentOutcome {
    let by_key: BTreeMap<&ProductKey, &Product> =
        catalog.iter().map(|p| (&p.key, p)).collect();
    let existing: BTreeMap<&ProductKey, &ConfirmedPriceRecord> = current
        .iter()
        .filter(|r| &r.customer_key == customer)
        .map(|r| (&r.product_key, r))
        .collect();

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for key in desired {
        if let Some(record) = existing.get(key) {
            records.push((*record).clone());
        } else if let Some(product) = by_key.get(key) {
            records.push(ConfirmedPriceRecord::assortment_default(
                product.key.clone(),
                customer.clone(),
                product.cost,
                product.standard_price,
                now,
            ));
        } else {
            skipped.push(key.clone());
        }
    }

    AssortmentOutcome { records, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decimal;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn product(key: &str, cost: &str, standard: &str) -> Product {
        Product {
            key: ProductKey::new(key),
            name: key.to_string(),
            weight: "500g".to_string(),
            unit: "x10".to_string(),
            cost: dec(cost),
            standard_price: dec(standard),
            box_units: 12,
        }
    }

    fn confirmed(product_key: &str, customer: &str, supply: &str) -> ConfirmedPriceRecord {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        ConfirmedPriceRecord {
            product_key: ProductKey::new(product_key),
            customer_key: CustomerKey::new(customer),
            confirmed_at: at,
            cost: dec("7000"),
            supply_price: dec(supply),
            total_deduction_rate: dec("0.03"),
            net_settlement: dec("9700"),
            profit_per_unit: dec("2700"),
            margin_rate: dec("27.84"),
            profit_per_box: dec("32400"),
            revision: "r1".to_string(),
        }
    }

    #[test]
    fn test_keeps_existing_records_for_still_desired() {
        let customer = CustomerKey::new("fresh-mart");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let current = vec![confirmed("P-001", "fresh-mart", "10000")];
        let desired: BTreeSet<ProductKey> = [ProductKey::new("P-001")].into_iter().collect();
        let catalog = vec![product("P-001", "7000", "10000")];

        let outcome = reconcile(&customer, &desired, &current, &catalog, now);
        assert_eq!(outcome.records, current);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_new_products_get_standard_price_defaults() {
        let customer = CustomerKey::new("fresh-mart");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let desired: BTreeSet<ProductKey> = [ProductKey::new("P-002")].into_iter().collect();
        let catalog = vec![product("P-002", "3100", "4500")];

        let outcome = reconcile(&customer, &desired, &[], &catalog, now);
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.supply_price, dec("4500"));
        assert_eq!(record.cost, dec("3100"));
        assert_eq!(record.margin_rate, Decimal::zero());
        assert_eq!(record.confirmed_at, now);
    }

    #[test]
    fn test_undesired_products_are_dropped() {
        let customer = CustomerKey::new("fresh-mart");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let current = vec![
            confirmed("P-001", "fresh-mart", "10000"),
            confirmed("P-002", "fresh-mart", "4500"),
        ];
        let desired: BTreeSet<ProductKey> = [ProductKey::new("P-001")].into_iter().collect();
        let catalog = vec![
            product("P-001", "7000", "10000"),
            product("P-002", "3100", "4500"),
        ];

        let outcome = reconcile(&customer, &desired, &current, &catalog, now);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].product_key, ProductKey::new("P-001"));
    }

    #[test]
    fn test_unknown_products_reported_not_fatal() {
        let customer = CustomerKey::new("fresh-mart");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let desired: BTreeSet<ProductKey> = [
            ProductKey::new("P-001"),
            ProductKey::new("P-GONE"),
        ]
        .into_iter()
        .collect();
        let catalog = vec![product("P-001", "7000", "10000")];

        let outcome = reconcile(&customer, &desired, &[], &catalog, now);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped, vec![ProductKey::new("P-GONE")]);
    }

    #[test]
    fn test_other_customers_records_ignored() {
        let customer = CustomerKey::new("fresh-mart");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        // Record for another customer must not leak into this one's set
        let current = vec![confirmed("P-001", "dawn-catering", "9000")];
        let desired: BTreeSet<ProductKey> = [ProductKey::new("P-001")].into_iter().collect();
        let catalog = vec![product("P-001", "7000", "10000")];

        let outcome = reconcile(&customer, &desired, &current, &catalog, now);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].customer_key, customer);
        assert_eq!(outcome.records[0].supply_price, dec("10000"));
    }
}
