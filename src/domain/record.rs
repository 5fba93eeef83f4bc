//! Confirmed price record: an engine result frozen for persistence.

use crate::domain::{CustomerKey, Decimal, ProductKey};
use crate::engine::PricingResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The latest confirmed price for one (product, customer) pair.
///
/// Built by copying fields out of a [`PricingResult`]; carries no
/// computation of its own. The store keeps at most one live record per
/// pair, so a new confirmation overwrites the prior one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedPriceRecord {
    pub product_key: ProductKey,
    pub customer_key: CustomerKey,
    pub confirmed_at: DateTime<Utc>,
    /// Unit cost at confirmation time, kept so old confirmations stay
    /// interpretable after the catalog moves.
    pub cost: Decimal,
    pub supply_price: Decimal,
    /// Fraction in [0, 1), not percent units.
    pub total_deduction_rate: Decimal,
    pub net_settlement: Decimal,
    pub profit_per_unit: Decimal,
    pub margin_rate: Decimal,
    pub profit_per_box: Decimal,
    /// Concurrency token; changes on every write. See [`ConfirmedPriceRecord::compute_revision`].
    pub revision: String,
}

impl ConfirmedPriceRecord {
    /// Freeze a pricing result for one (product, customer) pair.
    pub fn from_result(
        product_key: ProductKey,
        customer_key: CustomerKey,
        cost: Decimal,
        result: &PricingResult,
        confirmed_at: DateTime<Utc>,
    ) -> Self {
        let revision = Self::compute_revision(
            &product_key,
            &customer_key,
            confirmed_at,
            result.supply_price,
        );
        ConfirmedPriceRecord {
            product_key,
            customer_key,
            confirmed_at,
            cost,
            supply_price: result.supply_price,
            total_deduction_rate: result.total_deduction_rate,
            net_settlement: result.net_settlement,
            profit_per_unit: result.profit_per_unit,
            margin_rate: result.margin_rate,
            profit_per_box: result.profit_per_box,
            revision,
        }
    }

    /// Placeholder record for a product a customer has just started
    /// carrying: supply price defaults to the standard price, analysis
    /// figures stay zero until a real confirmation happens.
    pub fn assortment_default(
        product_key: ProductKey,
        customer_key: CustomerKey,
        cost: Decimal,
        standard_price: Decimal,
        confirmed_at: DateTime<Utc>,
    ) -> Self {
        let revision =
            Self::compute_revision(&product_key, &customer_key, confirmed_at, standard_price);
        ConfirmedPriceRecord {
            product_key,
            customer_key,
            confirmed_at,
            cost,
            supply_price: standard_price,
            total_deduction_rate: Decimal::zero(),
            net_settlement: Decimal::zero(),
            profit_per_unit: Decimal::zero(),
            margin_rate: Decimal::zero(),
            profit_per_box: Decimal::zero(),
            revision,
        }
    }

    /// Compute the concurrency token for a write.
    ///
    /// Truncated SHA-256 over length-prefixed deterministic fields.
    /// `confirmed_at` is part of the input, so re-confirming the same
    /// price still produces a fresh revision.
    pub fn compute_revision(
        product_key: &ProductKey,
        customer_key: &CustomerKey,
        confirmed_at: DateTime<Utc>,
        supply_price: Decimal,
    ) -> String {
        use sha2::{Digest, Sha256};

        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u32).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        hash_var(&mut hasher, product_key.as_str());
        hash_var(&mut hasher, customer_key.as_str());
        hasher.update(confirmed_at.timestamp_millis().to_le_bytes());
        hash_var(&mut hasher, &supply_price.to_canonical_string());

        let hash = hasher.finalize();
        hex::encode(&hash[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PricingResult;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn sample_result() -> PricingResult {
        PricingResult {
            supply_price: dec("10000"),
            total_deduction_rate: dec("0.03"),
            net_settlement: dec("9700"),
            profit_per_unit: dec("2700"),
            margin_rate: dec("27.84"),
            profit_per_box: dec("32400"),
        }
    }

    #[test]
    fn test_from_result_copies_fields() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let record = ConfirmedPriceRecord::from_result(
            ProductKey::new("P-001"),
            CustomerKey::new("fresh-mart"),
            dec("7000"),
            &sample_result(),
            at,
        );
        assert_eq!(record.supply_price, dec("10000"));
        assert_eq!(record.net_settlement, dec("9700"));
        assert_eq!(record.cost, dec("7000"));
        assert_eq!(record.confirmed_at, at);
        assert_eq!(record.revision.len(), 32);
    }

    #[test]
    fn test_revision_changes_with_timestamp() {
        let product = ProductKey::new("P-001");
        let customer = CustomerKey::new("fresh-mart");
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 1, 9, 31, 0).unwrap();
        let r1 = ConfirmedPriceRecord::compute_revision(&product, &customer, t1, dec("10000"));
        let r2 = ConfirmedPriceRecord::compute_revision(&product, &customer, t2, dec("10000"));
        assert_ne!(r1, r2);
        // Deterministic for identical inputs
        let r1_again =
            ConfirmedPriceRecord::compute_revision(&product, &customer, t1, dec("10000"));
        assert_eq!(r1, r1_again);
    }

    #[test]
    fn test_assortment_default_uses_standard_price() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let record = ConfirmedPriceRecord::assortment_default(
            ProductKey::new("P-002"),
            CustomerKey::new("fresh-mart"),
            dec("7000"),
            dec("10000"),
            at,
        );
        assert_eq!(record.supply_price, dec("10000"));
        assert_eq!(record.margin_rate, Decimal::zero());
        assert_eq!(record.profit_per_box, Decimal::zero());
    }
}
