use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Customer, CustomerKey, Decimal, Product, ProductKey};
use crate::engine::{compute_pricing, PricingInput, PricingMethod, PricingResult};
use crate::error::AppError;

/// One simulation request: which pairing to price and how.
///
/// `cost_override` / `standard_price_override` let the operator probe
/// what-if figures without touching the catalog; they live only for this
/// request. Optional fee labels (configured) are excluded unless
/// `apply_optional_fees` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSpec {
    pub product_key: String,
    pub customer_key: String,
    pub method: PricingMethod,
    #[serde(default)]
    pub apply_optional_fees: bool,
    pub cost_override: Option<Decimal>,
    pub standard_price_override: Option<Decimal>,
}

/// Net settlement measured against the standard price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineDelta {
    pub amount: Decimal,
    /// Percent of standard price; absent when the standard price is not
    /// positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub product_key: String,
    pub customer_key: String,
    pub result: PricingResult,
    pub baseline_delta: BaselineDelta,
}

/// Resolve a quote spec against the catalog and run the engine.
///
/// Shared by the quote and confirm handlers so a confirmation can never
/// persist figures the quote path would not have produced.
pub(crate) async fn resolve_and_price(
    state: &AppState,
    spec: &QuoteSpec,
) -> Result<(Product, Customer, PricingResult), AppError> {
    let product_key = ProductKey::new(spec.product_key.trim());
    let customer_key = CustomerKey::new(spec.customer_key.trim());

    let product = state
        .catalog
        .product(&product_key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{}'", product_key)))?;
    let customer = state
        .catalog
        .customer(&customer_key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer '{}'", customer_key)))?;

    let fees = if spec.apply_optional_fees {
        customer.fees.clone()
    } else {
        customer.fees.without(&state.config.optional_fee_labels)
    };

    let input = PricingInput::new(
        spec.cost_override.unwrap_or(product.cost),
        spec.standard_price_override.unwrap_or(product.standard_price),
        Some(product.box_units),
        fees,
        spec.method.clone(),
    );

    let result = compute_pricing(&input)?;
    Ok((product, customer, result))
}

pub(crate) fn baseline_delta(result: &PricingResult, standard_price: Decimal) -> BaselineDelta {
    let amount = result.net_settlement - standard_price;
    let pct = if standard_price.is_positive() {
        Some(amount / standard_price * Decimal::hundred())
    } else {
        None
    };
    BaselineDelta { amount, pct }
}

pub async fn post_quote(
    State(state): State<AppState>,
    Json(spec): Json<QuoteSpec>,
) -> Result<Json<QuoteResponse>, AppError> {
    let (product, customer, result) = resolve_and_price(&state, &spec).await?;
    let standard_price = spec
        .standard_price_override
        .unwrap_or(product.standard_price);

    Ok(Json(QuoteResponse {
        product_key: product.key.as_str().to_string(),
        customer_key: customer.key.as_str().to_string(),
        baseline_delta: baseline_delta(&result, standard_price),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_baseline_delta_against_standard() {
        let result = PricingResult {
            supply_price: dec("10000"),
            total_deduction_rate: dec("0.03"),
            net_settlement: dec("9700"),
            profit_per_unit: dec("2700"),
            margin_rate: dec("27.84"),
            profit_per_box: dec("32400"),
        };
        let delta = baseline_delta(&result, dec("10000"));
        assert_eq!(delta.amount, dec("-300"));
        assert_eq!(delta.pct, Some(dec("-3")));
    }

    #[test]
    fn test_baseline_delta_without_standard_price() {
        let result = PricingResult {
            supply_price: dec("10000"),
            total_deduction_rate: dec("0"),
            net_settlement: dec("10000"),
            profit_per_unit: dec("3000"),
            margin_rate: dec("30"),
            profit_per_box: dec("3000"),
        };
        let delta = baseline_delta(&result, dec("0"));
        assert_eq!(delta.amount, dec("10000"));
        assert_eq!(delta.pct, None);
    }

    #[test]
    fn test_quote_spec_deserializes_tagged_method() {
        let json = r#"{
            "productKey": "P-001",
            "customerKey": "fresh-mart",
            "method": {"kind": "cost_based", "target_margin": 30}
        }"#;
        let spec: QuoteSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            spec.method,
            PricingMethod::CostBased {
                target_margin: dec("30")
            }
        );
        assert!(!spec.apply_optional_fees);
    }
}
