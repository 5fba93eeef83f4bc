//! Pricing engine: fee aggregation, settlement, margin and profit.
//!
//! Pure and synchronous. Callers resolve every input in memory first;
//! persistence is a separate step. The engine either returns a complete
//! [`PricingResult`] or fails with one of the named error kinds, never a
//! partially populated result.

use crate::domain::{Decimal, FeeSchedule};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the supply price is determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingMethod {
    /// Derive the supply price backwards from unit cost so that the
    /// realized margin equals `target_margin` (percent, 0 <= m < 100).
    CostBased { target_margin: Decimal },
    /// Evaluate profitability of the already-known standard price; no
    /// derivation happens.
    StandardPriceBased,
    /// Evaluate an operator-entered candidate price as given.
    Override { supply_price: Decimal },
}

/// Fully resolved input for one pricing computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingInput {
    pub cost: Decimal,
    pub standard_price: Decimal,
    /// Units per box; use [`PricingInput::new`] to default it to 1.
    pub box_units: i64,
    pub fees: FeeSchedule,
    pub method: PricingMethod,
}

impl PricingInput {
    pub fn new(
        cost: Decimal,
        standard_price: Decimal,
        box_units: Option<i64>,
        fees: FeeSchedule,
        method: PricingMethod,
    ) -> Self {
        PricingInput {
            cost,
            standard_price,
            box_units: box_units.unwrap_or(1),
            fees,
            method,
        }
    }
}

/// Derived supply price / settlement / margin breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub supply_price: Decimal,
    /// Fraction in [0, 1), not percent units.
    pub total_deduction_rate: Decimal,
    pub net_settlement: Decimal,
    pub profit_per_unit: Decimal,
    /// Percent of net settlement; 0 when the settlement is not positive.
    pub margin_rate: Decimal,
    pub profit_per_box: Decimal,
}

/// Why a pricing computation was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("fee '{label}' has negative rate {rate}%")]
    InvalidFeeValue { label: String, rate: Decimal },
    #[error("total deduction rate {rate_percent}% reaches 100%, settlement undefined")]
    DeductionRateTooHigh { rate_percent: Decimal },
    #[error("target margin {margin}% outside valid range [0, 100)")]
    InvalidTargetMargin { margin: Decimal },
    #[error("box units {box_units} must be positive")]
    InvalidBoxUnits { box_units: i64 },
    #[error("override supply price {price} must not be negative")]
    InvalidSupplyPrice { price: Decimal },
}

/// Compute the full settlement breakdown for one product/customer pairing.
///
/// Steps: sum the fee schedule into a deduction fraction, determine the
/// supply price per method, then settle:
/// `net_settlement = supply_price * (1 - rate)`,
/// `profit_per_unit = net_settlement - cost`,
/// `margin_rate = profit / net_settlement * 100` (0 when settlement <= 0),
/// `profit_per_box = profit_per_unit * box_units`.
pub fn compute_pricing(input: &PricingInput) -> Result<PricingResult, PricingError> {
    if input.box_units <= 0 {
        return Err(PricingError::InvalidBoxUnits {
            box_units: input.box_units,
        });
    }

    if let Some((label, rate)) = input.fees.first_negative() {
        return Err(PricingError::InvalidFeeValue {
            label: label.to_string(),
            rate,
        });
    }

    let total_percent = input.fees.total_percent();
    let total_deduction_rate = total_percent / Decimal::hundred();
    if total_deduction_rate >= Decimal::one() {
        return Err(PricingError::DeductionRateTooHigh {
            rate_percent: total_percent,
        });
    }

    let supply_price = match &input.method {
        PricingMethod::CostBased { target_margin } => {
            let margin = *target_margin;
            if margin >= Decimal::hundred() || margin.is_negative() {
                return Err(PricingError::InvalidTargetMargin { margin });
            }
            let price_for_margin =
                input.cost / (Decimal::one() - margin / Decimal::hundred());
            price_for_margin / (Decimal::one() - total_deduction_rate)
        }
        PricingMethod::StandardPriceBased => input.standard_price,
        PricingMethod::Override { supply_price } => {
            if supply_price.is_negative() {
                return Err(PricingError::InvalidSupplyPrice {
                    price: *supply_price,
                });
            }
            *supply_price
        }
    };

    let net_settlement = supply_price * (Decimal::one() - total_deduction_rate);
    let profit_per_unit = net_settlement - input.cost;
    let margin_rate = if net_settlement.is_positive() {
        profit_per_unit / net_settlement * Decimal::hundred()
    } else {
        Decimal::zero()
    };
    let profit_per_box = profit_per_unit * Decimal::from(input.box_units);

    Ok(PricingResult {
        supply_price,
        total_deduction_rate,
        net_settlement,
        profit_per_unit,
        margin_rate,
        profit_per_box,
    })
}
