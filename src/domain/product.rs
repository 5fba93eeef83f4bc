//! Product master record.

use crate::domain::{Decimal, ProductKey};
use serde::{Deserialize, Serialize};

/// One row of the product master catalog.
///
/// Owned by the external catalog source; the pricing engine treats it as
/// immutable input. `box_units` is the number of sellable units per box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub key: ProductKey,
    pub name: String,
    /// Pack weight as printed on the sheet, e.g. "500g".
    pub weight: String,
    /// Count-unit suffix, e.g. "x10".
    pub unit: String,
    /// Unit cost.
    pub cost: Decimal,
    /// Standard (list) unit price.
    pub standard_price: Decimal,
    /// Units per box; the catalog defaults this to 1 when missing.
    pub box_units: i64,
}

impl Product {
    /// Display name the operators know products by: "name (weightunit)".
    pub fn display_name(&self) -> String {
        format!("{} ({}{})", self.name.trim(), self.weight.trim(), self.unit.trim())
    }
}
