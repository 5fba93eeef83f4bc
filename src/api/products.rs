use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{Decimal, Product};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_key: String,
    pub display_name: String,
    pub name: String,
    pub weight: String,
    pub unit: String,
    pub cost: Decimal,
    pub standard_price: Decimal,
    pub box_units: i64,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        ProductView {
            product_key: product.key.as_str().to_string(),
            display_name: product.display_name(),
            name: product.name.clone(),
            weight: product.weight.clone(),
            unit: product.unit.clone(),
            cost: product.cost,
            standard_price: product.standard_price,
            box_units: product.box_units,
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = state.catalog.products().await?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}
