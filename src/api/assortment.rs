use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api::AppState;
use crate::domain::{ConfirmedPriceRecord, CustomerKey, ProductKey};
use crate::engine::reconcile;
use crate::error::AppError;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssortmentEntry {
    pub product_key: String,
    pub display_name: String,
    pub active: bool,
}

/// The full product list with a flag per product: does this customer
/// carry it? Presence of a confirmed-price row is the membership bit.
pub async fn get_assortment(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssortmentEntry>>, AppError> {
    let customer_key = CustomerKey::new(key.trim());
    if state.catalog.customer(&customer_key).await?.is_none() {
        return Err(AppError::NotFound(format!("customer '{}'", customer_key)));
    }

    let products = state.catalog.products().await?;
    let records = state.repo.list_prices_for_customer(&customer_key).await?;
    let active: BTreeSet<&ProductKey> = records.iter().map(|r| &r.product_key).collect();

    Ok(Json(
        products
            .iter()
            .map(|p| AssortmentEntry {
                product_key: p.key.as_str().to_string(),
                display_name: p.display_name(),
                active: active.contains(&p.key),
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutAssortmentRequest {
    pub product_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutAssortmentResponse {
    pub records: Vec<ConfirmedPriceRecord>,
    /// Requested keys missing from the product master; not materialized.
    pub skipped: Vec<String>,
}

/// Replace the set of products a customer carries.
///
/// Still-carried products keep their confirmed price; new ones get a
/// standard-price placeholder; unchecked ones are dropped. The write is
/// one atomic replacement of the customer's rows.
pub async fn put_assortment(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<PutAssortmentRequest>,
) -> Result<Json<PutAssortmentResponse>, AppError> {
    let customer_key = CustomerKey::new(key.trim());
    if state.catalog.customer(&customer_key).await?.is_none() {
        return Err(AppError::NotFound(format!("customer '{}'", customer_key)));
    }

    let desired: BTreeSet<ProductKey> = request
        .product_keys
        .iter()
        .map(|k| ProductKey::new(k.trim()))
        .collect();
    let current = state.repo.list_prices_for_customer(&customer_key).await?;
    let catalog = state.catalog.products().await?;

    let outcome = reconcile(&customer_key, &desired, &current, &catalog, Utc::now());
    state
        .repo
        .replace_customer_prices(&customer_key, &outcome.records)
        .await?;

    info!(
        customer = %customer_key,
        carried = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "assortment updated"
    );
    Ok(Json(PutAssortmentResponse {
        records: outcome.records,
        skipped: outcome
            .skipped
            .iter()
            .map(|k| k.as_str().to_string())
            .collect(),
    }))
}
