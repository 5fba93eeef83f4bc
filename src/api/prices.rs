use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::quote::{resolve_and_price, QuoteSpec};
use crate::api::AppState;
use crate::db::PriceStoreError;
use crate::domain::{ConfirmedPriceRecord, CustomerKey, Decimal, ProductKey};
use crate::engine::{compute_pricing, PricingInput, PricingMethod};
use crate::error::AppError;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPricesQuery {
    pub customer: Option<String>,
}

pub async fn list_prices(
    Query(params): Query<ListPricesQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ConfirmedPriceRecord>>, AppError> {
    let records = match params
        .customer
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(customer) => {
            state
                .repo
                .list_prices_for_customer(&CustomerKey::new(customer))
                .await?
        }
        None => state.repo.list_prices().await?,
    };
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    #[serde(flatten)]
    pub spec: QuoteSpec,
    /// Revision the caller last saw for this pair; omit to force the write.
    pub expected_revision: Option<String>,
}

/// Confirm one simulated price and persist it.
///
/// The figures are recomputed server-side from the same spec the quote
/// endpoint takes; a result that fails the engine is never persisted.
pub async fn confirm_price(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmedPriceRecord>, AppError> {
    let (product, customer, result) = resolve_and_price(&state, &request.spec).await?;

    let record = ConfirmedPriceRecord::from_result(
        product.key.clone(),
        customer.key.clone(),
        request.spec.cost_override.unwrap_or(product.cost),
        &result,
        Utc::now(),
    );

    state
        .repo
        .upsert_price(&record, request.expected_revision.as_deref())
        .await
        .map_err(|e| match e {
            PriceStoreError::RevisionConflict { current } => AppError::Conflict(format!(
                "price for ({}, {}) was confirmed by someone else (revision {})",
                record.product_key, record.customer_key, current
            )),
            PriceStoreError::Db(e) => AppError::Internal(e.to_string()),
        })?;

    info!(
        product = %record.product_key,
        customer = %record.customer_key,
        supply_price = %record.supply_price,
        "price confirmed"
    );
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPriceItem {
    pub product_key: String,
    pub supply_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPriceRequest {
    pub items: Vec<BatchPriceItem>,
    #[serde(default)]
    pub apply_optional_fees: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPriceResponse {
    pub saved: Vec<ConfirmedPriceRecord>,
    /// Product keys absent from the product master; not saved, not fatal.
    pub skipped: Vec<String>,
}

/// Save a whole customer's price sheet in one shot.
///
/// Every row is priced with the Override method against the customer's
/// fee schedule, then the customer's slice of the table is replaced
/// atomically. Rows naming unknown products are reported as skipped.
pub async fn put_customer_prices(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<BatchPriceRequest>,
) -> Result<Json<BatchPriceResponse>, AppError> {
    let customer_key = CustomerKey::new(key.trim());
    let customer = state
        .catalog
        .customer(&customer_key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer '{}'", customer_key)))?;

    let fees = if request.apply_optional_fees {
        customer.fees.clone()
    } else {
        customer.fees.without(&state.config.optional_fee_labels)
    };

    let products = state.catalog.products().await?;
    let now = Utc::now();
    let mut saved = Vec::new();
    let mut skipped = Vec::new();

    for item in &request.items {
        let product_key = ProductKey::new(item.product_key.trim());
        let Some(product) = products.iter().find(|p| p.key == product_key) else {
            skipped.push(product_key.as_str().to_string());
            continue;
        };

        let input = PricingInput::new(
            product.cost,
            product.standard_price,
            Some(product.box_units),
            fees.clone(),
            PricingMethod::Override {
                supply_price: item.supply_price,
            },
        );
        let result = compute_pricing(&input)?;
        saved.push(ConfirmedPriceRecord::from_result(
            product.key.clone(),
            customer_key.clone(),
            product.cost,
            &result,
            now,
        ));
    }

    state
        .repo
        .replace_customer_prices(&customer_key, &saved)
        .await?;

    info!(
        customer = %customer_key,
        saved = saved.len(),
        skipped = skipped.len(),
        "customer price sheet replaced"
    );
    Ok(Json(BatchPriceResponse { saved, skipped }))
}
