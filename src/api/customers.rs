use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{ChannelType, Customer, CustomerKey};
use crate::error::AppError;
use tracing::info;

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state.catalog.customers().await?;
    Ok(Json(customers))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub channel: String,
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("customer name is required".to_string()));
    }

    let channel = ChannelType::parse(&request.channel).ok_or_else(|| {
        AppError::BadRequest(format!("unknown channel '{}'", request.channel))
    })?;

    let key = CustomerKey::new(name);
    let existing = state.catalog.customers().await?;
    if existing.iter().any(|c| c.key == key) {
        return Err(AppError::Conflict(format!(
            "customer '{}' already exists",
            key
        )));
    }

    let customer = Customer::new_on_channel(key, channel);
    state.catalog.create_customer(&customer).await?;
    info!(customer = %customer.key, channel = %customer.channel, "customer registered");

    Ok((StatusCode::CREATED, Json(customer)))
}
