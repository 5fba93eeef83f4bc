//! Sheet-gateway catalog source.
//!
//! The gateway exposes spreadsheet worksheets as JSON record arrays:
//! `GET {base}/worksheets/{name}/records` returns `[{column: cell, ...}]`
//! with cells as strings or numbers, exactly as the sheet holds them.
//! `POST` to the same path appends one row.

use super::{parse_box_units, CatalogError, CatalogSource};
use crate::domain::{
    parse_rate_or_zero, ChannelType, Customer, CustomerKey, FeeSchedule, Product, ProductKey,
};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const PRODUCTS_WORKSHEET: &str = "products";
const CUSTOMERS_WORKSHEET: &str = "confirmed_clients";

/// Catalog source backed by a remote sheet gateway.
#[derive(Debug, Clone)]
pub struct SheetCatalogSource {
    client: Client,
    base_url: String,
}

impl SheetCatalogSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn records_url(&self, worksheet: &str) -> String {
        format!("{}/worksheets/{}/records", self.base_url, worksheet)
    }

    async fn get_records(&self, worksheet: &str) -> Result<Vec<Value>, CatalogError> {
        let url = self.records_url(worksheet);
        debug!(worksheet, "fetching worksheet records");
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| backoff::Error::transient(CatalogError::Http(e.to_string())))?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(CatalogError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(CatalogError::HttpStatus(
                    status.as_u16(),
                )));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(CatalogError::HttpStatus(
                    status.as_u16(),
                )));
            }

            response
                .json::<Vec<Value>>()
                .await
                .map_err(|e| backoff::Error::permanent(CatalogError::Parse(e.to_string())))
        })
        .await
    }

    async fn post_record(&self, worksheet: &str, row: Value) -> Result<(), CatalogError> {
        let url = self.records_url(worksheet);
        let response = self
            .client
            .post(&url)
            .json(&row)
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

/// Render a JSON cell the way the sheet shows it.
fn cell_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn product_from_record(record: &Value) -> Option<Product> {
    let obj = record.as_object()?;
    let key = cell_to_string(obj.get("product_key"));
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some(Product {
        key: ProductKey::new(key),
        name: cell_to_string(obj.get("product_name")).trim().to_string(),
        weight: cell_to_string(obj.get("weight")).trim().to_string(),
        unit: cell_to_string(obj.get("unit")).trim().to_string(),
        cost: parse_rate_or_zero(&cell_to_string(obj.get("cost"))),
        standard_price: parse_rate_or_zero(&cell_to_string(obj.get("standard_price"))),
        box_units: parse_box_units(&cell_to_string(obj.get("box_units"))),
    })
}

fn customer_from_record(record: &Value) -> Option<Customer> {
    let obj = record.as_object()?;
    let name = cell_to_string(obj.get("customer_name"));
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let channel_raw = cell_to_string(obj.get("channel_type"));
    let channel = match ChannelType::parse(&channel_raw) {
        Some(c) => c,
        None => {
            warn!(customer = name, channel = %channel_raw, "unknown channel, using 'other'");
            ChannelType::Other
        }
    };

    let mut fees = FeeSchedule::new();
    for (column, cell) in obj {
        if column == "customer_name" || column == "channel_type" {
            continue;
        }
        fees.set(column.clone(), parse_rate_or_zero(&cell_to_string(Some(cell))));
    }

    Some(Customer {
        key: CustomerKey::new(name),
        channel,
        fees,
    })
}

#[async_trait]
impl CatalogSource for SheetCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let records = self.get_records(PRODUCTS_WORKSHEET).await?;
        let mut products: Vec<Product> =
            records.iter().filter_map(product_from_record).collect();
        products.sort_by_key(|p| p.display_name());
        Ok(products)
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, CatalogError> {
        let records = self.get_records(CUSTOMERS_WORKSHEET).await?;
        Ok(records.iter().filter_map(customer_from_record).collect())
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), CatalogError> {
        let mut row = serde_json::Map::new();
        row.insert(
            "customer_name".to_string(),
            Value::String(customer.key.as_str().to_string()),
        );
        row.insert(
            "channel_type".to_string(),
            Value::String(customer.channel.as_str().to_string()),
        );
        for (label, rate) in customer.fees.iter() {
            row.insert(
                label.to_string(),
                Value::String(rate.to_canonical_string()),
            );
        }
        self.post_record(CUSTOMERS_WORKSHEET, Value::Object(row)).await
    }
}
