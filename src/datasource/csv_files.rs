//! Local CSV catalog: the offline fallback for master data.
//!
//! Column contract (products): `product_key, product_name, weight, unit,
//! cost, standard_price, box_units`. Numeric cells may carry thousands
//! separators. Customers: `customer_name, channel_type`, then one column
//! per fee label; fee cells may carry `%` signs.

use super::{parse_box_units, CatalogError, CatalogSource};
use crate::domain::{
    parse_rate_or_zero, ChannelType, Customer, CustomerKey, FeeSchedule, Product, ProductKey,
};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

const PRODUCT_COLUMNS: [&str; 7] = [
    "product_key",
    "product_name",
    "weight",
    "unit",
    "cost",
    "standard_price",
    "box_units",
];

/// Catalog source reading product and customer masters from CSV files.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    products_path: PathBuf,
    customers_path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(products_path: impl Into<PathBuf>, customers_path: impl Into<PathBuf>) -> Self {
        Self {
            products_path: products_path.into(),
            customers_path: customers_path.into(),
        }
    }

    fn read_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut reader = csv::Reader::from_path(&self.products_path)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::Parse(e.to_string()))?
            .clone();

        let column = |name: &str| -> Result<usize, CatalogError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| CatalogError::Parse(format!("missing product column '{}'", name)))
        };
        let mut idx = [0usize; 7];
        for (i, name) in PRODUCT_COLUMNS.iter().enumerate() {
            idx[i] = column(name)?;
        }

        let mut products = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CatalogError::Parse(e.to_string()))?;
            let field = |i: usize| record.get(idx[i]).unwrap_or("").trim();

            let key = field(0);
            if key.is_empty() {
                warn!(row = ?record, "skipping product row without key");
                continue;
            }

            products.push(Product {
                key: ProductKey::new(key),
                name: field(1).to_string(),
                weight: field(2).to_string(),
                unit: field(3).to_string(),
                cost: parse_rate_or_zero(field(4)),
                standard_price: parse_rate_or_zero(field(5)),
                box_units: parse_box_units(field(6)),
            });
        }

        products.sort_by_key(|p| p.display_name());
        Ok(products)
    }

    fn read_customers(&self) -> Result<Vec<Customer>, CatalogError> {
        let mut reader = csv::Reader::from_path(&self.customers_path)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::Parse(e.to_string()))?
            .clone();

        let name_idx = headers
            .iter()
            .position(|h| h.trim() == "customer_name")
            .ok_or_else(|| CatalogError::Parse("missing column 'customer_name'".to_string()))?;
        let channel_idx = headers
            .iter()
            .position(|h| h.trim() == "channel_type")
            .ok_or_else(|| CatalogError::Parse("missing column 'channel_type'".to_string()))?;

        let mut customers = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CatalogError::Parse(e.to_string()))?;
            let name = record.get(name_idx).unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }

            let channel_raw = record.get(channel_idx).unwrap_or("").trim();
            let channel = match ChannelType::parse(channel_raw) {
                Some(c) => c,
                None => {
                    warn!(customer = name, channel = channel_raw, "unknown channel, using 'other'");
                    ChannelType::Other
                }
            };

            // Every column that is not identity is a fee column.
            let mut fees = FeeSchedule::new();
            for (i, header) in headers.iter().enumerate() {
                if i == name_idx || i == channel_idx {
                    continue;
                }
                let label = header.trim();
                if label.is_empty() {
                    continue;
                }
                fees.set(label, parse_rate_or_zero(record.get(i).unwrap_or("")));
            }

            customers.push(Customer {
                key: CustomerKey::new(name),
                channel,
                fees,
            });
        }

        Ok(customers)
    }

    fn append_customer(&self, customer: &Customer) -> Result<(), CatalogError> {
        let mut reader = csv::Reader::from_path(&self.customers_path)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| CatalogError::Parse(e.to_string()))?
            .clone();

        let mut row: Vec<String> = Vec::with_capacity(headers.len());
        for header in headers.iter() {
            let label = header.trim();
            let cell = match label {
                "customer_name" => customer.key.as_str().to_string(),
                "channel_type" => customer.channel.as_str().to_string(),
                _ => customer
                    .fees
                    .get(label)
                    .unwrap_or_default()
                    .to_canonical_string(),
            };
            row.push(cell);
        }

        let file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.customers_path)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(&row)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        writer.flush().map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.read_products()
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, CatalogError> {
        self.read_customers()
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), CatalogError> {
        self.append_customer(customer)
    }
}
