//! Catalog source abstraction: product and customer master data.
//!
//! The pricing desk does not own its master data. Products and customers
//! live in spreadsheet-shaped external stores and arrive as text rows
//! that need cleaning before the engine may see them.

use crate::domain::{Customer, Product};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod cache;
pub mod csv_files;
pub mod mock;
pub mod sheet;

pub use cache::CatalogCache;
pub use csv_files::CsvCatalogSource;
pub use mock::MockCatalogSource;
pub use sheet::SheetCatalogSource;

/// Source of product and customer master data.
///
/// Implementations handle their own retry/backoff; rows they return are
/// already normalized (no `%`/`,` text, channel parsed, defaults applied).
#[async_trait]
pub trait CatalogSource: Send + Sync + fmt::Debug {
    /// Fetch the full product master, sorted by display name.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Fetch all confirmed customers with their fee schedules.
    async fn fetch_customers(&self) -> Result<Vec<Customer>, CatalogError>;

    /// Append a newly registered customer to the master store.
    async fn create_customer(&self, customer: &Customer) -> Result<(), CatalogError>;
}

/// Error type for catalog source operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected http status: {0}")]
    HttpStatus(u16),
    #[error("row parse error: {0}")]
    Parse(String),
    #[error("rate limited")]
    RateLimited,
}

/// Normalize a units-per-box cell.
///
/// Unparsable or non-positive counts fall back to 1 so a sloppy master
/// row still prices per unit instead of failing every quote for the
/// product. The engine itself rejects explicit non-positive counts.
pub(crate) fn parse_box_units(raw: &str) -> i64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<i64>() {
        Ok(n) if n > 0 => n,
        _ => 1,
    }
}
