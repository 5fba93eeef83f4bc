//! Mock catalog source for testing without files or network.

use super::{CatalogError, CatalogSource};
use crate::domain::{Customer, Product};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock catalog source that returns predefined master data.
#[derive(Debug, Default)]
pub struct MockCatalogSource {
    products: Vec<Product>,
    // Mutex so that create_customer works through &self like real sources.
    customers: Mutex<Vec<Customer>>,
}

impl MockCatalogSource {
    /// Create a new mock catalog source with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the mock catalog.
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// Add multiple products to the mock catalog.
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products.extend(products);
        self
    }

    /// Add a customer to the mock catalog.
    pub fn with_customer(self, customer: Customer) -> Self {
        self.customers.lock().expect("mock lock").push(customer);
        self
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.products.clone();
        products.sort_by_key(|p| p.display_name());
        Ok(products)
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>, CatalogError> {
        Ok(self.customers.lock().expect("mock lock").clone())
    }

    async fn create_customer(&self, customer: &Customer) -> Result<(), CatalogError> {
        self.customers
            .lock()
            .expect("mock lock")
            .push(customer.clone());
        Ok(())
    }
}
