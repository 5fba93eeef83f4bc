//! TTL cache in front of a catalog source.
//!
//! Master data changes rarely during a pricing session, but every quote
//! needs it. Loads go to the source at most once per TTL window; writes
//! through the desk invalidate the window immediately.

use super::{CatalogError, CatalogSource};
use crate::domain::{Customer, CustomerKey, Product, ProductKey};
use futures::future::try_join;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct Snapshot {
    products: Vec<Product>,
    customers: Vec<Customer>,
    loaded_at: Instant,
}

/// Caching facade over a [`CatalogSource`].
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Current products, loading through the source when the window expired.
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.ensure_fresh().await?;
        let guard = self.snapshot.read().await;
        Ok(guard.as_ref().map(|s| s.products.clone()).unwrap_or_default())
    }

    /// Current customers, loading through the source when the window expired.
    pub async fn customers(&self) -> Result<Vec<Customer>, CatalogError> {
        self.ensure_fresh().await?;
        let guard = self.snapshot.read().await;
        Ok(guard.as_ref().map(|s| s.customers.clone()).unwrap_or_default())
    }

    /// Look up one product by key.
    pub async fn product(&self, key: &ProductKey) -> Result<Option<Product>, CatalogError> {
        Ok(self.products().await?.into_iter().find(|p| &p.key == key))
    }

    /// Look up one customer by key.
    pub async fn customer(&self, key: &CustomerKey) -> Result<Option<Customer>, CatalogError> {
        Ok(self.customers().await?.into_iter().find(|c| &c.key == key))
    }

    /// Register a customer through the source and drop the cached window.
    pub async fn create_customer(&self, customer: &Customer) -> Result<(), CatalogError> {
        self.source.create_customer(customer).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Drop the cached window; the next read reloads from the source.
    pub async fn invalidate(&self) {
        let mut guard = self.snapshot.write().await;
        *guard = None;
    }

    async fn ensure_fresh(&self) -> Result<(), CatalogError> {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.loaded_at.elapsed() < self.ttl {
                    return Ok(());
                }
            }
        }

        let mut guard = self.snapshot.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if let Some(snapshot) = guard.as_ref() {
            if snapshot.loaded_at.elapsed() < self.ttl {
                return Ok(());
            }
        }

        let (products, customers) = try_join(
            self.source.fetch_products(),
            self.source.fetch_customers(),
        )
        .await?;
        debug!(
            products = products.len(),
            customers = customers.len(),
            "catalog cache refreshed"
        );
        *guard = Some(Snapshot {
            products,
            customers,
            loaded_at: Instant::now(),
        });
        Ok(())
    }
}
