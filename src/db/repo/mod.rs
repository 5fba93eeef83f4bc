//! Repository layer for database operations.
//!
//! One domain lives here: the confirmed-price table, keyed by
//! (product_key, customer_key) with at most one live row per pair.
//! Decimal columns are stored as canonical strings; SQLite REAL would
//! lose precision on won amounts.

use crate::domain::{ConfirmedPriceRecord, CustomerKey, Decimal, ProductKey};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Error type for confirmed-price writes.
#[derive(Debug, Error)]
pub enum PriceStoreError {
    /// The row changed since the caller read it; carries the live revision.
    #[error("revision conflict: current revision is {current}")]
    RevisionConflict { current: String },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Upsert one confirmed price, last-write-wins per (product, customer).
    ///
    /// When `expected_revision` is given, the write only goes through if
    /// the live row still carries that revision; otherwise
    /// [`PriceStoreError::RevisionConflict`] reports the current one.
    /// `None` skips the check (first confirmation, or forced overwrite).
    pub async fn upsert_price(
        &self,
        record: &ConfirmedPriceRecord,
        expected_revision: Option<&str>,
    ) -> Result<(), PriceStoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(expected) = expected_revision {
            let row = sqlx::query(
                "SELECT revision FROM confirmed_prices WHERE product_key = ? AND customer_key = ?",
            )
            .bind(record.product_key.as_str())
            .bind(record.customer_key.as_str())
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = row {
                let current: String = row.get("revision");
                if current != expected {
                    return Err(PriceStoreError::RevisionConflict { current });
                }
            }
        }

        sqlx::query(
            r#"
            INSERT INTO confirmed_prices
            (product_key, customer_key, confirmed_at, cost, supply_price,
             total_deduction_rate, net_settlement, profit_per_unit, margin_rate,
             profit_per_box, revision)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(product_key, customer_key) DO UPDATE SET
                confirmed_at = excluded.confirmed_at,
                cost = excluded.cost,
                supply_price = excluded.supply_price,
                total_deduction_rate = excluded.total_deduction_rate,
                net_settlement = excluded.net_settlement,
                profit_per_unit = excluded.profit_per_unit,
                margin_rate = excluded.margin_rate,
                profit_per_box = excluded.profit_per_box,
                revision = excluded.revision
            "#,
        )
        .bind(record.product_key.as_str())
        .bind(record.customer_key.as_str())
        .bind(record.confirmed_at.to_rfc3339())
        .bind(record.cost.to_canonical_string())
        .bind(record.supply_price.to_canonical_string())
        .bind(record.total_deduction_rate.to_canonical_string())
        .bind(record.net_settlement.to_canonical_string())
        .bind(record.profit_per_unit.to_canonical_string())
        .bind(record.margin_rate.to_canonical_string())
        .bind(record.profit_per_box.to_canonical_string())
        .bind(&record.revision)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get the confirmed price for one (product, customer) pair.
    pub async fn get_price(
        &self,
        product: &ProductKey,
        customer: &CustomerKey,
    ) -> Result<Option<ConfirmedPriceRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT product_key, customer_key, confirmed_at, cost, supply_price,
                   total_deduction_rate, net_settlement, profit_per_unit,
                   margin_rate, profit_per_box, revision
            FROM confirmed_prices
            WHERE product_key = ? AND customer_key = ?
            "#,
        )
        .bind(product.as_str())
        .bind(customer.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| record_from_row(&r)))
    }

    /// All confirmed prices, ordered by customer then product.
    pub async fn list_prices(&self) -> Result<Vec<ConfirmedPriceRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT product_key, customer_key, confirmed_at, cost, supply_price,
                   total_deduction_rate, net_settlement, profit_per_unit,
                   margin_rate, profit_per_box, revision
            FROM confirmed_prices
            ORDER BY customer_key ASC, product_key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Confirmed prices for one customer, ordered by product.
    pub async fn list_prices_for_customer(
        &self,
        customer: &CustomerKey,
    ) -> Result<Vec<ConfirmedPriceRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT product_key, customer_key, confirmed_at, cost, supply_price,
                   total_deduction_rate, net_settlement, profit_per_unit,
                   margin_rate, profit_per_box, revision
            FROM confirmed_prices
            WHERE customer_key = ?
            ORDER BY product_key ASC
            "#,
        )
        .bind(customer.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Replace one customer's rows with a new set, atomically.
    ///
    /// This is the persistence side of batch save and assortment
    /// reconciliation: the customer's slice of the table is rewritten in
    /// a single transaction, other customers' rows untouched.
    pub async fn replace_customer_prices(
        &self,
        customer: &CustomerKey,
        records: &[ConfirmedPriceRecord],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM confirmed_prices WHERE customer_key = ?")
            .bind(customer.as_str())
            .execute(&mut *tx)
            .await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO confirmed_prices
                (product_key, customer_key, confirmed_at, cost, supply_price,
                 total_deduction_rate, net_settlement, profit_per_unit, margin_rate,
                 profit_per_box, revision)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.product_key.as_str())
            .bind(record.customer_key.as_str())
            .bind(record.confirmed_at.to_rfc3339())
            .bind(record.cost.to_canonical_string())
            .bind(record.supply_price.to_canonical_string())
            .bind(record.total_deduction_rate.to_canonical_string())
            .bind(record.net_settlement.to_canonical_string())
            .bind(record.profit_per_unit.to_canonical_string())
            .bind(record.margin_rate.to_canonical_string())
            .bind(record.profit_per_box.to_canonical_string())
            .bind(&record.revision)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn parse_decimal_column(row: &SqliteRow, column: &str) -> Decimal {
    let raw: String = row.get(column);
    Decimal::from_str(&raw).unwrap_or_else(|e| {
        warn!(column, value = %raw, error = %e, "Failed to parse stored decimal, using default");
        Decimal::default()
    })
}

fn record_from_row(row: &SqliteRow) -> ConfirmedPriceRecord {
    let product_key: String = row.get("product_key");
    let customer_key: String = row.get("customer_key");
    let confirmed_at_raw: String = row.get("confirmed_at");
    let confirmed_at = DateTime::parse_from_rfc3339(&confirmed_at_raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = %confirmed_at_raw, error = %e, "Failed to parse stored timestamp, using epoch");
            DateTime::<Utc>::UNIX_EPOCH
        });

    ConfirmedPriceRecord {
        product_key: ProductKey::new(product_key),
        customer_key: CustomerKey::new(customer_key),
        confirmed_at,
        cost: parse_decimal_column(row, "cost"),
        supply_price: parse_decimal_column(row, "supply_price"),
        total_deduction_rate: parse_decimal_column(row, "total_deduction_rate"),
        net_settlement: parse_decimal_column(row, "net_settlement"),
        profit_per_unit: parse_decimal_column(row, "profit_per_unit"),
        margin_rate: parse_decimal_column(row, "margin_rate"),
        profit_per_box: parse_decimal_column(row, "profit_per_box"),
        revision: row.get("revision"),
    }
}
