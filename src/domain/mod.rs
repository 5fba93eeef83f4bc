//! Domain types for the pricing desk.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: ProductKey, CustomerKey, ChannelType
//! - Product and Customer master records
//! - FeeSchedule with spreadsheet-text normalization
//! - ConfirmedPriceRecord, the persisted confirmation shape

pub mod customer;
pub mod decimal;
pub mod fees;
pub mod primitives;
pub mod product;
pub mod record;

pub use customer::Customer;
pub use decimal::Decimal;
pub use fees::{parse_rate, parse_rate_or_zero, FeeSchedule, RateParseError};
pub use primitives::{ChannelType, CustomerKey, ProductKey, COMMON_FEE_LABELS};
pub use product::Product;
pub use record::ConfirmedPriceRecord;
