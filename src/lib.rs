pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use datasource::{
    CatalogCache, CatalogError, CatalogSource, CsvCatalogSource, MockCatalogSource,
    SheetCatalogSource,
};
pub use db::{init_db, Repository};
pub use domain::{
    ChannelType, ConfirmedPriceRecord, Customer, CustomerKey, Decimal, FeeSchedule, Product,
    ProductKey,
};
pub use engine::{compute_pricing, PricingError, PricingInput, PricingMethod, PricingResult};
pub use error::AppError;
