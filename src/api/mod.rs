pub mod assortment;
pub mod customers;
pub mod health;
pub mod prices;
pub mod products;
pub mod quote;

use crate::config::Config;
use crate::datasource::CatalogCache;
use crate::db::Repository;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub catalog: Arc<CatalogCache>,
    pub config: Config,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, catalog: Arc<CatalogCache>, config: Config) -> Self {
        Self {
            repo,
            catalog,
            config,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/products", get(products::list_products))
        .route(
            "/v1/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/v1/customers/:key/assortment",
            get(assortment::get_assortment).put(assortment::put_assortment),
        )
        .route("/v1/customers/:key/prices", put(prices::put_customer_prices))
        .route("/v1/quote", post(quote::post_quote))
        .route("/v1/prices", get(prices::list_prices))
        .route("/v1/prices/confirm", post(prices::confirm_price))
        .layer(cors)
        .with_state(state)
}
