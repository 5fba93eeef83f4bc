use pricedesk::config::CatalogSourceKind;
use pricedesk::datasource::{CatalogCache, CsvCatalogSource, SheetCatalogSource};
use pricedesk::{api, config::Config, db::init_db, CatalogSource, Repository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Initialize database and dependencies
    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));
    let source: Arc<dyn CatalogSource> = match (
        config.catalog_source,
        config.products_csv_path.clone(),
        config.customers_csv_path.clone(),
        config.sheet_gateway_url.clone(),
    ) {
        (CatalogSourceKind::Csv, Some(products), Some(customers), _) => {
            Arc::new(CsvCatalogSource::new(products, customers))
        }
        (CatalogSourceKind::Sheet, _, _, Some(gateway_url)) => {
            Arc::new(SheetCatalogSource::new(gateway_url))
        }
        _ => {
            // Config::from_env already rejects these combinations.
            eprintln!("Catalog source is not fully configured");
            std::process::exit(1);
        }
    };
    let catalog = Arc::new(CatalogCache::new(
        source,
        Duration::from_secs(config.catalog_cache_ttl_secs),
    ));

    // Create router
    let app = api::create_router(api::AppState::new(repo, catalog, config));

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
