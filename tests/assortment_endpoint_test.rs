use axum::http::StatusCode;
use pricedesk::api::{self, AppState};
use pricedesk::config::{CatalogSourceKind, Config};
use pricedesk::datasource::{CatalogCache, MockCatalogSource};
use pricedesk::db::init_db;
use pricedesk::domain::{
    ChannelType, Customer, CustomerKey, Decimal, FeeSchedule, Product, ProductKey,
};
use pricedesk::Repository;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

fn test_config() -> Config {
    Config {
        port: 0,
        database_path: ":memory:".to_string(),
        catalog_source: CatalogSourceKind::Csv,
        products_csv_path: None,
        customers_csv_path: None,
        sheet_gateway_url: None,
        catalog_cache_ttl_secs: 300,
        optional_fee_labels: vec!["regional_trunk_fee".to_string()],
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn squid() -> Product {
    Product {
        key: ProductKey::new("P-001"),
        name: "seasoned squid".to_string(),
        weight: "500g".to_string(),
        unit: "x10".to_string(),
        cost: dec("7000"),
        standard_price: dec("10000"),
        box_units: 12,
    }
}

fn pollack() -> Product {
    Product {
        key: ProductKey::new("P-002"),
        name: "dried pollack".to_string(),
        weight: "200g".to_string(),
        unit: "x5".to_string(),
        cost: dec("3100"),
        standard_price: dec("4500"),
        box_units: 6,
    }
}

fn fresh_mart() -> Customer {
    Customer {
        key: CustomerKey::new("fresh-mart"),
        channel: ChannelType::RetailChain,
        fees: FeeSchedule::new()
            .with("vendor_fee", dec("2"))
            .with("discount", dec("1")),
    }
}

async fn setup_test_app(source: MockCatalogSource) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let catalog = Arc::new(CatalogCache::new(
        Arc::new(source),
        Duration::from_secs(300),
    ));
    let state = AppState::new(repo, catalog, test_config());
    let app = api::create_router(state);

    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_assortment_starts_inactive() {
    let test_app = setup_test_app(
        MockCatalogSource::new()
            .with_products(vec![squid(), pollack()])
            .with_customer(fresh_mart()),
    )
    .await;

    let (status, body) = send_json(
        test_app.app.clone(),
        "GET",
        "/v1/customers/fresh-mart/assortment",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["active"] == json!(false)));
    // display names carried for the operator's checklist
    assert!(entries
        .iter()
        .any(|e| e["displayName"] == "dried pollack (200gx5)"));
}

#[tokio::test]
async fn test_put_assortment_materializes_defaults() {
    let test_app = setup_test_app(
        MockCatalogSource::new()
            .with_products(vec![squid(), pollack()])
            .with_customer(fresh_mart()),
    )
    .await;

    let (status, body) = send_json(
        test_app.app.clone(),
        "PUT",
        "/v1/customers/fresh-mart/assortment",
        Some(json!({"productKeys": ["P-002"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    // placeholder at standard price, analysis zeroed until confirmed
    assert_eq!(records[0]["supplyPrice"].as_f64().unwrap(), 4500.0);
    assert_eq!(records[0]["marginRate"].as_f64().unwrap(), 0.0);

    let (_, entries) = send_json(
        test_app.app.clone(),
        "GET",
        "/v1/customers/fresh-mart/assortment",
        None,
    )
    .await;
    let entries = entries.as_array().unwrap();
    let pollack_entry = entries
        .iter()
        .find(|e| e["productKey"] == "P-002")
        .unwrap();
    assert_eq!(pollack_entry["active"], json!(true));
    let squid_entry = entries.iter().find(|e| e["productKey"] == "P-001").unwrap();
    assert_eq!(squid_entry["active"], json!(false));
}

#[tokio::test]
async fn test_put_assortment_keeps_confirmed_prices() {
    let test_app = setup_test_app(
        MockCatalogSource::new()
            .with_products(vec![squid(), pollack()])
            .with_customer(fresh_mart()),
    )
    .await;

    // Confirm a real price for the squid first
    let (status, confirmed) = send_json(
        test_app.app.clone(),
        "POST",
        "/v1/prices/confirm",
        Some(json!({
            "productKey": "P-001",
            "customerKey": "fresh-mart",
            "method": {"kind": "override", "supply_price": 9800}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Grow the assortment; the squid's confirmed price must survive
    let (_, body) = send_json(
        test_app.app.clone(),
        "PUT",
        "/v1/customers/fresh-mart/assortment",
        Some(json!({"productKeys": ["P-001", "P-002"]})),
    )
    .await;
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    let squid_record = records.iter().find(|r| r["productKey"] == "P-001").unwrap();
    assert_eq!(squid_record["supplyPrice"].as_f64().unwrap(), 9800.0);
    assert_eq!(squid_record["revision"], confirmed["revision"]);
}

#[tokio::test]
async fn test_put_assortment_drops_unchecked() {
    let test_app = setup_test_app(
        MockCatalogSource::new()
            .with_products(vec![squid(), pollack()])
            .with_customer(fresh_mart()),
    )
    .await;

    send_json(
        test_app.app.clone(),
        "PUT",
        "/v1/customers/fresh-mart/assortment",
        Some(json!({"productKeys": ["P-001", "P-002"]})),
    )
    .await;
    let (_, body) = send_json(
        test_app.app.clone(),
        "PUT",
        "/v1/customers/fresh-mart/assortment",
        Some(json!({"productKeys": ["P-001"]})),
    )
    .await;
    assert_eq!(body["records"].as_array().unwrap().len(), 1);

    let (_, list) =
        send_json(test_app.app.clone(), "GET", "/v1/prices?customer=fresh-mart", None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["productKey"], "P-001");
}

#[tokio::test]
async fn test_put_assortment_reports_unknown_keys() {
    let test_app = setup_test_app(
        MockCatalogSource::new()
            .with_product(squid())
            .with_customer(fresh_mart()),
    )
    .await;

    let (status, body) = send_json(
        test_app.app.clone(),
        "PUT",
        "/v1/customers/fresh-mart/assortment",
        Some(json!({"productKeys": ["P-001", "P-GONE"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["skipped"], json!(["P-GONE"]));
}

#[tokio::test]
async fn test_assortment_unknown_customer_is_404() {
    let test_app = setup_test_app(MockCatalogSource::new().with_product(squid())).await;

    let (status, _) = send_json(
        test_app.app.clone(),
        "GET",
        "/v1/customers/nobody/assortment",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        test_app.app.clone(),
        "PUT",
        "/v1/customers/nobody/assortment",
        Some(json!({"productKeys": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
