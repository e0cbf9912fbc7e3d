use cart_store::app::open_local_store;
use cart_store::{
    CartError, CartLineItem, CartOutcome, RecordingNotifier, TomlConfig, UpdateProductAmount,
};
use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn config_for(server: &MockServer, dir: &TempDir) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.api.base_url = server.base_url();
    config.api.timeout_seconds = 5;
    config.storage.path = dir.path().to_str().unwrap().to_string();
    config
}

fn mock_product(server: &MockServer, product_id: u64, title: &str, price: f64) {
    server.mock(|when, then| {
        when.method(GET).path(format!("/products/{}", product_id));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "id": product_id,
                "title": title,
                "price": price,
                "image": format!("https://img.example/{}.jpg", product_id)
            }));
    });
}

fn mock_stock(server: &MockServer, product_id: u64, amount: i64) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path(format!("/stock/{}", product_id));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": product_id, "amount": amount}));
    })
}

fn stored_cart(dir: &TempDir) -> Vec<CartLineItem> {
    let data = std::fs::read(dir.path().join("cart.json")).unwrap();
    serde_json::from_slice(&data).unwrap()
}

fn seed_cart(dir: &TempDir, items: serde_json::Value) {
    std::fs::write(dir.path().join("cart.json"), items.to_string()).unwrap();
}

#[tokio::test]
async fn test_add_until_stock_drops() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_product(&server, 42, "Tênis VR Caminhada Confortável", 139.9);
    let mut stock = mock_stock(&server, 42, 5);

    let notifier = RecordingNotifier::new();
    let store = open_local_store(&config_for(&server, &dir), Arc::new(notifier.clone()))
        .await
        .unwrap();

    assert_ok!(store.add_product(42).await);
    assert_eq!(store.quantity_of(42).await, Some(1));

    assert_ok!(store.add_product(42).await);
    assert_eq!(store.quantity_of(42).await, Some(2));
    assert_eq!(stock.hits(), 2);

    stock.delete();
    mock_stock(&server, 42, 2);

    let err = assert_err!(store.add_product(42).await);
    assert!(matches!(err, CartError::StockExceeded { .. }));
    assert_eq!(store.quantity_of(42).await, Some(2));
    assert_eq!(notifier.count(), 1);

    let stored = stored_cart(&dir);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].quantity, 2);
    assert_eq!(stored[0].title, "Tênis VR Caminhada Confortável");
}

#[tokio::test]
async fn test_missing_stock_record_aborts_add() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/stock/5");
        then.status(404);
    });

    let notifier = RecordingNotifier::new();
    let store = open_local_store(&config_for(&server, &dir), Arc::new(notifier.clone()))
        .await
        .unwrap();

    let err = assert_err!(store.add_product(5).await);

    assert!(matches!(err, CartError::OracleQueryFailed { product_id: 5, .. }));
    assert!(store.is_empty().await);
    assert!(!dir.path().join("cart.json").exists());
    assert_eq!(notifier.messages(), vec!["error adding product".to_string()]);
}

#[tokio::test]
async fn test_update_scenarios_on_seeded_cart() {
    let dir = TempDir::new().unwrap();
    seed_cart(
        &dir,
        serde_json::json!([
            {"id": 7, "title": "Tênis Adidas Duramo Lite 2.0", "price": 219.9, "image": "https://img.example/7.jpg", "amount": 3}
        ]),
    );
    let server = MockServer::start();
    let stock = mock_stock(&server, 7, 3);

    let notifier = RecordingNotifier::new();
    let store = open_local_store(&config_for(&server, &dir), Arc::new(notifier.clone()))
        .await
        .unwrap();
    assert_eq!(store.quantity_of(7).await, Some(3));

    let err = assert_err!(
        store
            .update_product_amount(UpdateProductAmount { product_id: 7, amount: 4 })
            .await
    );
    assert!(matches!(err, CartError::StockExceeded { requested: 4, available: 3, .. }));
    assert_eq!(store.quantity_of(7).await, Some(3));

    let outcome = assert_ok!(
        store
            .update_product_amount(UpdateProductAmount { product_id: 7, amount: 2 })
            .await
    );
    assert_eq!(outcome, CartOutcome::Updated);
    assert_eq!(store.quantity_of(7).await, Some(2));
    assert_eq!(stored_cart(&dir)[0].quantity, 2);

    let hits_before = stock.hits();
    let outcome = assert_ok!(
        store
            .update_product_amount(UpdateProductAmount { product_id: 7, amount: 0 })
            .await
    );
    assert_eq!(outcome, CartOutcome::Unchanged);
    assert_eq!(stock.hits(), hits_before);
    assert_eq!(notifier.count(), 1);
}

#[tokio::test]
async fn test_remove_and_reload_round_trip() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    for (id, title, price) in [(1, "Sandália", 59.9), (2, "Bota", 299.0), (3, "Chinelo", 19.5)] {
        mock_product(&server, id, title, price);
        mock_stock(&server, id, 10);
    }
    let config = config_for(&server, &dir);

    let store = open_local_store(&config, Arc::new(RecordingNotifier::new()))
        .await
        .unwrap();
    for id in [3, 1, 2] {
        assert_ok!(store.add_product(id).await);
    }
    assert_ok!(store.add_product(1).await);
    assert_ok!(store.remove_product(2).await);
    assert_err!(store.remove_product(2).await);

    let before = store.cart().await;
    assert_eq!(
        before.iter().map(|i| (i.product_id, i.quantity)).collect::<Vec<_>>(),
        vec![(3, 1), (1, 2)]
    );

    let reopened = open_local_store(&config, Arc::new(RecordingNotifier::new()))
        .await
        .unwrap();
    assert_eq!(reopened.cart().await, before);
    assert_eq!(reopened.len().await, 2);
    assert!((reopened.total().await - (19.5 + 2.0 * 59.9)).abs() < 1e-9);
}

#[tokio::test]
async fn test_stored_format_uses_storefront_field_names() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_product(&server, 9, "Tênis Olympikus", 99.0);
    mock_stock(&server, 9, 1);

    let store = open_local_store(&config_for(&server, &dir), Arc::new(RecordingNotifier::new()))
        .await
        .unwrap();
    assert_ok!(store.add_product(9).await);

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("cart.json")).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([
            {"id": 9, "title": "Tênis Olympikus", "price": 99.0, "image": "https://img.example/9.jpg", "amount": 1}
        ])
    );
}
