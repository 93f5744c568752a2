#![allow(clippy::unwrap_used)]
// Products controller: loading, navigation, and mutations with alerts.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopdash_core::{
    AlertKind, Credential, DashboardConfig, FetchOutcome, MemoryCredentialStore, ProductForm,
    ProductsController,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn controller_for(server: &MockServer) -> ProductsController {
    controller_with_store(server, MemoryCredentialStore::new())
}

fn controller_with_store(server: &MockServer, store: MemoryCredentialStore) -> ProductsController {
    let config = DashboardConfig {
        api_url: Url::parse(&server.uri()).unwrap(),
        ..DashboardConfig::default()
    };
    ProductsController::from_config(&config, Arc::new(store)).unwrap()
}

fn product_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "price": 10 * id,
        "description": "desc",
        "images": [format!("https://img.example/{id}.png")],
        "category": { "id": 1, "name": "Clothes" }
    })
}

fn products_json(ids: impl IntoIterator<Item = u64>) -> serde_json::Value {
    serde_json::Value::Array(ids.into_iter().map(product_json).collect())
}

fn ids(controller: &ProductsController) -> Vec<u64> {
    controller.products().iter().map(|p| p.id).collect()
}

/// Mount the count query's "all products" listing.
async fn mount_count(server: &MockServer, body: serde_json::Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

async fn mount_page(server: &MockServer, offset: u32, body: serde_json::Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "5"))
        .and(query_param("offset", offset.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_fetches_first_page_and_total() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json(1..=5), None).await;
    mount_count(&server, products_json(1..=12), None).await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    assert_eq!(ids(&controller), vec![1, 2, 3, 4, 5]);
    let pagination = controller.pagination();
    assert_eq!(pagination.total_count, 12);
    assert_eq!(pagination.page_count(), 3);
    assert!(pagination.is_visible());
    assert_eq!(controller.page_window(), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_load_with_session_sends_bearer_on_page_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Jhon", "email": "john@mail.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("offset", "0"))
        .and(header("authorization", "Bearer tok-page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json([7])))
        .expect(1)
        .mount(&server)
        .await;
    mount_count(&server, products_json([7]), None).await;

    let controller =
        controller_with_store(&server, MemoryCredentialStore::with_credential(Credential::new("tok-page")));
    controller.load().await.unwrap();

    assert!(controller.session().is_authenticated());
    assert_eq!(ids(&controller), vec![7]);
}

#[tokio::test]
async fn test_empty_catalogue_hides_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, 0, json!([]), None).await;
    mount_count(&server, json!([]), None).await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    assert!(controller.products().is_empty());
    assert!(!controller.pagination().is_visible());
    assert!(controller.page_window().is_empty());
}

// ── Navigation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_offset_past_end_yields_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json(1..=5), None).await;
    mount_page(&server, 500, json!([]), None).await;
    mount_count(&server, products_json(1..=5), Some(1)).await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    let outcome = controller.set_offset(500).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    assert!(controller.products().is_empty());
    assert!(controller.page_state().error().is_none());
    // Count query is not re-run by navigation.
    assert_eq!(controller.pagination().total_count, 5);
}

#[tokio::test]
async fn test_page_navigation_moves_offset_within_bounds() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json(1..=5), None).await;
    mount_page(&server, 5, products_json(6..=10), None).await;
    mount_page(&server, 10, products_json(11..=12), None).await;
    mount_count(&server, products_json(1..=12), None).await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    assert_eq!(controller.prev_page().await.unwrap(), FetchOutcome::Unchanged);

    controller.next_page().await.unwrap();
    assert_eq!(controller.pagination().offset, 5);
    assert_eq!(ids(&controller), vec![6, 7, 8, 9, 10]);

    controller.go_to_page(99).await.unwrap();
    assert_eq!(controller.pagination().offset, 10);
    assert_eq!(ids(&controller), vec![11, 12]);
    assert_eq!(controller.next_page().await.unwrap(), FetchOutcome::Unchanged);

    controller.prev_page().await.unwrap();
    assert_eq!(controller.pagination().offset, 5);
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_success_alerts_and_refreshes_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json([1, 2, 3]), Some(1)).await;
    mount_page(&server, 0, products_json([1, 3]), None).await;
    mount_count(&server, products_json([1, 2, 3]), Some(1)).await;
    mount_count(&server, products_json([1, 3]), None).await;
    Mock::given(method("DELETE"))
        .and(path("/products/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();
    assert_eq!(ids(&controller), vec![1, 2, 3]);

    controller.delete(2).await.unwrap();

    let alert = controller.alerts().current();
    assert!(alert.active);
    assert_eq!(alert.kind, AlertKind::Success);
    assert_eq!(alert.message, "Product deleted");
    assert!(alert.auto_close);
    assert_eq!(ids(&controller), vec![1, 3]);
    assert_eq!(controller.pagination().total_count, 2);
}

#[tokio::test]
async fn test_delete_failure_without_message_alerts_and_keeps_list() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json([1, 2, 3]), None).await;
    mount_count(&server, products_json([1, 2, 3]), None).await;
    Mock::given(method("DELETE"))
        .and(path("/products/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    let err = controller.delete(2).await.unwrap_err();

    let alert = controller.alerts().current();
    assert!(alert.active);
    assert_eq!(alert.kind, AlertKind::Error);
    assert_eq!(alert.message, "Internal Server Error");
    assert!(!alert.auto_close);
    assert_eq!(err.alert_message(), "Internal Server Error");
    assert_eq!(ids(&controller), vec![1, 2, 3]);

    // Only the initial load hit the listing.
    let listing_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(listing_requests, 2);
}

#[tokio::test]
async fn test_create_refreshes_page_and_count() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json([1]), Some(1)).await;
    mount_page(&server, 0, products_json([1, 2]), None).await;
    mount_count(&server, products_json([1]), Some(1)).await;
    mount_count(&server, products_json([1, 2]), None).await;

    let form = ProductForm {
        title: "Product 2".into(),
        price: 20.0,
        description: "desc".into(),
        category_id: 1,
        images: vec!["https://img.example/2.png".into()],
    };
    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_json(&form))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json(2)))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    let created = controller.create(&form).await.unwrap();

    assert_eq!(created.id, 2);
    assert_eq!(controller.alerts().current().message, "Product added");
    assert_eq!(ids(&controller), vec![1, 2]);
    assert_eq!(controller.pagination().total_count, 2);
}

#[tokio::test]
async fn test_create_validation_error_shows_server_message() {
    let server = MockServer::start().await;
    mount_page(&server, 0, products_json([1]), None).await;
    mount_count(&server, products_json([1]), None).await;
    Mock::given(method("POST"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": ["price must be a positive number", "title should not be empty"],
            "error": "Bad Request",
            "statusCode": 400
        })))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.load().await.unwrap();

    controller.create(&ProductForm::default()).await.unwrap_err();

    let alert = controller.alerts().current();
    assert_eq!(alert.kind, AlertKind::Error);
    assert_eq!(
        alert.message,
        "price must be a positive number; title should not be empty"
    );
    assert_eq!(ids(&controller), vec![1]);
}
