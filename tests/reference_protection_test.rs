mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{expect_json, TestApp};

#[tokio::test]
async fn referenced_clients_cannot_be_deleted() {
    let app = TestApp::new().await;
    let client = app.seed_client("Protected Client").await;

    app.request_authenticated(
        Method::POST,
        "/api/v1/invoices/",
        Some(json!({ "client_id": client.id, "items": [] })),
    )
    .await;

    let blocked = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/clients/{}", client.id), None)
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    // The client is still there.
    let fetched = app
        .request_authenticated(Method::GET, &format!("/api/v1/clients/{}", client.id), None)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[tokio::test]
async fn unreferenced_clients_delete_cleanly() {
    let app = TestApp::new().await;
    let client = app.seed_client("Disposable Client").await;

    let deleted = app
        .request_authenticated(Method::DELETE, &format!("/api/v1/clients/{}", client.id), None)
        .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = app
        .request_authenticated(Method::GET, &format!("/api/v1/clients/{}", client.id), None)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn referenced_products_cannot_be_deleted() {
    let app = TestApp::new().await;
    let client = app.seed_client("Product Client").await;
    let product = app.seed_product("Held Product", dec!(1000), dec!(18)).await;

    app.request_authenticated(
        Method::POST,
        "/api/v1/invoices/",
        Some(json!({
            "client_id": client.id,
            "items": [ { "product_id": product.id, "quantity": "1" } ]
        })),
    )
    .await;

    let blocked = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    // Deleting the invoice releases the product.
    let invoices = app
        .request_authenticated(Method::GET, "/api/v1/invoices/", None)
        .await;
    let invoices = expect_json(invoices, StatusCode::OK).await;
    let invoice_id = invoices["items"][0]["id"].as_i64().unwrap();
    app.request_authenticated(Method::DELETE, &format!("/api/v1/invoices/{invoice_id}"), None)
        .await;

    let released = app
        .request_authenticated(
            Method::DELETE,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    assert_eq!(released.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn product_validation_rejects_bad_prices_and_rates() {
    let app = TestApp::new().await;

    let negative_price = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products/",
            Some(json!({ "name": "Bad", "unit_price": "-5", "tax_rate": "18" })),
        )
        .await;
    assert_eq!(negative_price.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let off_list_rate = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products/",
            Some(json!({ "name": "Bad", "unit_price": "5", "tax_rate": "12" })),
        )
        .await;
    assert_eq!(off_list_rate.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
