mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use common::{expect_json, TestApp};

fn amount(value: &Value) -> Decimal {
    value
        .as_str()
        .map(|s| s.parse().expect("decimal string"))
        .or_else(|| value.as_f64().map(|f| Decimal::try_from(f).expect("decimal number")))
        .expect("amount field present")
}

#[tokio::test]
async fn item_totals_derive_from_quantity_price_and_tax() {
    let app = TestApp::new().await;
    let client = app.seed_client("Totals Client").await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [
                    { "description": "Cement bag", "quantity": "3", "unit_price": "1000", "tax_rate": "18" }
                ]
            })),
        )
        .await;
    let body = expect_json(created, StatusCode::CREATED).await;

    let item = &body["items"][0];
    assert_eq!(amount(&item["total_before_tax"]), dec!(3000));
    assert_eq!(amount(&item["total_tax"]), dec!(540));
    assert_eq!(amount(&item["total_with_tax"]), dec!(3540));
}

#[tokio::test]
async fn header_totals_are_the_sum_of_item_totals() {
    let app = TestApp::new().await;
    let client = app.seed_client("Header Client").await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [
                    { "description": "Cement bag", "quantity": "3", "unit_price": "1000", "tax_rate": "18" },
                    { "description": "Rebar", "quantity": "2", "unit_price": "1000", "tax_rate": "18" }
                ]
            })),
        )
        .await;
    let body = expect_json(created, StatusCode::CREATED).await;

    assert_eq!(amount(&body["total_before_tax"]), dec!(5000));
    assert_eq!(amount(&body["total_tax"]), dec!(900));
    assert_eq!(amount(&body["total_with_tax"]), dec!(5900));
}

#[tokio::test]
async fn item_pricing_defaults_come_from_the_catalog() {
    let app = TestApp::new().await;
    let client = app.seed_client("Catalog Client").await;
    let product = app.seed_product("Cement 50kg", dec!(4500), dec!(18)).await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [ { "product_id": product.id, "quantity": "2" } ]
            })),
        )
        .await;
    let body = expect_json(created, StatusCode::CREATED).await;

    let item = &body["items"][0];
    assert_eq!(item["description"], "Cement 50kg");
    assert_eq!(amount(&item["unit_price"]), dec!(4500));
    assert_eq!(amount(&item["tax_rate"]), dec!(18));
    assert_eq!(amount(&body["total_with_tax"]), dec!(10620));
}

#[tokio::test]
async fn updating_items_replaces_them_and_recomputes_totals() {
    let app = TestApp::new().await;
    let client = app.seed_client("Replace Client").await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [
                    { "description": "Old line", "quantity": "1", "unit_price": "9999", "tax_rate": "0" }
                ]
            })),
        )
        .await;
    let created = expect_json(created, StatusCode::CREATED).await;
    let id = created["id"].as_i64().expect("invoice id");

    let updated = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/invoices/{id}"),
            Some(json!({
                "items": [
                    { "description": "New line A", "quantity": "2", "unit_price": "500", "tax_rate": "0" },
                    { "description": "New line B", "quantity": "1", "unit_price": "1000", "tax_rate": "18" }
                ]
            })),
        )
        .await;
    let updated = expect_json(updated, StatusCode::OK).await;

    let items = updated["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["description"], "New line A");
    assert_eq!(amount(&updated["total_before_tax"]), dec!(2000));
    assert_eq!(amount(&updated["total_tax"]), dec!(180));
    assert_eq!(amount(&updated["total_with_tax"]), dec!(2180));
}

#[tokio::test]
async fn rejects_bad_quantities_rates_and_unknown_clients() {
    let app = TestApp::new().await;
    let client = app.seed_client("Validation Client").await;

    let zero_quantity = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [ { "description": "x", "quantity": "0", "unit_price": "100" } ]
            })),
        )
        .await;
    assert_eq!(zero_quantity.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let off_list_rate = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [ { "description": "x", "quantity": "1", "unit_price": "100", "tax_rate": "7" } ]
            })),
        )
        .await;
    assert_eq!(off_list_rate.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let unknown_client = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({ "client_id": 99_999, "items": [] })),
        )
        .await;
    assert_eq!(unknown_client.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn rejects_amounts_past_the_storage_precision_instead_of_panicking() {
    let app = TestApp::new().await;
    let client = app.seed_client("Bounds Client").await;

    // Near Decimal::MAX; multiplying this by any price would overflow.
    let huge_quantity = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [ {
                    "description": "x",
                    "quantity": "79228162514264337593543950335",
                    "unit_price": "2",
                    "tax_rate": "0"
                } ]
            })),
        )
        .await;
    assert_eq!(huge_quantity.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let huge_price = app
        .request_authenticated(
            Method::POST,
            "/api/v1/proformas/",
            Some(json!({
                "client_id": client.id,
                "items": [ {
                    "description": "x",
                    "quantity": "1",
                    "unit_price": "100000000000000",
                    "tax_rate": "0"
                } ]
            })),
        )
        .await;
    assert_eq!(huge_price.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let huge_product_price = app
        .request_authenticated(
            Method::POST,
            "/api/v1/products/",
            Some(json!({
                "name": "Overpriced",
                "unit_price": "100000000000000",
                "tax_rate": "18"
            })),
        )
        .await;
    assert_eq!(huge_product_price.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The largest in-bounds value still goes through.
    let in_bounds = app
        .request_authenticated(
            Method::POST,
            "/api/v1/invoices/",
            Some(json!({
                "client_id": client.id,
                "items": [ {
                    "description": "x",
                    "quantity": "1",
                    "unit_price": "9999999999999.99",
                    "tax_rate": "0"
                } ]
            })),
        )
        .await;
    assert_eq!(in_bounds.status(), StatusCode::CREATED);
}
