mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{expect_json, TestApp};

#[tokio::test]
async fn client_crud_round_trip() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/clients/",
            Some(json!({
                "name": "Quincaillerie Diallo",
                "phone": "+221771234567",
                "address": "Marche Sandaga, Dakar"
            })),
        )
        .await;
    let created = expect_json(created, StatusCode::CREATED).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Quincaillerie Diallo");

    let updated = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/clients/{id}"),
            Some(json!({
                "name": "Quincaillerie Diallo et Fils",
                "phone": "+221771234567"
            })),
        )
        .await;
    let updated = expect_json(updated, StatusCode::OK).await;
    assert_eq!(updated["name"], "Quincaillerie Diallo et Fils");
    // Omitted optional fields are cleared on a full-replacement update.
    assert!(updated["address"].is_null());

    let empty_name = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/clients/{id}"),
            Some(json!({ "name": "" })),
        )
        .await;
    assert_eq!(empty_name.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn client_list_searches_and_paginates() {
    let app = TestApp::new().await;
    for name in ["Alpha Stores", "Beta Traders", "Alpha Works"] {
        app.seed_client(name).await;
    }

    let search = app
        .request_authenticated(Method::GET, "/api/v1/clients/?search=Alpha", None)
        .await;
    let search = expect_json(search, StatusCode::OK).await;
    assert_eq!(search["total"], 2);

    let paged = app
        .request_authenticated(Method::GET, "/api/v1/clients/?page=2&per_page=2", None)
        .await;
    let paged = expect_json(paged, StatusCode::OK).await;
    assert_eq!(paged["total"], 3);
    assert_eq!(paged["total_pages"], 2);
    assert_eq!(paged["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn product_crud_round_trip() {
    let app = TestApp::new().await;
    let product = app.seed_product("Cement 50kg", dec!(4500), dec!(18)).await;

    let fetched = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    let fetched = expect_json(fetched, StatusCode::OK).await;
    assert_eq!(fetched["name"], "Cement 50kg");

    let updated = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/products/{}", product.id),
            Some(json!({
                "name": "Cement 50kg",
                "unit_price": "4800",
                "tax_rate": "18"
            })),
        )
        .await;
    let updated = expect_json(updated, StatusCode::OK).await;
    assert_eq!(updated["unit_price"], "4800");

    let missing = app
        .request_authenticated(Method::GET, "/api/v1/products/424242", None)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
