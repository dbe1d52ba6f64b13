mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{expect_json, TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};

#[tokio::test]
async fn login_issues_a_token_pair_and_refresh_rotates_it() {
    let app = TestApp::new().await;

    let login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    let pair = expect_json(login, StatusCode::OK).await;
    assert_eq!(pair["token_type"], "Bearer");
    let access = pair["access_token"].as_str().unwrap().to_string();
    let refresh = pair["refresh_token"].as_str().unwrap().to_string();

    let me = app
        .request(Method::GET, "/api/v1/users/me", None, Some(&access))
        .await;
    let me = expect_json(me, StatusCode::OK).await;
    assert_eq!(me["username"], ADMIN_USERNAME);
    assert!(me.get("password_hash").is_none());

    let rotated = app
        .request(
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    let rotated = expect_json(rotated, StatusCode::OK).await;
    assert!(rotated["access_token"].as_str().is_some());

    // An access token is not accepted as a refresh token.
    let wrong_use = app
        .request(
            Method::POST,
            "/auth/refresh",
            Some(json!({ "refresh_token": access })),
            None,
        )
        .await;
    assert_eq!(wrong_use.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_credentials_and_missing_tokens_are_rejected() {
    let app = TestApp::new().await;

    let wrong_password = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": "nope-nope" })),
            None,
        )
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_user = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "ghost", "password": "whatever1" })),
            None,
        )
        .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let no_token = app.request(Method::GET, "/api/v1/clients/", None, None).await;
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .request(Method::GET, "/api/v1/clients/", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_requires_the_old_password() {
    let app = TestApp::new().await;

    let wrong_old = app
        .request_authenticated(
            Method::POST,
            "/api/v1/users/me/password",
            Some(json!({ "old_password": "wrong-old", "new_password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(wrong_old.status(), StatusCode::CONFLICT);

    let too_short = app
        .request_authenticated(
            Method::POST,
            "/api/v1/users/me/password",
            Some(json!({ "old_password": ADMIN_PASSWORD, "new_password": "short" })),
        )
        .await;
    assert_eq!(too_short.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let changed = app
        .request_authenticated(
            Method::POST,
            "/api/v1/users/me/password",
            Some(json!({ "old_password": ADMIN_PASSWORD, "new_password": "brand-new-pass" })),
        )
        .await;
    assert_eq!(changed.status(), StatusCode::NO_CONTENT);

    // Old credentials stop working, new ones work.
    let old_login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": ADMIN_USERNAME, "password": "brand-new-pass" })),
            None,
        )
        .await;
    assert_eq!(new_login.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_manages_accounts_and_agents_cannot() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/users/",
            Some(json!({
                "username": "agent1",
                "password": "agent-pass-1",
                "role": "agent"
            })),
        )
        .await;
    let agent = expect_json(created, StatusCode::CREATED).await;
    let agent_id = agent["id"].as_i64().unwrap();

    // Duplicate usernames conflict.
    let duplicate = app
        .request_authenticated(
            Method::POST,
            "/api/v1/users/",
            Some(json!({
                "username": "agent1",
                "password": "agent-pass-2",
                "role": "agent"
            })),
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // Admin reset needs no old password.
    let reset = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/users/{agent_id}/password"),
            Some(json!({ "new_password": "reset-pass-1" })),
        )
        .await;
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);

    let agent_login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "agent1", "password": "reset-pass-1" })),
            None,
        )
        .await;
    let agent_pair = expect_json(agent_login, StatusCode::OK).await;
    let agent_token = agent_pair["access_token"].as_str().unwrap().to_string();

    // Agents reach business resources but not account administration.
    let clients = app
        .request(Method::GET, "/api/v1/clients/", None, Some(&agent_token))
        .await;
    assert_eq!(clients.status(), StatusCode::OK);

    let forbidden = app
        .request(Method::GET, "/api/v1/users/", None, Some(&agent_token))
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deactivated_accounts_cannot_log_in() {
    let app = TestApp::new().await;

    let created = app
        .request_authenticated(
            Method::POST,
            "/api/v1/users/",
            Some(json!({
                "username": "leaver",
                "password": "leaver-pass-1",
                "role": "agent"
            })),
        )
        .await;
    let leaver = expect_json(created, StatusCode::CREATED).await;
    let leaver_id = leaver["id"].as_i64().unwrap();

    let deactivated = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/users/{leaver_id}"),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(deactivated.status(), StatusCode::OK);

    let login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "leaver", "password": "leaver-pass-1" })),
            None,
        )
        .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}
