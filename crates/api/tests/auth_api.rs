//! HTTP-level integration tests for the `/auth` endpoints and the admin guard.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_as, post_empty, post_empty_as, post_json, TestApp};
use serde_json::json;
use sqlx::PgPool;

const ADMIN_PHONE: &str = "0899999999";
const PASSWORD: &str = "correct-horse-42";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn register(app: &TestApp, phone: &str, password: &str, role: &str) -> axum::response::Response {
    post_json(
        app.app(),
        "/api/v1/auth/register",
        json!({ "phone": phone, "password": password, "role": role }),
    )
    .await
}

async fn login(app: &TestApp, phone: &str, password: &str) -> axum::response::Response {
    post_json(
        app.app(),
        "/api/v1/auth/login",
        json!({ "phone": phone, "password": password }),
    )
    .await
}

/// Register, log in and return the access token.
async fn access_token(app: &TestApp, phone: &str, role: &str) -> String {
    assert_eq!(register(app, phone, PASSWORD, role).await.status(), StatusCode::CREATED);
    let response = login(app, phone, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Register
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_account_once_per_phone(pool: PgPool) {
    let app = build_test_app(pool);

    let response = register(&app, ADMIN_PHONE, PASSWORD, "ADMIN").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["role"], "ADMIN");
    assert!(json["data"]["user_id"].is_string());
    assert!(json["data"].get("password_hash").is_none());

    let response = register(&app, ADMIN_PHONE, "another-password", "COURIER").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error_code"], "PHONE_ALREADY_EXISTS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_validates_input(pool: PgPool) {
    let app = build_test_app(pool);

    for (phone, password, role) in [
        ("", PASSWORD, "ADMIN"),
        ("08-123", PASSWORD, "ADMIN"),
        (ADMIN_PHONE, "short", "ADMIN"),
        (ADMIN_PHONE, PASSWORD, "SUPERUSER"),
        (ADMIN_PHONE, PASSWORD, ""),
    ] {
        let response = register(&app, phone, password, role).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{phone}/{role}");
        assert_eq!(body_json(response).await["error_code"], "INVALID_REQUEST");
    }
}

// ---------------------------------------------------------------------------
// Login, me, logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_rejects_unknown_phone_and_wrong_password_alike(pool: PgPool) {
    let app = build_test_app(pool);
    register(&app, ADMIN_PHONE, PASSWORD, "COURIER").await;

    for response in [
        login(&app, ADMIN_PHONE, "wrong-password").await,
        login(&app, "0800000000", PASSWORD).await,
    ] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error_code"], "INVALID_CREDENTIALS");
        assert_eq!(json["error"], "invalid credentials");
    }

    let response = login(&app, ADMIN_PHONE, "").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_identifies_user_until_logout(pool: PgPool) {
    let app = build_test_app(pool);

    register(&app, ADMIN_PHONE, PASSWORD, "COURIER").await;
    let response = login(&app, ADMIN_PHONE, PASSWORD).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["role"], "COURIER");
    assert_eq!(data["expires_in"], 3600);
    let token = data["access_token"].as_str().unwrap().to_string();

    let response = get_as(app.app(), &token, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await["data"].clone();
    assert_eq!(me["phone"], ADMIN_PHONE);
    assert_eq!(me["role"], "COURIER");
    assert_eq!(me["user_id"], data["user_id"]);

    let response = post_empty_as(app.app(), &token, "/api/v1/auth/logout").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = get_as(app.app(), &token, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error_code"], "INVALID_TOKEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_and_logout_require_a_token(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error_code"], "INVALID_TOKEN");

    let response = post_empty(app.app(), "/api/v1/auth/logout").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_as(app.app(), "garbage", "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Admin guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn registered_admin_reaches_admin_routes_and_courier_does_not(pool: PgPool) {
    let app = build_test_app(pool);
    let admin = access_token(&app, ADMIN_PHONE, "ADMIN").await;
    let courier = access_token(&app, "0877777777", "COURIER").await;

    let response = get_as(app.app(), &admin, "/api/v1/admin/overview").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_as(app.app(), &courier, "/api/v1/admin/overview").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A logged-out admin token no longer opens admin routes.
    post_empty_as(app.app(), &admin, "/api/v1/auth/logout").await;
    let response = get_as(app.app(), &admin, "/api/v1/admin/overview").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
