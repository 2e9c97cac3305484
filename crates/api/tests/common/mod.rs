#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use locker_api::auth::jwt::{generate_access_token, JwtConfig};
use locker_api::config::ServerConfig;
use locker_api::handlers::pickup::PICKUP_TOKEN_HEADER;
use locker_api::notifications::{NotifyError, OtpNotifier};
use locker_api::router::build_app_router;
use locker_api::state::AppState;
use locker_core::compartment::CompartmentSize;
use locker_core::roles::UserRole;
use locker_core::types::DbId;
use locker_db::models::compartment::CreateCompartment;
use locker_db::models::location::CreateLocation;
use locker_db::models::locker::CreateLocker;
use locker_db::repositories::{CompartmentRepo, LocationRepo, LockerRepo};

pub const SENDER: &str = "0811111111";
pub const RECEIVER: &str = "0822222222";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        otp_ttl_secs: 300,
        otp_request_window_secs: 30,
        pickup_token_ttl_secs: 900,
        parcel_pickup_window_hours: 72,
        expiry_sweep_interval_secs: 60,
        otp_webhook_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Notifier that keeps every sent code so tests can complete the OTP flow.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// The most recent code sent to `phone`.
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl OtpNotifier for RecordingNotifier {
    async fn send_otp(&self, phone: &str, code: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string()));
        Ok(())
    }
}

/// Router plus the pieces of state tests need to reach into.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    /// Bearer token for a synthetic `ADMIN` user.
    pub admin_token: String,
}

impl TestApp {
    /// A fresh handle on the router; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with the production middleware stack
/// and a recording notifier.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let notifier = Arc::new(RecordingNotifier::default());

    let mut state = AppState::new(pool, config.clone());
    state.notifier = Arc::clone(&notifier) as Arc<dyn OtpNotifier>;

    let admin_token = token_for(&config, UserRole::Admin);
    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        notifier,
        admin_token,
    }
}

/// A valid access token for a user that need not exist in the database.
pub fn token_for(config: &ServerConfig, role: UserRole) -> String {
    generate_access_token(DbId::new_v4(), role, &config.jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(PICKUP_TOKEN_HEADER, token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// Bearer-authenticated variants.

pub async fn get_as(app: Router, bearer: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {bearer}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty_as(app: Router, bearer: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {bearer}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_as(app: Router, bearer: &str, uri: &str, body: serde_json::Value) -> Response {
    let auth = format!("Bearer {bearer}");
    send_json(app, Method::POST, uri, body, Some((AUTHORIZATION.as_str(), &auth))).await
}

pub async fn patch_json_as(app: Router, bearer: &str, uri: &str, body: serde_json::Value) -> Response {
    let auth = format!("Bearer {bearer}");
    send_json(app, Method::PATCH, uri, body, Some((AUTHORIZATION.as_str(), &auth))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body, None).await
}

pub async fn post_json_with_token(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send_json(app, Method::POST, uri, body, Some((PICKUP_TOKEN_HEADER, token))).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body, None).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    header: Option<(&str, &str)>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Create an ACTIVE locker with the given compartments. Codes are derived
/// from `code` so one test can seed several lockers.
pub async fn seed_locker(
    pool: &PgPool,
    code: &str,
    compartments: &[(i32, CompartmentSize, i64)],
) -> DbId {
    let location = LocationRepo::create(
        pool,
        &CreateLocation {
            code: format!("LOC-{code}"),
            name: format!("Location {code}"),
            address: None,
        },
    )
    .await
    .unwrap();

    let locker = LockerRepo::create(
        pool,
        &CreateLocker {
            location_id: location.id,
            locker_code: format!("LK-{code}"),
            name: None,
            status: None,
        },
    )
    .await
    .unwrap();

    let inputs: Vec<CreateCompartment> = compartments
        .iter()
        .map(|(no, size, fee)| CreateCompartment {
            compartment_no: *no,
            size: *size,
            overdue_fee_per_day: *fee,
        })
        .collect();

    let mut conn = pool.acquire().await.unwrap();
    CompartmentRepo::create_bulk(&mut conn, locker.id, &inputs)
        .await
        .unwrap();

    locker.id
}

/// JSON body for a deposit or create request.
pub fn parcel_body(locker_id: DbId, size: &str) -> serde_json::Value {
    serde_json::json!({
        "locker_id": locker_id,
        "size": size,
        "sender_phone": SENDER,
        "receiver_phone": RECEIVER,
    })
}
