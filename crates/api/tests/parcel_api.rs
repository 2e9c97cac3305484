//! HTTP-level integration tests for the `/parcels` endpoints.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, build_test_app, get, parcel_body, post_empty, post_json, seed_locker};
use locker_api::error::AppError;
use locker_api::services::{compartments, parcels};
use locker_core::compartment::CompartmentSize;
use locker_core::error::CoreError;
use locker_core::status::{CompartmentStatus, LockerStatus};
use locker_core::types::DbId;
use locker_db::models::parcel::CreateParcel;
use locker_db::repositories::{CompartmentRepo, LockerRepo};
use sqlx::PgPool;

use CompartmentSize::{L, M, S};

// ---------------------------------------------------------------------------
// One-shot deposit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_allocates_smallest_fitting_compartment(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, L, 0), (2, S, 0), (3, M, 0)]).await;
    let app = build_test_app(pool);

    let response = post_json(app.app(), "/api/v1/parcels/deposit", parcel_body(locker_id, "M")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["status"], "PICKUP_READY");
    assert_eq!(data["compartment_no"], 3);
    assert_eq!(data["compartment_size"], "M");
    assert!(data["parcel_code"].as_str().unwrap().starts_with("PR-"));
    assert!(data["pickup_code"].as_str().unwrap().starts_with("PU-"));
    assert!(data["expires_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_falls_back_to_larger_size(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0), (2, L, 0)]).await;
    let app = build_test_app(pool);

    let response = post_json(app.app(), "/api/v1/parcels/deposit", parcel_body(locker_id, "M")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["compartment_size"], "L");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_without_space_returns_409(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    let app = build_test_app(pool);

    let response = post_json(app.app(), "/api/v1/parcels/deposit", parcel_body(locker_id, "L")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error_code"], "NO_AVAILABLE_COMPARTMENT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_deposits_share_one_compartment_at_most_once(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    let input = CreateParcel {
        locker_id,
        size: S,
        sender_phone: common::SENDER.to_string(),
        receiver_phone: common::RECEIVER.to_string(),
    };
    let now = Utc::now();
    let window = Duration::hours(72);

    let (first, second) = futures::join!(
        parcels::deposit(&pool, &input, now, window),
        parcels::deposit(&pool, &input, now, window),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let failure = results.into_iter().find(|r| r.is_err()).unwrap();
    assert_matches!(failure, Err(AppError::Core(CoreError::NoAvailableCompartment)));

    assert_eq!(
        CompartmentRepo::count_by_status(&pool, &[CompartmentStatus::Occupied])
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_deposit_does_not_hold_up_another_into_same_locker(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0), (2, S, 0)]).await;

    // Same locks an in-flight deposit holds before it commits.
    let mut in_flight = pool.begin().await.unwrap();
    parcels::share_active_locker(&mut in_flight, locker_id)
        .await
        .unwrap();
    compartments::allocate(&mut in_flight, locker_id, S, DbId::new_v4())
        .await
        .unwrap();

    let input = CreateParcel {
        locker_id,
        size: S,
        sender_phone: common::SENDER.to_string(),
        receiver_phone: common::RECEIVER.to_string(),
    };
    let second = tokio::time::timeout(
        std::time::Duration::from_secs(3),
        parcels::deposit(&pool, &input, Utc::now(), Duration::hours(72)),
    )
    .await
    .expect("second deposit must not wait on the open transaction");
    assert_eq!(second.unwrap().compartment_no, 2);

    in_flight.rollback().await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locker_status_change_waits_for_open_deposit(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;

    let mut in_flight = pool.begin().await.unwrap();
    parcels::share_active_locker(&mut in_flight, locker_id)
        .await
        .unwrap();

    let blocked = tokio::time::timeout(
        std::time::Duration::from_millis(500),
        LockerRepo::update_status(&pool, locker_id, LockerStatus::Maintenance),
    )
    .await;
    assert!(blocked.is_err(), "status change must wait for the deposit");

    in_flight.commit().await.unwrap();
    let updated = LockerRepo::update_status(&pool, locker_id, LockerStatus::Maintenance)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, LockerStatus::Maintenance);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_into_inactive_locker_is_rejected(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    LockerRepo::update_status(&pool, locker_id, LockerStatus::Maintenance)
        .await
        .unwrap();
    let app = build_test_app(pool);

    let response = post_json(app.app(), "/api/v1/parcels/deposit", parcel_body(locker_id, "S")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error_code"], "LOCKER_INACTIVE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_validates_request(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    let app = build_test_app(pool);

    let mut body = parcel_body(locker_id, "S");
    body["receiver_phone"] = "12ab".into();
    let response = post_json(app.app(), "/api/v1/parcels/deposit", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "INVALID_REQUEST");
    assert_eq!(json["error"], "invalid receiver_phone format");

    let response = post_json(app.app(), "/api/v1/parcels/deposit", parcel_body(locker_id, "XL")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "INVALID_REQUEST");

    let response = post_json(
        app.app(),
        "/api/v1/parcels/deposit",
        parcel_body(DbId::new_v4(), "S"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error_code"], "LOCKER_NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Step-by-step lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn step_by_step_lifecycle_records_every_event(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, M, 0)]).await;
    let app = build_test_app(pool.clone());

    let response = post_json(app.app(), "/api/v1/parcels", parcel_body(locker_id, "S")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "CREATED");
    assert!(created["data"]["pickup_code"].as_str().unwrap().starts_with("PU-"));
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let reserved = body_json(post_empty(app.app(), &format!("/api/v1/parcels/{id}/reserve")).await).await;
    assert_eq!(reserved["data"]["status"], "RESERVED");
    assert!(reserved["data"]["compartment_id"].is_string());
    assert!(reserved["data"]["reserved_at"].is_string());

    let stored = body_json(post_empty(app.app(), &format!("/api/v1/parcels/{id}/store")).await).await;
    assert_eq!(stored["data"]["status"], "STORED");
    assert!(stored["data"]["deposited_at"].is_string());

    let ready = body_json(post_empty(app.app(), &format!("/api/v1/parcels/{id}/ready")).await).await;
    assert_eq!(ready["data"]["status"], "PICKUP_READY");
    assert!(ready["data"]["expires_at"].is_string());

    let fetched = body_json(get(app.app(), &format!("/api/v1/parcels/{id}")).await).await;
    assert_eq!(fetched["data"]["status"], "PICKUP_READY");
    assert!(fetched["data"].get("pickup_code").is_none());

    let events = body_json(get(app.app(), &format!("/api/v1/parcels/{id}/events")).await).await;
    let types: Vec<&str> = events["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["CREATED", "RESERVED", "STORED", "PICKUP_READY"]);

    assert_eq!(
        CompartmentRepo::count_by_status(&pool, &[CompartmentStatus::Occupied])
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_order_transition_is_rejected_without_changes(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    let app = build_test_app(pool);

    let created = body_json(post_json(app.app(), "/api/v1/parcels", parcel_body(locker_id, "S")).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = post_empty(app.app(), &format!("/api/v1/parcels/{id}/store")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], "INVALID_STATUS_TRANSITION");
    assert_eq!(json["error"], "invalid status transition from CREATED to STORED");

    let fetched = body_json(get(app.app(), &format!("/api/v1/parcels/{id}")).await).await;
    assert_eq!(fetched["data"]["status"], "CREATED");
    assert!(fetched["data"]["deposited_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ready_accepts_future_deadline_and_rejects_past(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    let app = build_test_app(pool);

    let created = body_json(post_json(app.app(), "/api/v1/parcels", parcel_body(locker_id, "S")).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    post_empty(app.app(), &format!("/api/v1/parcels/{id}/reserve")).await;
    post_empty(app.app(), &format!("/api/v1/parcels/{id}/store")).await;

    let past = Utc::now() - Duration::hours(1);
    let response = post_json(
        app.app(),
        &format!("/api/v1/parcels/{id}/ready"),
        serde_json::json!({ "expires_at": past }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let deadline = (Utc::now() + Duration::hours(5)).to_rfc3339();
    let response = post_json(
        app.app(),
        &format!("/api/v1/parcels/{id}/ready"),
        serde_json::json!({ "expires_at": deadline }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let stored: chrono::DateTime<Utc> = json["data"]["expires_at"].as_str().unwrap().parse().unwrap();
    let wanted: chrono::DateTime<Utc> = deadline.parse().unwrap();
    assert_eq!(stored.timestamp(), wanted.timestamp());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_releases_reserved_compartment(pool: PgPool) {
    let locker_id = seed_locker(&pool, "A", &[(1, S, 0)]).await;
    let app = build_test_app(pool.clone());

    let created = body_json(post_json(app.app(), "/api/v1/parcels", parcel_body(locker_id, "S")).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    post_empty(app.app(), &format!("/api/v1/parcels/{id}/reserve")).await;

    let response = post_empty(app.app(), &format!("/api/v1/parcels/{id}/cancel")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "CANCELLED");

    assert_eq!(
        CompartmentRepo::count_by_status(&pool, &[CompartmentStatus::Available])
            .await
            .unwrap(),
        1
    );

    // Terminal: a second cancel is a transition error.
    let response = post_empty(app.app(), &format!("/api/v1/parcels/{id}/cancel")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error_code"], "INVALID_STATUS_TRANSITION");
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_and_unknown_ids(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app.app(), "/api/v1/parcels/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_code"], "INVALID_UUID");

    let missing = DbId::new_v4();
    let response = get(app.app(), &format!("/api/v1/parcels/{missing}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error_code"], "PARCEL_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_body_returns_invalid_request(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app.app(), "/api/v1/parcels", serde_json::json!({ "size": "S" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error_code"], "INVALID_REQUEST");
}
