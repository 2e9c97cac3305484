//! Integration tests for parcel, event and OTP persistence.

use chrono::{Duration, Utc};
use locker_core::codes::{generate_parcel_code, generate_pickup_code};
use locker_core::compartment::CompartmentSize;
use locker_core::otp::hash_otp_code;
use locker_core::parcel::ParcelLifecycle;
use locker_core::status::{OtpStatus, ParcelStatus};
use locker_core::types::DbId;
use locker_db::models::compartment::CreateCompartment;
use locker_db::models::location::CreateLocation;
use locker_db::models::locker::CreateLocker;
use locker_db::models::otp::NewOtp;
use locker_db::models::parcel::NewParcel;
use locker_db::repositories::{
    CompartmentRepo, LocationRepo, LockerRepo, OtpRepo, ParcelEventRepo, ParcelRepo,
};
use sqlx::PgPool;

const RECEIVER: &str = "0812345678";
const SENDER: &str = "0898765432";

async fn seed_locker(pool: &PgPool) -> DbId {
    let location = LocationRepo::create(
        pool,
        &CreateLocation {
            code: "LOC-P".to_string(),
            name: "Mall".to_string(),
            address: Some("1 Main St".to_string()),
        },
    )
    .await
    .unwrap();
    LockerRepo::create(
        pool,
        &CreateLocker {
            location_id: location.id,
            locker_code: "LK-P".to_string(),
            name: Some("Mall east".to_string()),
            status: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Add `count` small compartments to the locker and return their ids.
async fn seed_compartments(pool: &PgPool, locker_id: DbId, count: i32) -> Vec<DbId> {
    let inputs: Vec<CreateCompartment> = (1..=count)
        .map(|no| CreateCompartment {
            compartment_no: no,
            size: CompartmentSize::S,
            overdue_fee_per_day: 0,
        })
        .collect();
    let mut conn = pool.acquire().await.unwrap();
    CompartmentRepo::create_bulk(&mut conn, locker_id, &inputs)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect()
}

fn new_parcel(locker_id: DbId, lifecycle: ParcelLifecycle) -> NewParcel {
    NewParcel {
        id: DbId::new_v4(),
        parcel_code: generate_parcel_code(),
        locker_id,
        size: CompartmentSize::S,
        sender_phone: SENDER.to_string(),
        receiver_phone: RECEIVER.to_string(),
        pickup_code: Some(generate_pickup_code()),
        lifecycle,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lifecycle_fields_round_trip(pool: PgPool) {
    let locker_id = seed_locker(&pool).await;
    let parcel = ParcelRepo::create(&pool, &new_parcel(locker_id, ParcelLifecycle::new()))
        .await
        .unwrap();
    assert_eq!(parcel.status, ParcelStatus::Created);
    assert!(parcel.pickup_code.as_deref().unwrap().starts_with("PU-"));

    let now = Utc::now();
    let cancelled = parcel.lifecycle().cancel().unwrap();
    let mut tx = pool.begin().await.unwrap();
    let locked = ParcelRepo::find_by_id_for_update(&mut tx, parcel.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(locked.id, parcel.id);
    let updated = ParcelRepo::update_lifecycle(&mut tx, parcel.id, &cancelled)
        .await
        .unwrap();
    ParcelEventRepo::append(&mut *tx, parcel.id, updated.status)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let stored = ParcelRepo::find_by_id(&pool, parcel.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ParcelStatus::Cancelled);
    assert!(stored.updated_at >= now - Duration::seconds(5));

    let events = ParcelEventRepo::list_by_parcel(&pool, parcel.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "CANCELLED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ready_listing_matches_receiver_or_sender(pool: PgPool) {
    let locker_id = seed_locker(&pool).await;
    let compartments = seed_compartments(&pool, locker_id, 1).await;
    let now = Utc::now();
    let ready = ParcelLifecycle::deposited(compartments[0], now, Duration::hours(72));

    ParcelRepo::create(&pool, &new_parcel(locker_id, ready)).await.unwrap();
    ParcelRepo::create(&pool, &new_parcel(locker_id, ParcelLifecycle::new()))
        .await
        .unwrap();

    assert_eq!(ParcelRepo::list_ready_by_phone(&pool, RECEIVER).await.unwrap().len(), 1);
    assert_eq!(ParcelRepo::list_ready_by_phone(&pool, SENDER).await.unwrap().len(), 1);
    assert!(ParcelRepo::list_ready_by_phone(&pool, "0800000000")
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn due_for_expiry_includes_deadline_boundary(pool: PgPool) {
    let locker_id = seed_locker(&pool).await;
    let compartments = seed_compartments(&pool, locker_id, 3).await;
    let now = Utc::now();

    let overdue = ParcelRepo::create(
        &pool,
        &new_parcel(
            locker_id,
            ParcelLifecycle::deposited(compartments[0], now - Duration::hours(80), Duration::hours(72)),
        ),
    )
    .await
    .unwrap();
    let boundary_lifecycle =
        ParcelLifecycle::deposited(compartments[1], now - Duration::hours(72), Duration::hours(72));
    let boundary = ParcelRepo::create(&pool, &new_parcel(locker_id, boundary_lifecycle))
        .await
        .unwrap();
    ParcelRepo::create(
        &pool,
        &new_parcel(locker_id, ParcelLifecycle::deposited(compartments[2], now, Duration::hours(72))),
    )
    .await
    .unwrap();

    let due = ParcelRepo::list_due_for_expiry(&pool, now, &[], 100).await.unwrap();
    assert_eq!(due, vec![overdue.id, boundary.id]);

    let first_page = ParcelRepo::list_due_for_expiry(&pool, now, &[], 1).await.unwrap();
    assert_eq!(first_page, vec![overdue.id]);
    let without_overdue = ParcelRepo::list_due_for_expiry(&pool, now, &[overdue.id], 100)
        .await
        .unwrap();
    assert_eq!(without_overdue, vec![boundary.id]);

    assert_eq!(
        ParcelRepo::count_by_status(&pool, &[ParcelStatus::PickupReady])
            .await
            .unwrap(),
        3
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn otp_lookup_is_scoped_to_phone_and_expired_in_bulk(pool: PgPool) {
    let locker_id = seed_locker(&pool).await;
    let compartments = seed_compartments(&pool, locker_id, 1).await;
    let now = Utc::now();
    let parcel = ParcelRepo::create(
        &pool,
        &new_parcel(locker_id, ParcelLifecycle::deposited(compartments[0], now, Duration::hours(72))),
    )
    .await
    .unwrap();

    let otp = OtpRepo::create(
        &pool,
        &NewOtp {
            phone: RECEIVER.to_string(),
            parcel_id: Some(parcel.id),
            otp_ref: DbId::new_v4().to_string(),
            otp_hash: hash_otp_code("123456"),
            expires_at: now + Duration::minutes(5),
        },
    )
    .await
    .unwrap();
    assert_eq!(otp.status, OtpStatus::Active);

    let mut tx = pool.begin().await.unwrap();
    assert!(OtpRepo::find_by_ref_for_update(&mut tx, SENDER, &otp.otp_ref)
        .await
        .unwrap()
        .is_none());
    assert!(OtpRepo::find_by_ref_for_update(&mut tx, RECEIVER, &otp.otp_ref)
        .await
        .unwrap()
        .is_some());

    let expired = OtpRepo::expire_active_by_parcel(&mut tx, parcel.id).await.unwrap();
    assert_eq!(expired, 1);
    let again = OtpRepo::expire_active_by_parcel(&mut tx, parcel.id).await.unwrap();
    assert_eq!(again, 0);
    tx.commit().await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_parcel_code_is_rejected(pool: PgPool) {
    let locker_id = seed_locker(&pool).await;
    let first = new_parcel(locker_id, ParcelLifecycle::new());
    ParcelRepo::create(&pool, &first).await.unwrap();

    let mut clash = new_parcel(locker_id, ParcelLifecycle::new());
    clash.parcel_code = first.parcel_code.clone();
    let err = ParcelRepo::create(&pool, &clash).await.unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|db| db.constraint()),
        Some("uq_parcels_parcel_code")
    );
}
