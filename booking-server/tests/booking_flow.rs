//! 预订全流程集成测试 - 内存数据库
//!
//! 覆盖确认路径的关键不变量：幂等重放、并发单胜者、半开区间边界、
//! 容量校验、Hold 消费、取消释放窗口、租户隔离。

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use booking_server::booking::{ConfirmationFinalizer, HoldManager, TableLocks};
use booking_server::db::DbService;
use booking_server::db::models::{DiningTable, DiningTableCreate};
use booking_server::db::repository::{
    BookingRepository, DiningTableRepository, IdempotencyRepository,
};
use shared::request::ConfirmRequest;
use shared::{BookingStatus, ErrorCode};

const NOW: i64 = 1_700_000_000_000;
const HOUR: i64 = 60 * 60 * 1000;
const DAY: i64 = 24 * HOUR;
const MAX_PARTY: i32 = 20;

struct TestEnv {
    bookings: BookingRepository,
    tables: DiningTableRepository,
    holds: Arc<HoldManager>,
    finalizer: ConfirmationFinalizer,
}

async fn setup() -> TestEnv {
    let service = DbService::memory().await.unwrap();
    let bookings = BookingRepository::new(service.db.clone());
    let tables = DiningTableRepository::new(service.db.clone());
    let holds = Arc::new(HoldManager::new(5));
    let finalizer = ConfirmationFinalizer::new(
        bookings.clone(),
        tables.clone(),
        IdempotencyRepository::new(service.db.clone()),
        holds.clone(),
        Arc::new(TableLocks::new()),
        MAX_PARTY,
    );
    TestEnv {
        bookings,
        tables,
        holds,
        finalizer,
    }
}

async fn create_table(env: &TestEnv, tenant: &str, name: &str, capacity: i32, section: &str) -> DiningTable {
    env.tables
        .create(DiningTableCreate {
            tenant_id: tenant.to_string(),
            name: name.to_string(),
            capacity,
            section: section.to_string(),
        })
        .await
        .unwrap()
}

fn dt(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap()
}

fn confirm_req(table_id: &str, party_size: i32, start: i64, end: i64) -> ConfirmRequest {
    ConfirmRequest {
        hold_id: None,
        table_id: Some(table_id.to_string()),
        party_size: Some(party_size),
        start: Some(dt(start)),
        end: Some(dt(end)),
        duration_minutes: None,
        guest_name: "Jane Doe".to_string(),
        guest_email: "jane@example.com".to_string(),
        guest_phone: "+34600123456".to_string(),
        special_requests: None,
    }
}

#[tokio::test]
async fn test_confirm_creates_booking() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let outcome = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 4, start, start + 2 * HOUR), "K1", NOW)
        .await
        .unwrap();

    assert!(!outcome.replayed);
    let booking = outcome.booking;
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.party_size, 4);
    assert_eq!(booking.start, start);
    assert!(booking.confirmation_code.starts_with("BK-"));
}

#[tokio::test]
async fn test_replay_returns_stored_booking_unchanged() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 6, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let first = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 4, start, start + HOUR), "K1", NOW)
        .await
        .unwrap();

    // Same key, different payload: the ledger wins, the payload is ignored
    let mut other = confirm_req(&table_id, 6, start + 3 * HOUR, start + 4 * HOUR);
    other.guest_name = "Someone Else".to_string();
    let second = env.finalizer.confirm("demo", &other, "K1", NOW).await.unwrap();

    assert!(second.replayed);
    assert_eq!(second.booking.id, first.booking.id);
    assert_eq!(second.booking.party_size, 4);
    assert_eq!(second.booking.guest_name, "Jane Doe");
    assert_eq!(second.booking.confirmation_code, first.booking.confirmation_code);
}

#[tokio::test]
async fn test_overlapping_confirm_is_rejected() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    env.finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + 2 * HOUR), "K1", NOW)
        .await
        .unwrap();

    // [start+1h, start+3h) overlaps [start, start+2h)
    let err = env
        .finalizer
        .confirm(
            "demo",
            &confirm_req(&table_id, 2, start + HOUR, start + 3 * HOUR),
            "K2",
            NOW,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationConflict);
}

#[tokio::test]
async fn test_concurrent_confirms_have_single_winner() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let req_a = confirm_req(&table_id, 2, start, start + 2 * HOUR);
    let req_b = confirm_req(&table_id, 3, start + HOUR, start + 3 * HOUR);

    let (a, b) = tokio::join!(
        env.finalizer.confirm("demo", &req_a, "K2", NOW),
        env.finalizer.confirm("demo", &req_b, "K3", NOW),
    );

    let ok_count = [a.is_ok(), b.is_ok()].iter().filter(|v| **v).count();
    assert_eq!(ok_count, 1, "exactly one of two overlapping confirms must win");

    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert_eq!(loser.code, ErrorCode::ReservationConflict);

    // Only the winner's row exists
    let k2 = env.bookings.find_by_idempotency_key("demo", "K2").await.unwrap();
    let k3 = env.bookings.find_by_idempotency_key("demo", "K3").await.unwrap();
    assert_eq!(k2.is_some() as u8 + k3.is_some() as u8, 1);
}

#[tokio::test]
async fn test_touching_windows_both_commit() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    // [10:00, 11:00) then [11:00, 12:00): half-open, no conflict
    let start = NOW + DAY;
    env.finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "K1", NOW)
        .await
        .unwrap();
    let second = env
        .finalizer
        .confirm(
            "demo",
            &confirm_req(&table_id, 2, start + HOUR, start + 2 * HOUR),
            "K2",
            NOW,
        )
        .await
        .unwrap();
    assert!(!second.replayed);
}

#[tokio::test]
async fn test_touching_windows_commit_off_the_quarter_hour() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    // Boundary at :05, then 50-minute sittings sharing it; half-open
    // windows touch without overlapping no matter where the edge falls
    let boundary = NOW + DAY + 5 * 60 * 1000;
    let len = 50 * 60 * 1000;
    env.finalizer
        .confirm("demo", &confirm_req(&table_id, 2, boundary - len, boundary), "K1", NOW)
        .await
        .unwrap();
    let second = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, boundary, boundary + len), "K2", NOW)
        .await
        .unwrap();
    assert!(!second.replayed);
}

#[tokio::test]
async fn test_concurrent_same_key_confirms_converge() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let req = confirm_req(&table_id, 2, start, start + HOUR);

    let (a, b) = tokio::join!(
        env.finalizer.confirm("demo", &req, "K1", NOW),
        env.finalizer.confirm("demo", &req, "K1", NOW),
    );

    // Both callers get the same booking; exactly one created it
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.booking.id, b.booking.id);
    assert_eq!(
        [a.replayed, b.replayed].iter().filter(|v| **v).count(),
        1,
        "one creation, one replay"
    );
}

#[tokio::test]
async fn test_capacity_exceeded_is_rejected_before_write() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let err = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 6, start, start + HOUR), "K1", NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // Nothing written, the key stays available
    assert!(env.bookings.find_by_idempotency_key("demo", "K1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_past_start_is_rejected() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let err = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, NOW - HOUR, NOW + HOUR), "K1", NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationPastTime);
}

#[tokio::test]
async fn test_empty_idempotency_key_is_rejected() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let err = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "  ", NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingIdempotencyKey);
}

#[tokio::test]
async fn test_hold_is_consumed_by_confirm() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let hold = env.holds.create("demo", &table_id, 3, start, start + HOUR, "K1", NOW);

    let mut req = confirm_req(&table_id, 2, 0, 0);
    req.hold_id = Some(hold.id.clone());
    req.table_id = None;
    req.party_size = None;
    req.start = None;
    req.end = None;

    let outcome = env.finalizer.confirm("demo", &req, "K1", NOW).await.unwrap();

    // The slot comes from the hold, not the request body
    assert_eq!(outcome.booking.party_size, 3);
    assert_eq!(outcome.booking.start, start);
    assert!(env.holds.get_valid("demo", &hold.id, NOW).is_none());
}

#[tokio::test]
async fn test_expired_hold_is_gone() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let hold = env.holds.create("demo", &table_id, 3, start, start + HOUR, "K1", NOW);

    let mut req = confirm_req(&table_id, 2, 0, 0);
    req.hold_id = Some(hold.id);
    req.table_id = None;

    // 6 minutes later, past the 5-minute TTL
    let err = env
        .finalizer
        .confirm("demo", &req, "K1", NOW + 6 * 60 * 1000)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_cancellation_releases_the_window() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let outcome = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "K1", NOW)
        .await
        .unwrap();
    let booking_id = outcome.booking.id.unwrap();

    let cancelled = env
        .bookings
        .release("demo", &booking_id, BookingStatus::Cancelled, NOW)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // The same window can be booked again under a fresh key
    let rebooked = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "K2", NOW)
        .await
        .unwrap();
    assert!(!rebooked.replayed);
}

#[tokio::test]
async fn test_reschedule_reruns_the_conflict_check() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_record = table.id.clone().unwrap();
    let table_id = table_record.to_string();

    let start = NOW + DAY;
    env.finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "K1", NOW)
        .await
        .unwrap();
    let second = env
        .finalizer
        .confirm(
            "demo",
            &confirm_req(&table_id, 2, start + 2 * HOUR, start + 3 * HOUR),
            "K2",
            NOW,
        )
        .await
        .unwrap();
    let second_id = second.booking.id.unwrap();

    // Moving the second booking onto the first must fail
    let err = env
        .bookings
        .reschedule(
            "demo",
            &second_id,
            &table_record,
            start + HOUR / 2,
            start + HOUR + HOUR / 2,
            BookingStatus::Confirmed,
            NOW,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        booking_server::db::repository::RepoError::Conflict(_)
    ));
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let outcome = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "K1", NOW)
        .await
        .unwrap();
    let booking_id = outcome.booking.id.unwrap().to_string();

    // Another tenant cannot see the booking or book on the foreign table
    assert!(env.bookings.find_by_id("other", &booking_id).await.unwrap().is_none());
    let err = env
        .finalizer
        .confirm(
            "other",
            &confirm_req(&table_id, 2, start + 2 * HOUR, start + 3 * HOUR),
            "K1",
            NOW,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_find_for_day_filters_and_orders() {
    let env = setup().await;
    let patio = create_table(&env, "demo", "P1", 4, "patio").await;
    let main = create_table(&env, "demo", "M1", 4, "main").await;
    let patio_id = patio.id.unwrap().to_string();
    let main_id = main.id.unwrap().to_string();

    let day = NOW + DAY;
    env.finalizer
        .confirm("demo", &confirm_req(&main_id, 2, day + 2 * HOUR, day + 3 * HOUR), "K1", NOW)
        .await
        .unwrap();
    env.finalizer
        .confirm("demo", &confirm_req(&patio_id, 2, day + HOUR, day + 2 * HOUR), "K2", NOW)
        .await
        .unwrap();

    let all = env
        .bookings
        .find_for_day("demo", day, day + DAY, None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].start <= all[1].start, "results ordered by start");

    let patio_only = env
        .bookings
        .find_for_day("demo", day, day + DAY, Some("patio".to_string()), None)
        .await
        .unwrap();
    assert_eq!(patio_only.len(), 1);
    assert_eq!(patio_only[0].start, day + HOUR);

    let cancelled = env
        .bookings
        .find_for_day("demo", day, day + DAY, None, Some(BookingStatus::Cancelled))
        .await
        .unwrap();
    assert!(cancelled.is_empty());
}

#[tokio::test]
async fn test_ranking_prefers_snug_tables_and_skips_busy_ones() {
    let env = setup().await;
    let small = create_table(&env, "demo", "S", 2, "main").await;
    let medium = create_table(&env, "demo", "M", 4, "main").await;
    let large = create_table(&env, "demo", "L", 8, "main").await;
    let medium_id = medium.id.clone().unwrap();

    let start = NOW + DAY;
    // Occupy the medium table for the window
    env.finalizer
        .confirm(
            "demo",
            &confirm_req(&medium_id.to_string(), 2, start, start + 2 * HOUR),
            "K1",
            NOW,
        )
        .await
        .unwrap();

    let ranker = booking_server::AvailabilityRanker::new(
        env.tables.clone(),
        booking_server::ConflictDetector::new(env.bookings.clone()),
    );
    let ranked = ranker.rank("demo", 4, start, start + HOUR).await.unwrap();

    // Small lacks capacity, medium is booked; only large remains
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].table.id, large.id);
    assert_eq!(ranked[0].score, 100);
    assert!(small.capacity < 4);
}

#[tokio::test]
async fn test_rocksdb_backend_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let service = DbService::new(dir.path().join("booking.db").to_str().unwrap())
        .await
        .unwrap();
    let tables = DiningTableRepository::new(service.db.clone());
    let bookings = BookingRepository::new(service.db.clone());
    let finalizer = ConfirmationFinalizer::new(
        bookings.clone(),
        tables.clone(),
        IdempotencyRepository::new(service.db.clone()),
        Arc::new(HoldManager::new(5)),
        Arc::new(TableLocks::new()),
        MAX_PARTY,
    );

    let table = tables
        .create(DiningTableCreate {
            tenant_id: "demo".to_string(),
            name: "T1".to_string(),
            capacity: 4,
            section: "main".to_string(),
        })
        .await
        .unwrap();
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let outcome = finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + HOUR), "K1", NOW)
        .await
        .unwrap();
    let read_back = bookings
        .find_by_id("demo", &outcome.booking.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read_back.confirmation_code, outcome.booking.confirmation_code);
}

#[tokio::test]
async fn test_duration_minutes_derives_the_end() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let mut req = confirm_req(&table_id, 2, start, 0);
    req.end = None;
    req.duration_minutes = Some(90);

    let outcome = env.finalizer.confirm("demo", &req, "K1", NOW).await.unwrap();
    assert_eq!(outcome.booking.end, start + 90 * 60 * 1000);
}

#[tokio::test]
async fn test_huge_duration_is_rejected() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let mut req = confirm_req(&table_id, 2, start, 0);
    req.end = None;
    req.duration_minutes = Some(i64::MAX);

    let err = env.finalizer.confirm("demo", &req, "K1", NOW).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationInvalidTime);
}

#[tokio::test]
async fn test_overlong_window_is_rejected() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let err = env
        .finalizer
        .confirm("demo", &confirm_req(&table_id, 2, start, start + 13 * HOUR), "K1", NOW)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationInvalidTime);
}

#[tokio::test]
async fn test_hold_must_match_the_confirm_key() {
    let env = setup().await;
    let table = create_table(&env, "demo", "T1", 4, "main").await;
    let table_id = table.id.unwrap().to_string();

    let start = NOW + DAY;
    let hold = env.holds.create("demo", &table_id, 3, start, start + HOUR, "K1", NOW);

    let mut req = confirm_req(&table_id, 2, 0, 0);
    req.hold_id = Some(hold.id.clone());
    req.table_id = None;

    // Confirming someone else's hold under a different key is rejected,
    // and the hold survives for its owner
    let err = env.finalizer.confirm("demo", &req, "K2", NOW).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(env.holds.get_valid("demo", &hold.id, NOW).is_some());

    let outcome = env.finalizer.confirm("demo", &req, "K1", NOW).await.unwrap();
    assert_eq!(outcome.booking.party_size, 3);
}
