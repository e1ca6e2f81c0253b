use chrono::Duration;
use rclockfill::core::deferred::DeferredFills;
use rclockfill::db::store::{FillJobStore, SqliteStore};
use rclockfill::errors::AppError;
use rclockfill::models::outcome::Deferral;
use rclockfill::models::policy::{FillOptions, FillPolicy};
use std::sync::Arc;

mod common;
use common::{cred, date, local, memory_store, setup_test_db};

fn deferred(store: Arc<SqliteStore>) -> DeferredFills {
    DeferredFills::new(store, Duration::hours(24))
}

#[test]
fn test_other_days_are_not_deferred() {
    let store = memory_store();
    let d = deferred(store.clone());
    let now = local(2024, 3, 11, 15, 0);

    for day in [date(2024, 3, 10), date(2024, 3, 12)] {
        let res = d
            .schedule_if_today(&cred("alice"), day, FillPolicy::AllDay, FillOptions::default(), now)
            .unwrap();
        assert_eq!(res, Deferral::Immediate);
    }
    assert!(store.list_pending_fill_jobs().unwrap().is_empty());
}

#[test]
fn test_today_is_persisted_with_its_parameters() {
    let store = memory_store();
    let d = deferred(store.clone());
    let now = local(2024, 3, 11, 15, 0);

    let res = d
        .schedule_if_today(
            &cred("alice"),
            date(2024, 3, 11),
            FillPolicy::WorkDay,
            FillOptions::start_early(),
            now,
        )
        .unwrap();
    assert_eq!(res, Deferral::Scheduled);

    let jobs = d.pending().unwrap();
    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert!(job.id > 0);
    assert_eq!(job.owner(), "alice");
    assert_eq!(job.credential.token, "token-alice");
    assert_eq!(job.target_date, date(2024, 3, 11));
    assert_eq!(job.policy, FillPolicy::WorkDay);
    assert!(job.options.start_early);
    assert_eq!(job.created_at, now);
}

#[test]
fn test_second_job_for_same_user_is_rejected() {
    let store = memory_store();
    let d = deferred(store.clone());
    let now = local(2024, 3, 11, 15, 0);

    d.schedule_if_today(&cred("alice"), date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default(), now)
        .unwrap();
    let err = d
        .schedule_if_today(&cred("alice"), date(2024, 3, 11), FillPolicy::HalfDay, FillOptions::default(), now)
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyScheduled(ref u) if u == "alice"), "got {err}");

    // Other users are independent.
    d.schedule_if_today(&cred("bob"), date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default(), now)
        .unwrap();
    assert_eq!(store.list_pending_fill_jobs().unwrap().len(), 2);

    // Once cleared, the user may schedule again.
    assert_eq!(store.clear_all_pending_fill_jobs().unwrap(), 2);
    d.schedule_if_today(&cred("alice"), date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default(), now)
        .unwrap();
}

#[test]
fn test_expiring_credential_is_rejected() {
    let store = memory_store();
    let d = deferred(store.clone());
    let now = local(2024, 3, 11, 15, 0);

    let expiring = cred("alice").with_expiry(now + Duration::hours(6));
    let err = d
        .schedule_if_today(&expiring, date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default(), now)
        .unwrap_err();
    assert!(matches!(err, AppError::CredentialExpiringSoon { .. }), "got {err}");
    assert!(store.list_pending_fill_jobs().unwrap().is_empty());

    let fresh = cred("alice").with_expiry(now + Duration::days(7));
    let res = d
        .schedule_if_today(&fresh, date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default(), now)
        .unwrap();
    assert_eq!(res, Deferral::Scheduled);
    assert_eq!(d.pending().unwrap()[0].credential.expires_at, fresh.expires_at);
}

#[test]
fn test_jobs_survive_restart() {
    let db_path = setup_test_db("deferred_restart");
    let now = local(2024, 3, 11, 15, 0);

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        deferred(store)
            .schedule_if_today(&cred("alice"), date(2024, 3, 11), FillPolicy::HalfDay, FillOptions::default(), now)
            .unwrap();
    }

    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let jobs = store.list_pending_fill_jobs().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].policy, FillPolicy::HalfDay);

    // The uniqueness rule holds across processes too.
    let err = deferred(store)
        .schedule_if_today(&cred("alice"), date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default(), now)
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyScheduled(_)));
}
