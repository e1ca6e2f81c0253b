use chrono::{Datelike, NaiveTime, Weekday};
use rclockfill::db::store::FillJobStore;
use rclockfill::errors::AppError;
use rclockfill::models::clock_action::ClockAction;
use rclockfill::models::outcome::FillOutcome;
use rclockfill::models::policy::{FillOptions, FillPolicy};

mod common;
use common::{FakeSubmitter, Reply, cred, date, fill_service, local, memory_store};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_past_workday_is_submitted_in_canonical_order() {
    let submitter = FakeSubmitter::new();
    let store = memory_store();
    let fill = fill_service(submitter.clone(), store.clone(), local(2024, 3, 12, 10, 0));

    let outcome = fill
        .fill_day(&cred("alice"), date(2024, 3, 11), FillPolicy::WorkDay, FillOptions::default())
        .unwrap();

    assert_eq!(outcome, FillOutcome::Completed { submitted: 4, queued: 0 });

    let sent: Vec<(ClockAction, NaiveTime)> = submitter
        .attempts()
        .iter()
        .map(|e| (e.action, e.at.time()))
        .collect();
    assert_eq!(
        sent,
        vec![
            (ClockAction::CheckIn, hm(9, 0)),
            (ClockAction::Break, hm(13, 0)),
            (ClockAction::Return, hm(14, 0)),
            (ClockAction::CheckOut, hm(18, 30)),
        ]
    );
    assert!(submitter.attempts().iter().all(|e| e.jitter));
    assert!(store.list_pending_fill_jobs().unwrap().is_empty());
}

#[test]
fn test_today_is_deferred_once() {
    let submitter = FakeSubmitter::new();
    let store = memory_store();
    let fill = fill_service(submitter.clone(), store.clone(), local(2024, 3, 11, 15, 0));
    let alice = cred("alice");

    let outcome = fill
        .fill_day(&alice, date(2024, 3, 11), FillPolicy::WorkDay, FillOptions::default())
        .unwrap();
    assert_eq!(outcome, FillOutcome::Scheduled);

    let err = fill
        .fill_day(&alice, date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default())
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyScheduled(_)), "got {err}");

    assert_eq!(submitter.attempt_count(), 0);
    let jobs = store.list_pending_fill_jobs().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].policy, FillPolicy::WorkDay);
}

#[test]
fn test_unsupported_day_persists_and_submits_nothing() {
    let submitter = FakeSubmitter::new();
    let store = memory_store();
    // Saturday, filled on the same day.
    let fill = fill_service(submitter.clone(), store.clone(), local(2024, 3, 16, 12, 0));

    let err = fill
        .fill_day(&cred("alice"), date(2024, 3, 16), FillPolicy::WorkDay, FillOptions::default())
        .unwrap_err();

    assert!(matches!(err, AppError::UnsupportedDay(Weekday::Sat)));
    assert_eq!(submitter.attempt_count(), 0);
    assert!(store.list_pending_fill_jobs().unwrap().is_empty());
}

#[test]
fn test_auth_failure_aborts_rest_of_day() {
    let submitter = FakeSubmitter::new();
    let fill = fill_service(submitter.clone(), memory_store(), local(2024, 3, 12, 10, 0));

    submitter.script(&[Reply::Ok, Reply::AuthExpired]);
    let err = fill
        .fill_day(&cred("alice"), date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default())
        .unwrap_err();

    assert!(matches!(err, AppError::AuthExpired));
    assert_eq!(submitter.attempt_count(), 2);
    assert!(fill.queue().is_empty());
}

#[test]
fn test_rate_limited_events_go_to_queue() {
    let submitter = FakeSubmitter::new();
    let fill = fill_service(submitter.clone(), memory_store(), local(2024, 3, 12, 10, 0));

    submitter.script(&[Reply::Ok, Reply::RateLimited]);
    let outcome = fill
        .fill_day(&cred("alice"), date(2024, 3, 11), FillPolicy::AllDay, FillOptions::default())
        .unwrap();

    // Break is throttled, return and check out queue up behind it.
    assert_eq!(outcome, FillOutcome::Completed { submitted: 1, queued: 3 });
    assert_eq!(submitter.attempt_count(), 2);

    let pending: Vec<String> = fill.queue().pending().into_iter().map(|(_, d)| d).collect();
    assert_eq!(
        pending,
        vec![
            "break 2024-03-11 13:00",
            "return 2024-03-11 14:00",
            "check out 2024-03-11 18:00",
        ]
    );
}

#[test]
fn test_range_skips_weekends() {
    let submitter = FakeSubmitter::new();
    let fill = fill_service(submitter.clone(), memory_store(), local(2024, 3, 25, 10, 0));

    // Wednesday to the following Tuesday.
    let report = fill.fill_range(
        &cred("alice"),
        date(2024, 3, 13),
        date(2024, 3, 19),
        FillPolicy::WorkDay,
        FillOptions::default(),
    );

    assert_eq!(report.processed(), 5);
    assert!(report.is_complete());
    assert_eq!(submitter.attempt_count(), 20);
    assert!(
        submitter
            .attempts()
            .iter()
            .all(|e| !matches!(e.at.weekday(), Weekday::Sat | Weekday::Sun))
    );
}

#[test]
fn test_range_bounds_are_swapped_when_inverted() {
    let fill = fill_service(FakeSubmitter::new(), memory_store(), local(2024, 3, 25, 10, 0));

    let report = fill.fill_range(
        &cred("alice"),
        date(2024, 3, 19),
        date(2024, 3, 13),
        FillPolicy::HalfDay,
        FillOptions::default(),
    );

    let days: Vec<_> = report.days.iter().map(|(d, _)| *d).collect();
    assert_eq!(
        days,
        vec![
            date(2024, 3, 13),
            date(2024, 3, 14),
            date(2024, 3, 15),
            date(2024, 3, 18),
            date(2024, 3, 19),
        ]
    );
}

#[test]
fn test_range_continues_after_failed_day() {
    let submitter = FakeSubmitter::new();
    let fill = fill_service(submitter.clone(), memory_store(), local(2024, 3, 25, 10, 0));

    submitter.script(&[Reply::Upstream(500)]);
    let report = fill.fill_range(
        &cred("alice"),
        date(2024, 3, 13),
        date(2024, 3, 15),
        FillPolicy::HalfDay,
        FillOptions::default(),
    );

    assert_eq!(report.processed(), 3);
    assert!(!report.is_complete());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(*failures[0].0, date(2024, 3, 13));
    // First day aborted after one attempt, the other two sent both events.
    assert_eq!(submitter.attempt_count(), 5);
}

#[test]
fn test_range_including_today_defers_it() {
    let submitter = FakeSubmitter::new();
    let store = memory_store();
    let fill = fill_service(submitter.clone(), store.clone(), local(2024, 3, 13, 11, 0));

    let report = fill.fill_range(
        &cred("alice"),
        date(2024, 3, 11),
        date(2024, 3, 13),
        FillPolicy::HalfDay,
        FillOptions::default(),
    );

    assert!(report.is_complete());
    assert_eq!(report.days[2].1, Ok(FillOutcome::Scheduled));
    assert_eq!(submitter.attempt_count(), 4);
    assert_eq!(store.list_pending_fill_jobs().unwrap()[0].target_date, date(2024, 3, 13));
}

#[test]
fn test_clock_rejects_future_times() {
    let submitter = FakeSubmitter::new();
    let fill = fill_service(submitter.clone(), memory_store(), local(2024, 3, 11, 10, 0));

    let err = fill
        .clock(&cred("alice"), ClockAction::CheckOut, date(2024, 3, 11), None)
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidTime(_)));
    assert_eq!(submitter.attempt_count(), 0);
}

#[test]
fn test_clock_jitters_only_default_times() {
    let submitter = FakeSubmitter::new();
    let fill = fill_service(submitter.clone(), memory_store(), local(2024, 3, 11, 19, 0));
    let alice = cred("alice");

    fill.clock(&alice, ClockAction::CheckIn, date(2024, 3, 11), None).unwrap();
    fill.clock(&alice, ClockAction::CheckOut, date(2024, 3, 11), Some(hm(18, 47)))
        .unwrap();

    let attempts = submitter.attempts();
    assert!(attempts[0].jitter);
    assert_eq!(attempts[0].at.time(), hm(9, 0));
    assert!(!attempts[1].jitter);
    assert_eq!(attempts[1].at.time(), hm(18, 47));
}

#[test]
fn test_clock_skips_jitter_that_could_reach_the_future() {
    let submitter = FakeSubmitter::new();
    let alice = cred("alice");

    // Default window is 5 minutes: 09:00 may move up to 09:02:30.
    fill_service(submitter.clone(), memory_store(), local(2024, 3, 11, 9, 1))
        .clock(&alice, ClockAction::CheckIn, date(2024, 3, 11), None)
        .unwrap();
    fill_service(submitter.clone(), memory_store(), local(2024, 3, 11, 9, 3))
        .clock(&alice, ClockAction::CheckIn, date(2024, 3, 11), None)
        .unwrap();

    let attempts = submitter.attempts();
    assert!(!attempts[0].jitter);
    assert!(attempts[1].jitter);
}
