//! Day / range scheduler.
//!
//! Turns a fill request into policy events and hands them, in canonical
//! order, to the retry queue. Fills of the current day are deferred to the
//! nightly cutover instead.

use crate::config::Config;
use crate::core::deferred::DeferredFills;
use crate::core::retry_queue::RetryQueue;
use crate::core::schedule::{compute_events, single_event};
use crate::db::store::FillJobStore;
use crate::errors::{AppError, AppResult};
use crate::models::clock_action::ClockAction;
use crate::models::credential::Credential;
use crate::models::event::{ClockEvent, PlannedEvent};
use crate::models::outcome::{Deferral, FillOutcome, RangeReport};
use crate::models::policy::{FillOptions, FillPolicy};
use crate::utils::date::weekdays_between;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use log::{debug, info, warn};
use std::sync::Arc;

pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub struct FillService {
    queue: Arc<RetryQueue>,
    deferred: DeferredFills,
    clock: Clock,
    jitter_window: Duration,
}

impl FillService {
    pub fn new(queue: Arc<RetryQueue>, store: Arc<dyn FillJobStore>, cfg: &Config) -> Self {
        Self {
            queue,
            deferred: DeferredFills::new(store, cfg.credential_margin()),
            clock: Arc::new(Local::now),
            jitter_window: cfg.jitter_window(),
        }
    }

    /// Replace the wall clock (tests, replays).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    pub fn queue(&self) -> &Arc<RetryQueue> {
        &self.queue
    }

    pub fn deferred(&self) -> &DeferredFills {
        &self.deferred
    }

    /// Fill one day: deferred if it is today, submitted now otherwise.
    pub fn fill_day(
        &self,
        credential: &Credential,
        date: NaiveDate,
        policy: FillPolicy,
        options: FillOptions,
    ) -> AppResult<FillOutcome> {
        // Reject unsupported days before anything gets persisted.
        let events = compute_events(policy, date, options)?;

        let deferral =
            self.deferred
                .schedule_if_today(credential, date, policy, options, self.now())?;
        if deferral == Deferral::Scheduled {
            return Ok(FillOutcome::Scheduled);
        }

        let outcome = self.submit_events(credential, &events)?;
        info!("filled {} ({}) for {}", date, policy, credential.user_id);
        self.deferred.store().audit(
            "fill",
            &credential.user_id,
            &format!("{} fill of {}", policy, date.format("%Y-%m-%d")),
        );
        Ok(outcome)
    }

    /// Submit a day without the deferral check (used by the cutover).
    pub fn submit_day(
        &self,
        credential: &Credential,
        date: NaiveDate,
        policy: FillPolicy,
        options: FillOptions,
    ) -> AppResult<FillOutcome> {
        let events = compute_events(policy, date, options)?;
        self.submit_events(credential, &events)
    }

    /// Fill every weekday of the inclusive range, best effort per day.
    pub fn fill_range(
        &self,
        credential: &Credential,
        start: NaiveDate,
        end: NaiveDate,
        policy: FillPolicy,
        options: FillOptions,
    ) -> RangeReport {
        let mut report = RangeReport::default();

        for day in weekdays_between(start, end) {
            let res = self.fill_day(credential, day, policy, options);
            if let Err(e) = &res {
                warn!("range fill: {} failed for {}: {}", day, credential.user_id, e);
            }
            report.days.push((day, res.map_err(|e| e.to_string())));
        }

        report
    }

    /// Submit a single action, at `time` or at the action's default time.
    ///
    /// Returns the queue depth (0 when delivered immediately).
    pub fn clock(
        &self,
        credential: &Credential,
        action: ClockAction,
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> AppResult<usize> {
        let planned = single_event(action, date, time);
        let now = self.now().naive_local();
        if planned.at > now {
            return Err(AppError::InvalidTime(format!(
                "{} is in the future",
                planned.at.format("%Y-%m-%d %H:%M")
            )));
        }

        // Explicit times are sent as given; jitter must not push past now.
        let jitter = time.is_none() && planned.at + self.jitter_window / 2 <= now;
        let event = ClockEvent::from_planned(credential, &planned, jitter);
        self.queue.enqueue(&credential.user_id, event)
    }

    /// Events go one by one; the first hard failure aborts the rest of the day.
    fn submit_events(
        &self,
        credential: &Credential,
        events: &[PlannedEvent],
    ) -> AppResult<FillOutcome> {
        let mut submitted = 0;
        let mut queued = 0;

        for planned in events {
            let event = ClockEvent::from_planned(credential, planned, true);
            match self.queue.enqueue(&credential.user_id, event)? {
                0 => submitted += 1,
                depth => {
                    debug!("{} queued at position {}", planned.action, depth);
                    queued += 1;
                }
            }
        }

        Ok(FillOutcome::Completed { submitted, queued })
    }
}
