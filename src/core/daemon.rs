//! Foreground scheduler: periodic queue drains and the daily cutover.

use crate::core::cutover::run_cutover;
use crate::core::fill::FillService;
use crate::core::notify::Notifier;
use crate::db::store::FillJobStore;
use chrono::{DateTime, Days, Duration, Local, NaiveTime};
use log::{error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

/// First local occurrence of `at` strictly after `now`.
pub fn next_cutover_after(now: DateTime<Local>, at: NaiveTime) -> DateTime<Local> {
    for offset in 0..3 {
        let Some(day) = now.date_naive().checked_add_days(Days::new(offset)) else {
            break;
        };
        if let Some(candidate) = day.and_time(at).and_local_timezone(Local).earliest()
            && candidate > now
        {
            return candidate;
        }
    }
    now + Duration::days(1)
}

pub struct Daemon {
    fill: Arc<FillService>,
    store: Arc<dyn FillJobStore>,
    notifier: Arc<dyn Notifier>,
    cutover_at: NaiveTime,
    tick: std::time::Duration,
}

impl Daemon {
    pub fn new(
        fill: Arc<FillService>,
        store: Arc<dyn FillJobStore>,
        notifier: Arc<dyn Notifier>,
        cutover_at: NaiveTime,
        tick: std::time::Duration,
    ) -> Self {
        Self {
            fill,
            store,
            notifier,
            cutover_at,
            tick,
        }
    }

    /// One iteration: drain the retry queue, run the cutover if it is due.
    /// Returns the (possibly advanced) next cutover time.
    pub fn tick(&self, next_cutover: DateTime<Local>) -> DateTime<Local> {
        self.fill.queue().drain(self.notifier.as_ref());

        let now = self.fill.now();
        if now < next_cutover {
            return next_cutover;
        }

        if let Err(e) = run_cutover(&self.fill, self.store.as_ref(), self.notifier.as_ref()) {
            error!("cutover failed: {}", e);
        }
        next_cutover_after(now, self.cutover_at)
    }

    /// Loop until `stop` is set. The flag is checked between ticks.
    pub fn run(&self, stop: &AtomicBool) {
        let mut next = next_cutover_after(self.fill.now(), self.cutover_at);
        info!("daemon started, next cutover at {}", next.format("%Y-%m-%d %H:%M"));

        while !stop.load(Ordering::Acquire) {
            next = self.tick(next);

            let deadline = Instant::now() + self.tick;
            while !stop.load(Ordering::Acquire) {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep((deadline - now).min(std::time::Duration::from_millis(200)));
            }
        }

        info!("daemon stopped");
    }
}
