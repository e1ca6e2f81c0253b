//! In-process FIFO of submissions that hit upstream rate limiting.
//!
//! The queue is replayed strictly in order. While it holds entries no
//! submission may jump ahead of it, and only one drain pass runs at a time.

use crate::core::notify::Notifier;
use crate::core::submitter::EventSubmitter;
use crate::errors::AppResult;
use crate::models::event::ClockEvent;
use log::{info, warn};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

/// A submission waiting for its turn.
#[derive(Debug, Clone)]
pub struct RetryEntry {
    pub owner: String,
    pub event: ClockEvent,
}

/// Summary of one drain pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainReport {
    pub delivered: usize,
    pub failed: usize,
    pub remaining: usize,
    /// The pass stopped early on a rate limit.
    pub rate_limited: bool,
}

pub struct RetryQueue {
    submitter: Arc<dyn EventSubmitter>,
    entries: Mutex<VecDeque<RetryEntry>>,
    /// Held across the empty check and the immediate attempt of `enqueue`.
    turn: Mutex<()>,
    draining: AtomicBool,
}

/// Clears the draining flag when the pass ends, even on panic.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RetryQueue {
    pub fn new(submitter: Arc<dyn EventSubmitter>) -> Self {
        Self {
            submitter,
            entries: Mutex::new(VecDeque::new()),
            turn: Mutex::new(()),
            draining: AtomicBool::new(false),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<RetryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Descriptions of the queued submissions, head first.
    pub fn pending(&self) -> Vec<(String, String)> {
        self.entries()
            .iter()
            .map(|e| (e.owner.clone(), e.event.describe()))
            .collect()
    }

    /// Submit now if nothing is waiting, otherwise join the tail.
    ///
    /// Returns 0 when delivered immediately, else the queue depth after
    /// appending. Failures other than rate limiting are returned unqueued.
    /// Concurrent callers take turns, so a later caller never overtakes an
    /// earlier one that ends up queued.
    pub fn enqueue(&self, owner: &str, event: ClockEvent) -> AppResult<usize> {
        let _turn = self.turn.lock().unwrap_or_else(PoisonError::into_inner);
        {
            let mut q = self.entries();
            if !q.is_empty() {
                q.push_back(RetryEntry {
                    owner: owner.to_string(),
                    event,
                });
                return Ok(q.len());
            }
        }

        match self.submitter.submit(&event) {
            Ok(()) => Ok(0),
            Err(e) if e.is_rate_limited() => {
                let mut q = self.entries();
                warn!("rate limited, queuing {} for {}", event.describe(), owner);
                q.push_back(RetryEntry {
                    owner: owner.to_string(),
                    event,
                });
                Ok(q.len())
            }
            Err(e) => Err(e),
        }
    }

    /// Replay the queue head first.
    ///
    /// Stops at the first rate limit, leaving the rest queued. Returns `None`
    /// when another drain pass is already running.
    pub fn drain(&self, notifier: &dyn Notifier) -> Option<DrainReport> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let _guard = DrainGuard(&self.draining);

        let mut report = DrainReport::default();
        let mut successes: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut failures: BTreeMap<String, Vec<String>> = BTreeMap::new();

        loop {
            // Only the drain pops, so the head stays put while we submit it.
            let head = self.entries().front().cloned();
            let Some(head) = head else {
                break;
            };

            match self.submitter.submit(&head.event) {
                Ok(()) => {
                    self.entries().pop_front();
                    report.delivered += 1;
                    successes
                        .entry(head.owner)
                        .or_default()
                        .push(head.event.describe());
                }
                Err(e) if e.is_rate_limited() => {
                    report.rate_limited = true;
                    break;
                }
                Err(e) => {
                    self.entries().pop_front();
                    report.failed += 1;
                    failures
                        .entry(head.owner)
                        .or_default()
                        .push(format!("{} ({})", head.event.describe(), e));
                }
            }
        }

        report.remaining = self.len();
        Self::notify_owners(notifier, successes, failures);

        if report.delivered + report.failed > 0 {
            info!(
                "retry queue drained: {} delivered, {} failed, {} remaining",
                report.delivered, report.failed, report.remaining
            );
        }
        Some(report)
    }

    /// Drain up to `rounds` times, sleeping `interval` between rate-limited passes.
    pub fn drain_rounds(
        &self,
        notifier: &dyn Notifier,
        rounds: u32,
        interval: Duration,
    ) -> DrainReport {
        let mut total = DrainReport::default();
        for round in 0..rounds {
            if round > 0 {
                thread::sleep(interval);
            }
            if let Some(r) = self.drain(notifier) {
                total.delivered += r.delivered;
                total.failed += r.failed;
                total.rate_limited = r.rate_limited;
            }
            if self.is_empty() {
                break;
            }
        }
        total.remaining = self.len();
        total
    }

    /// One message per owner with everything that happened to their entries.
    fn notify_owners(
        notifier: &dyn Notifier,
        mut successes: BTreeMap<String, Vec<String>>,
        mut failures: BTreeMap<String, Vec<String>>,
    ) {
        let mut owners: Vec<String> = successes.keys().chain(failures.keys()).cloned().collect();
        owners.sort();
        owners.dedup();

        for owner in owners {
            let mut lines = Vec::new();
            if let Some(ok) = successes.remove(&owner) {
                lines.push(format!(
                    "I've just successfully submitted what was in my queue: {}",
                    ok.join(", ")
                ));
            }
            if let Some(ko) = failures.remove(&owner) {
                lines.push(format!(
                    "I tried to submit what was in my queue but it failed: {}",
                    ko.join(", ")
                ));
            }
            if let Err(e) = notifier.notify(&owner, &lines.join("\n")) {
                warn!("failed to notify {}: {}", owner, e);
            }
        }
    }
}
