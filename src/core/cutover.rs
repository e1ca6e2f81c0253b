//! Nightly cutover: replays every deferred fill once the day is over.

use crate::core::fill::FillService;
use crate::core::notify::Notifier;
use crate::db::store::FillJobStore;
use crate::errors::AppResult;
use log::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CutoverReport {
    pub attempted: usize,
    pub failed: usize,
    pub cleared: usize,
    /// Jobs for a day that has not ended yet, left for the next cutover.
    pub kept: usize,
}

/// Replay the pending jobs whose day is over, then remove exactly those.
///
/// A failed job is logged and reported to its owner but not retried: every
/// attempted job is removed regardless of its outcome. Jobs of today (or
/// later) are neither submitted nor removed.
pub fn run_cutover(
    fill: &FillService,
    store: &dyn FillJobStore,
    notifier: &dyn Notifier,
) -> AppResult<CutoverReport> {
    let jobs = store.list_pending_fill_jobs()?;
    let today = fill.now().date_naive();
    let mut report = CutoverReport::default();
    let mut attempted_ids = Vec::with_capacity(jobs.len());

    for job in &jobs {
        if job.target_date >= today {
            debug!(
                "cutover: job #{} targets {} which is not over yet, keeping it",
                job.id,
                job.date_str()
            );
            report.kept += 1;
            continue;
        }

        report.attempted += 1;
        attempted_ids.push(job.id);

        match fill.submit_day(&job.credential, job.target_date, job.policy, job.options) {
            Ok(outcome) => {
                info!("cutover: filled {} for {} ({:?})", job.date_str(), job.owner(), outcome);
                store.audit(
                    "cutover",
                    job.owner(),
                    &format!("{} fill of {} submitted", job.policy, job.date_str()),
                );
            }
            Err(e) => {
                report.failed += 1;
                warn!("cutover: job #{} for {} failed: {}", job.id, job.owner(), e);
                store.audit(
                    "cutover_failed",
                    job.owner(),
                    &format!("{} fill of {}: {}", job.policy, job.date_str(), e),
                );
                let text = format!(
                    "I couldn't fill {} ({}) as scheduled: {}",
                    job.date_str(),
                    job.policy,
                    e
                );
                if let Err(e) = notifier.notify(job.owner(), &text) {
                    warn!("failed to notify {}: {}", job.owner(), e);
                }
            }
        }
    }

    report.cleared = store.clear_pending_fill_jobs(&attempted_ids)?;

    info!(
        "cutover done: {} attempted, {} failed, {} cleared, {} kept",
        report.attempted, report.failed, report.cleared, report.kept
    );
    Ok(report)
}
