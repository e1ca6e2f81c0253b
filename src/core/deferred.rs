use crate::db::store::FillJobStore;
use crate::errors::{AppError, AppResult};
use crate::models::credential::Credential;
use crate::models::fill_job::DeferredFillJob;
use crate::models::outcome::Deferral;
use crate::models::policy::{FillOptions, FillPolicy};
use chrono::{DateTime, Duration, Local, NaiveDate};
use log::info;
use std::sync::Arc;

/// Fills for a day still in progress, kept until the nightly cutover.
pub struct DeferredFills {
    store: Arc<dyn FillJobStore>,
    credential_margin: Duration,
}

impl DeferredFills {
    pub fn new(store: Arc<dyn FillJobStore>, credential_margin: Duration) -> Self {
        Self {
            store,
            credential_margin,
        }
    }

    pub fn store(&self) -> &Arc<dyn FillJobStore> {
        &self.store
    }

    /// Persist a job when `date` is today, otherwise tell the caller to go ahead.
    ///
    /// The credential must outlive the cutover, and a user can only have one
    /// pending job; the store enforces the latter atomically.
    pub fn schedule_if_today(
        &self,
        credential: &Credential,
        date: NaiveDate,
        policy: FillPolicy,
        options: FillOptions,
        now: DateTime<Local>,
    ) -> AppResult<Deferral> {
        if date != now.date_naive() {
            return Ok(Deferral::Immediate);
        }

        if credential.expires_within(now, self.credential_margin)
            && let Some(expires_at) = credential.expires_at
        {
            return Err(AppError::CredentialExpiringSoon { expires_at });
        }

        let mut job = DeferredFillJob::new(credential.clone(), date, policy, options);
        job.created_at = now;
        let id = self.store.insert_pending_fill_job(&job)?;

        info!(
            "deferred {} fill of {} for {} (job #{})",
            policy,
            job.date_str(),
            credential.user_id,
            id
        );
        self.store.audit(
            "schedule",
            &credential.user_id,
            &format!("{} fill of {} deferred to cutover", policy, job.date_str()),
        );

        Ok(Deferral::Scheduled)
    }

    pub fn pending(&self) -> AppResult<Vec<DeferredFillJob>> {
        self.store.list_pending_fill_jobs()
    }
}
