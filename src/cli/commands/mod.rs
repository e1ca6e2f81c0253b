pub mod clock;
pub mod cutover;
pub mod daemon;
pub mod fill;
pub mod init;
pub mod log;
pub mod pending;
pub mod plan;
pub mod register;

use crate::config::Config;
use crate::core::fill::FillService;
use crate::core::notify::LogNotifier;
use crate::core::retry_queue::RetryQueue;
use crate::core::submitter::HttpSubmitter;
use crate::db::store::{CredentialStore, SqliteStore};
use crate::errors::{AppError, AppResult};
use crate::models::credential::Credential;
use crate::ui::messages::warning;
use crate::utils::date;
use chrono::NaiveDate;
use std::sync::Arc;

/// Everything a command needs, wired from the configuration.
pub struct Services {
    pub store: Arc<SqliteStore>,
    pub fill: Arc<FillService>,
    pub notifier: Arc<LogNotifier>,
}

impl Services {
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let store = Arc::new(SqliteStore::open(&cfg.database)?);
        let submitter = Arc::new(HttpSubmitter::new(cfg)?);
        let queue = Arc::new(RetryQueue::new(submitter));
        let fill = Arc::new(FillService::new(queue, store.clone(), cfg));
        Ok(Self {
            store,
            fill,
            notifier: Arc::new(LogNotifier),
        })
    }

    pub fn credential(&self, user: &str) -> AppResult<Credential> {
        self.store
            .find(user)?
            .ok_or_else(|| AppError::UnknownUser(user.to_string()))
    }

    /// The queue lives in this process only: give it a few passes before exiting.
    pub fn flush_queue(&self, cfg: &Config) {
        let queue = self.fill.queue();
        if queue.is_empty() {
            return;
        }

        let report = queue.drain_rounds(self.notifier.as_ref(), cfg.drain_rounds, cfg.drain_interval());
        if report.remaining > 0 {
            warning(format!(
                "{} event(s) still rate limited and dropped on exit:",
                report.remaining
            ));
            for (owner, ev) in queue.pending() {
                println!("   {} → {}", owner, ev);
            }
        }
    }
}

/// Parse an optional date argument, defaulting to today.
pub fn parse_date_or_today(input: Option<&String>) -> AppResult<NaiveDate> {
    match input {
        Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(date::today()),
    }
}
