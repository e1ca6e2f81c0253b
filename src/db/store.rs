//! Store interfaces consumed by the core, and their SQLite implementation.

use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::credential::Credential;
use crate::models::fill_job::DeferredFillJob;
use log::warn;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub trait CredentialStore: Send + Sync {
    fn find(&self, user_id: &str) -> AppResult<Option<Credential>>;
    fn upsert(&self, cred: &Credential) -> AppResult<()>;
}

pub trait FillJobStore: Send + Sync {
    fn list_pending_fill_jobs(&self) -> AppResult<Vec<DeferredFillJob>>;

    /// Fails with `AlreadyScheduled` if the user already has a pending job.
    fn insert_pending_fill_job(&self, job: &DeferredFillJob) -> AppResult<i64>;

    fn clear_all_pending_fill_jobs(&self) -> AppResult<usize>;
    /// Remove exactly these jobs, returning how many existed.
    fn clear_pending_fill_jobs(&self, ids: &[i64]) -> AppResult<usize>;

    /// Best-effort audit trail of scheduling decisions.
    fn audit(&self, _operation: &str, _target: &str, _message: &str) {}
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::from_pool(DbPool::new(path)?))
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::from_pool(DbPool::in_memory()?))
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            conn: Mutex::new(pool.conn),
        }
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for SqliteStore {
    fn find(&self, user_id: &str) -> AppResult<Option<Credential>> {
        queries::find_credential(&self.conn(), user_id)
    }

    fn upsert(&self, cred: &Credential) -> AppResult<()> {
        queries::upsert_credential(&self.conn(), cred)
    }
}

impl FillJobStore for SqliteStore {
    fn list_pending_fill_jobs(&self) -> AppResult<Vec<DeferredFillJob>> {
        queries::load_pending_fills(&self.conn())
    }

    fn insert_pending_fill_job(&self, job: &DeferredFillJob) -> AppResult<i64> {
        queries::insert_pending_fill(&self.conn(), job)
    }

    fn clear_all_pending_fill_jobs(&self) -> AppResult<usize> {
        queries::clear_pending_fills(&self.conn())
    }

    fn clear_pending_fill_jobs(&self, ids: &[i64]) -> AppResult<usize> {
        queries::delete_pending_fills(&self.conn(), ids)
    }

    fn audit(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.conn(), operation, target, message) {
            warn!("Failed to write internal log: {}", e);
        }
    }
}
