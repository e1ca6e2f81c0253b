#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use rclockfill::config::Config;
use rclockfill::core::fill::FillService;
use rclockfill::core::notify::Notifier;
use rclockfill::core::retry_queue::RetryQueue;
use rclockfill::core::submitter::EventSubmitter;
use rclockfill::db::store::SqliteStore;
use rclockfill::errors::{AppError, AppResult};
use rclockfill::models::credential::Credential;
use rclockfill::models::event::ClockEvent;
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn rcf() -> Command {
    cargo_bin_cmd!("rclockfill")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rclockfill.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, 0).earliest().unwrap()
}

pub fn cred(user: &str) -> Credential {
    Credential::new(user, format!("token-{}", user))
}

/// Scripted answer of the fake upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    RateLimited,
    AuthExpired,
    Upstream(u16),
}

impl Reply {
    fn into_result(self) -> AppResult<()> {
        match self {
            Reply::Ok => Ok(()),
            Reply::RateLimited => Err(AppError::RateLimited),
            Reply::AuthExpired => Err(AppError::AuthExpired),
            Reply::Upstream(code) => Err(AppError::upstream(Some(code), "boom")),
        }
    }
}

/// Records every attempt; answers from a script, then from the default mode.
#[derive(Default)]
pub struct FakeSubmitter {
    attempts: Mutex<Vec<ClockEvent>>,
    script: Mutex<VecDeque<Reply>>,
    rate_limited: AtomicBool,
}

impl FakeSubmitter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, replies: &[Reply]) {
        self.script.lock().unwrap().extend(replies.iter().copied());
    }

    /// Answer RateLimited to everything not scripted.
    pub fn set_rate_limited(&self, on: bool) {
        self.rate_limited.store(on, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> Vec<ClockEvent> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

impl EventSubmitter for FakeSubmitter {
    fn submit(&self, event: &ClockEvent) -> AppResult<()> {
        self.attempts.lock().unwrap().push(event.clone());
        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            return reply.into_result();
        }
        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, owner: &str, text: &str) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((owner.to_string(), text.to_string()));
        Ok(())
    }
}

/// Fill service over a fake upstream, an in-memory store and a fixed clock.
pub fn fill_service(
    submitter: Arc<FakeSubmitter>,
    store: Arc<SqliteStore>,
    now: DateTime<Local>,
) -> FillService {
    let queue = Arc::new(RetryQueue::new(submitter));
    FillService::new(queue, store, &Config::default()).with_clock(Arc::new(move || now))
}

pub fn memory_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::in_memory().unwrap())
}
