//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use chrono::{DateTime, Local, Weekday};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid fill policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // ---------------------------
    // Upstream service
    // ---------------------------
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Credential rejected by the service (unauthorized or expired)")]
    AuthExpired,

    #[error("Service returned error: {}{message}", status_prefix(.code))]
    Upstream { code: Option<u16>, message: String },

    // ---------------------------
    // Scheduling errors
    // ---------------------------
    #[error("No work schedule defined for {0}")]
    UnsupportedDay(Weekday),

    #[error("A fill is already scheduled for user {0}")]
    AlreadyScheduled(String),

    #[error("Credential expires at {expires_at}, too soon to schedule a deferred fill")]
    CredentialExpiringSoon { expires_at: DateTime<Local> },

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Rate limiting is the only failure the retry queue absorbs.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited)
    }

    pub fn upstream(code: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Upstream {
            code,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        // Timeouts and connection failures carry no status code.
        AppError::upstream(e.status().map(|s| s.as_u16()), e.to_string())
    }
}

fn status_prefix(code: &Option<u16>) -> String {
    code.map(|c| format!("{c} ")).unwrap_or_default()
}

pub type AppResult<T> = Result<T, AppError>;
