//! Event submitter: one outbound call per clocking event.
//!
//! No retries happen here; rate limiting is reported as
//! [`AppError::RateLimited`] and left to the retry queue.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::event::ClockEvent;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime};
use log::debug;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

/// Records a single clocking event upstream.
pub trait EventSubmitter: Send + Sync {
    fn submit(&self, event: &ClockEvent) -> AppResult<()>;
}

/// Shift `at` by `offset`, clamped into the calendar day of `at`.
pub fn apply_jitter(at: NaiveDateTime, offset: Duration) -> NaiveDateTime {
    let day = at.date();
    let first = day.and_time(NaiveTime::MIN);
    let last = day.and_hms_opt(23, 59, 59).unwrap_or(at);
    (at + offset).clamp(first, last)
}

/// Uniform offset in [-window/2, +window/2], second resolution.
pub fn random_offset(window: Duration) -> Duration {
    let half = window.num_seconds() / 2;
    if half <= 0 {
        return Duration::zero();
    }
    Duration::seconds(rand::thread_rng().gen_range(-half..=half))
}

/// Translate an upstream status + body into the error taxonomy.
pub fn classify_response(status: u16, body: &str) -> AppResult<()> {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        200..=299 => Ok(()),
        429 => Err(AppError::RateLimited),
        401 | 403 => Err(AppError::AuthExpired),
        _ if message.eq_ignore_ascii_case("rate limit exceeded") => Err(AppError::RateLimited),
        _ => Err(AppError::upstream(Some(status), message)),
    }
}

/// Local wall-clock time to an offset-aware timestamp.
pub fn to_local(at: NaiveDateTime) -> AppResult<DateTime<Local>> {
    at.and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| AppError::InvalidTime(format!("{at} does not exist in the local timezone")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    sign_in: bool,
    date: String,
    timezone_offset: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    device_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    gps_coordinates: Option<&'a str>,
}

/// Submitter backed by the upstream HTTP API.
pub struct HttpSubmitter {
    client: Client,
    url: String,
    jitter_window: Duration,
    gps_coordinates: Option<String>,
}

impl HttpSubmitter {
    pub fn new(cfg: &Config) -> AppResult<Self> {
        let client = Client::builder().timeout(cfg.request_timeout()).build()?;
        Ok(Self {
            client,
            url: cfg.sign_url(),
            jitter_window: cfg.jitter_window(),
            gps_coordinates: cfg.gps_coordinates.clone(),
        })
    }
}

impl EventSubmitter for HttpSubmitter {
    fn submit(&self, event: &ClockEvent) -> AppResult<()> {
        let at = if event.jitter {
            apply_jitter(event.at, random_offset(self.jitter_window))
        } else {
            event.at
        };
        let at = to_local(at)?;

        let body = SignRequest {
            sign_in: event.action.is_sign_in(),
            date: at.to_rfc3339(),
            timezone_offset: at.offset().local_minus_utc() / 60,
            user_id: event.credential.upstream_user_id.as_deref(),
            device_id: "rclockfill",
            gps_coordinates: self.gps_coordinates.as_deref(),
        };

        debug!(
            "submitting {} for {} at {}",
            event.action, event.credential.user_id, body.date
        );

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", event.credential.token))
            .json(&body)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text().unwrap_or_default();
        classify_response(status, &text)
    }
}
