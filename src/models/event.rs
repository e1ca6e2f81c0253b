use super::{clock_action::ClockAction, credential::Credential};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// An (action, local wall-clock time) pair produced by a schedule policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedEvent {
    pub action: ClockAction,
    pub at: NaiveDateTime,
}

impl PlannedEvent {
    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    pub fn time_str(&self) -> String {
        self.at.format("%H:%M").to_string()
    }
}

/// A clocking event ready to be submitted for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockEvent {
    pub credential: Credential,
    pub action: ClockAction,
    /// Local wall-clock time, never converted before submission.
    pub at: NaiveDateTime,
    /// Perturb the timestamp slightly before sending.
    pub jitter: bool,
}

impl ClockEvent {
    pub fn new(credential: Credential, action: ClockAction, at: NaiveDateTime, jitter: bool) -> Self {
        Self {
            credential,
            action,
            at,
            jitter,
        }
    }

    pub fn from_planned(credential: &Credential, planned: &PlannedEvent, jitter: bool) -> Self {
        Self::new(credential.clone(), planned.action, planned.at, jitter)
    }

    pub fn owner(&self) -> &str {
        &self.credential.user_id
    }

    /// Short description used in notifications ("check in 2024-03-11 09:00").
    pub fn describe(&self) -> String {
        format!("{} {}", self.action, self.at.format("%Y-%m-%d %H:%M"))
    }
}
