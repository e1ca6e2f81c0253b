use chrono::NaiveTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One clocking action. Declaration order is the canonical order of a day.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
pub enum ClockAction {
    CheckIn,
    Break,
    Return,
    CheckOut,
}

impl ClockAction {
    /// Canonical order of a full day.
    pub const FULL_DAY: [ClockAction; 4] = [
        ClockAction::CheckIn,
        ClockAction::Break,
        ClockAction::Return,
        ClockAction::CheckOut,
    ];

    /// Canonical order of a half day.
    pub const HALF_DAY: [ClockAction; 2] = [ClockAction::CheckIn, ClockAction::CheckOut];

    pub fn ca_as_str(&self) -> &'static str {
        match self {
            ClockAction::CheckIn => "check in",
            ClockAction::Break => "break",
            ClockAction::Return => "return",
            ClockAction::CheckOut => "check out",
        }
    }

    /// The upstream models a day as alternating sign-in / sign-out.
    pub fn is_sign_in(&self) -> bool {
        matches!(self, ClockAction::CheckIn | ClockAction::Return)
    }

    /// Default wall-clock time of the action (classic full day).
    pub fn default_time(&self) -> NaiveTime {
        let (h, m) = match self {
            ClockAction::CheckIn => (9, 0),
            ClockAction::Break => (13, 0),
            ClockAction::Return => (14, 0),
            ClockAction::CheckOut => (18, 0),
        };
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for ClockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ca_as_str())
    }
}
