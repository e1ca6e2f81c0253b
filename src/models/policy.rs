use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named schedule policy used to fill a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ValueEnum)]
pub enum FillPolicy {
    /// 09:00 / 13:00 / 14:00 / 18:00
    AllDay,
    /// 10:00 / 14:00
    HalfDay,
    /// Weekday-aware schedule, Mon–Fri only.
    WorkDay,
}

impl FillPolicy {
    pub fn fp_as_str(&self) -> &'static str {
        match self {
            FillPolicy::AllDay => "all day",
            FillPolicy::HalfDay => "half day",
            FillPolicy::WorkDay => "work day",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FillPolicy::AllDay => "all_day",
            FillPolicy::HalfDay => "half_day",
            FillPolicy::WorkDay => "work_day",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "all_day" => Some(FillPolicy::AllDay),
            "half_day" => Some(FillPolicy::HalfDay),
            "work_day" => Some(FillPolicy::WorkDay),
            _ => None,
        }
    }
}

impl std::fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.fp_as_str())
    }
}

/// Options shared by every policy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FillOptions {
    /// Mon–Thu WorkDay starts at 08:00 and ends at 17:30.
    pub start_early: bool,
}

impl FillOptions {
    pub fn start_early() -> Self {
        Self { start_early: true }
    }
}
