use super::{
    credential::Credential,
    policy::{FillOptions, FillPolicy},
};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

/// A fill for the current day, persisted until the nightly cutover replays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredFillJob {
    pub id: i64, // ⇔ pending_fills.id (0 before insert)
    pub credential: Credential,
    pub target_date: NaiveDate,
    pub policy: FillPolicy,
    pub options: FillOptions,
    pub created_at: DateTime<Local>,
}

impl DeferredFillJob {
    pub fn new(
        credential: Credential,
        target_date: NaiveDate,
        policy: FillPolicy,
        options: FillOptions,
    ) -> Self {
        Self {
            id: 0,
            credential,
            target_date,
            policy,
            options,
            created_at: Local::now(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.credential.user_id
    }

    pub fn date_str(&self) -> String {
        self.target_date.format("%Y-%m-%d").to_string()
    }
}
