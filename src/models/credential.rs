use crate::errors::{AppError, AppResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Upstream credential of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Id of the user on our side (chat user, owner of notifications).
    pub user_id: String,
    /// Bearer token for the upstream service.
    pub token: String,
    /// `None` when the token carries no expiry.
    pub expires_at: Option<DateTime<Local>>,
    /// User id known to the upstream service, if the token carries one.
    pub upstream_user_id: Option<String>,
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
    #[serde(rename = "UserId")]
    user_id: Option<serde_json::Value>,
}

impl Credential {
    /// Credential for an opaque token (no known expiry).
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
            expires_at: None,
            upstream_user_id: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Local>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Build a credential from a token, reading `exp` / `UserId` when it is a JWT.
    pub fn from_token(user_id: &str, token: &str) -> AppResult<Self> {
        let mut cred = Credential::new(user_id, token);

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Ok(cred);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| AppError::InvalidToken(format!("payload is not base64url: {e}")))?;

        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|e| AppError::InvalidToken(format!("payload is not JSON: {e}")))?;

        if let Some(exp) = claims.exp {
            let at = Local
                .timestamp_opt(exp, 0)
                .single()
                .ok_or_else(|| AppError::InvalidToken(format!("invalid exp claim: {exp}")))?;
            cred.expires_at = Some(at);
        }

        cred.upstream_user_id = claims.user_id.and_then(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(cred)
    }

    /// True if the credential stops being valid before `now + margin`.
    pub fn expires_within(&self, now: DateTime<Local>, margin: Duration) -> bool {
        match self.expires_at {
            Some(at) => at <= now + margin,
            None => false,
        }
    }
}
