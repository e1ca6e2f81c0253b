use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::store::{CredentialStore, FillJobStore, SqliteStore};
use crate::errors::AppResult;
use crate::models::credential::Credential;
use crate::ui::messages::success;

/// Register or refresh a user's upstream token.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Register { user, token } = cmd {
        let cred = Credential::from_token(user, token)?;

        let store = SqliteStore::open(&cfg.database)?;
        store.upsert(&cred)?;

        let expiry = cred
            .expires_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        store.audit("register", user, &format!("token stored (expires: {})", expiry));

        success(format!("Registered {} (token expires: {})", user, expiry));
    }

    Ok(())
}
