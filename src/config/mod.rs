use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Upper bound of the jitter window.
pub const MAX_JITTER_MINUTES: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_sign_path")]
    pub sign_path: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_jitter_minutes")]
    pub jitter_minutes: i64,
    #[serde(default = "default_credential_margin")]
    pub credential_margin_hours: i64,
    #[serde(default = "default_cutover_time")]
    pub cutover_time: String,
    #[serde(default = "default_drain_interval")]
    pub drain_interval_secs: u64,
    #[serde(default = "default_drain_rounds")]
    pub drain_rounds: u32,
    #[serde(default)]
    pub gps_coordinates: Option<String>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_api_url() -> String {
    "https://app.woffu.com".to_string()
}
fn default_sign_path() -> String {
    "/api/svc/signs/signs".to_string()
}
fn default_request_timeout() -> u64 {
    15
}
fn default_jitter_minutes() -> i64 {
    5
}
fn default_credential_margin() -> i64 {
    24
}
fn default_cutover_time() -> String {
    "00:05".to_string()
}
fn default_drain_interval() -> u64 {
    60
}
fn default_drain_rounds() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            api_url: default_api_url(),
            sign_path: default_sign_path(),
            request_timeout_secs: default_request_timeout(),
            jitter_minutes: default_jitter_minutes(),
            credential_margin_hours: default_credential_margin(),
            cutover_time: default_cutover_time(),
            drain_interval_secs: default_drain_interval(),
            drain_rounds: default_drain_rounds(),
            gps_coordinates: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory (~/.rclockfill)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rclockfill")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rclockfill.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rclockfill.sqlite")
    }

    /// Load configuration from the default file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write the configuration file (creating its directory) and an empty DB file.
    pub fn init_all(&self, path: &Path, write_config: bool) -> AppResult<()> {
        if write_config {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let yaml = serde_yaml::to_string(self)?;
            let mut file = fs::File::create(path)?;
            file.write_all(yaml.as_bytes())?;
        }

        let db_path = Path::new(&self.database);
        if let Some(dir) = db_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        if !db_path.exists() {
            fs::File::create(db_path)?;
        }

        Ok(())
    }

    /// Capped so that events one hour apart keep their order.
    pub fn jitter_window(&self) -> Duration {
        Duration::minutes(self.jitter_minutes.clamp(0, MAX_JITTER_MINUTES))
    }

    pub fn credential_margin(&self) -> Duration {
        Duration::hours(self.credential_margin_hours.max(0))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn drain_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.drain_interval_secs.max(1))
    }

    pub fn cutover_at(&self) -> AppResult<NaiveTime> {
        crate::utils::time::parse_time(&self.cutover_time)
            .ok_or_else(|| AppError::Config(format!("invalid cutover_time '{}'", self.cutover_time)))
    }

    /// Full URL of the record-event endpoint.
    pub fn sign_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.sign_path.trim_start_matches('/')
        )
    }
}
