use crate::availability::AggregatorSettings;
use chrono::FixedOffset;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// MySQL URL. Without it every request is served from synthetic data.
    pub database_url: Option<String>,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_reference_utc_offset_hours")]
    pub reference_utc_offset_hours: i32,

    #[serde(default)]
    pub run_migrations: bool,

    #[serde(default = "default_rust_log")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_db_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_reference_utc_offset_hours() -> i32 {
    7
}

fn default_rust_log() -> String {
    "info,swimdesk=debug".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            database_url: None,
            db_max_connections: default_db_max_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            reference_utc_offset_hours: default_reference_utc_offset_hours(),
            run_migrations: false,
            rust_log: default_rust_log(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reference timezone used to normalize calendar dates.
    pub fn reference_offset(&self) -> anyhow::Result<FixedOffset> {
        self.reference_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid REFERENCE_UTC_OFFSET_HOURS: {}",
                    self.reference_utc_offset_hours
                )
            })
    }

    pub fn aggregator_settings(&self) -> anyhow::Result<AggregatorSettings> {
        Ok(AggregatorSettings {
            reference_offset: self.reference_offset()?,
            request_timeout: self.request_timeout(),
        })
    }
}
