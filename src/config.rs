use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::scheduling::{BookingPolicy, SlotGrid, SlotValidator, TimeOfDay};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub app: AppConfig,
    pub scheduling: SchedulingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub locales_dir: Option<String>,
}

/// Salon-local clock and booking rules.
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    pub utc_offset: UtcOffset,
    pub policy: BookingPolicy,
    pub grid: SlotGrid,
}

impl SchedulingConfig {
    /// Current wall-clock time at the salon.
    pub fn now(&self) -> PrimitiveDateTime {
        let local = OffsetDateTime::now_utc().to_offset(self.utc_offset);
        PrimitiveDateTime::new(local.date(), local.time())
    }

    pub fn validator(&self) -> SlotValidator {
        SlotValidator::new(self.policy)
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            utc_offset: UtcOffset::UTC,
            policy: BookingPolicy::default(),
            grid: SlotGrid::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        // Server configuration
        let host = var("SERVER_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = var("SERVER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // Storage configuration
        let storage = match non_empty("STORAGE_BACKEND") {
            Some(val) => val.parse::<StorageBackend>().map_err(anyhow::Error::msg)?,
            None => StorageBackend::default(),
        };

        let database = match var("DATABASE_URL") {
            Some(url) => {
                let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
                    Some(val) => Some(
                        val.parse()
                            .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
                    ),
                    None => Some(10),
                };
                let min_connections = match var("DATABASE_MIN_CONNECTIONS") {
                    Some(val) => Some(
                        val.parse()
                            .context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
                    ),
                    None => Some(1),
                };
                Some(DatabaseConfig {
                    url,
                    max_connections,
                    min_connections,
                })
            }
            None => None,
        };

        if storage == StorageBackend::Postgres && database.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND is postgres");
        }

        // App configuration
        let environment = var("APP_ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .parse::<Environment>()
            .unwrap_or_default();
        let name = var("APP_NAME").unwrap_or_else(|| "Salon Backend".to_string());
        let locales_dir = non_empty("LOCALES_DIR");

        // Scheduling configuration
        let offset_minutes: i32 = match var("SALON_UTC_OFFSET_MINUTES") {
            Some(val) => val.parse().context("Failed to parse SALON_UTC_OFFSET_MINUTES")?,
            None => -180,
        };
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
            .context("SALON_UTC_OFFSET_MINUTES is out of range")?;

        let min_lead_minutes = match var("BOOKING_MIN_LEAD_MINUTES") {
            Some(val) => val.parse().context("Failed to parse BOOKING_MIN_LEAD_MINUTES")?,
            None => 0,
        };
        let max_days_ahead = match non_empty("BOOKING_MAX_DAYS_AHEAD") {
            Some(val) => Some(val.parse().context("Failed to parse BOOKING_MAX_DAYS_AHEAD")?),
            None => None,
        };

        let interval_minutes: u32 = match var("SLOT_INTERVAL_MINUTES") {
            Some(val) => val.parse().context("Failed to parse SLOT_INTERVAL_MINUTES")?,
            None => 30,
        };
        if interval_minutes == 0 {
            bail!("SLOT_INTERVAL_MINUTES must be positive");
        }
        let break_start = parse_time(non_empty("BREAK_START"), "BREAK_START")?;
        let break_end = parse_time(non_empty("BREAK_END"), "BREAK_END")?;
        match (break_start, break_end) {
            (Some(start), Some(end)) if start >= end => {
                bail!("BREAK_START must be before BREAK_END")
            }
            (Some(_), None) | (None, Some(_)) => {
                bail!("BREAK_START and BREAK_END must be set together")
            }
            _ => {}
        }

        Ok(Config {
            server: ServerConfig { host, port },
            storage,
            database,
            app: AppConfig {
                name,
                environment,
                locales_dir,
            },
            scheduling: SchedulingConfig {
                utc_offset,
                policy: BookingPolicy {
                    min_lead_minutes,
                    max_days_ahead,
                },
                grid: SlotGrid {
                    interval_minutes,
                    break_start,
                    break_end,
                },
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

fn parse_time(value: Option<String>, key: &str) -> Result<Option<TimeOfDay>> {
    value
        .map(|v| v.parse::<TimeOfDay>().with_context(|| format!("Failed to parse {}", key)))
        .transpose()
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}
