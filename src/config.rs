use serde::Deserialize;
use crate::error::{DonorError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Largest accepted donation interval (100 years)
pub const MAX_DONATION_INTERVAL_DAYS: i64 = 36_500;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub matching: MatchingConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Minimum number of whole days between two donations
    pub min_donation_interval_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Layered load: built-in defaults, then the optional config file, then
    /// `DONOR__*` environment variables (e.g. `DONOR__DATABASE__PATH`).
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .set_default("matching.min_donation_interval_days", 90)?
            .set_default("database.path", "donor-match.db")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("DONOR").separator("__"))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let interval = self.matching.min_donation_interval_days;
        if !(0..=MAX_DONATION_INTERVAL_DAYS).contains(&interval) {
            return Err(DonorError::Config(format!(
                "matching.min_donation_interval_days must be between 0 and {} (got {})",
                MAX_DONATION_INTERVAL_DAYS, interval
            )));
        }
        if self.database.path.trim().is_empty() {
            return Err(DonorError::Config("database.path must not be empty".to_string()));
        }
        Ok(())
    }
}
