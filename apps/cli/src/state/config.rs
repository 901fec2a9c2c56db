//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KHATA_*`)
//! 2. Config file (`khata.toml`, or `--config <path>`)
//! 3. Defaults (this file)
//!
//! ## Example `khata.toml`
//! ```toml
//! store_name = "Vape Corner"
//! currency_symbol = "Rs "
//! admin_password = "change-me"
//! db_path = "/var/lib/khata/khata.db"
//! ```
//!
//! Configuration is read-only after startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use khata_core::{CoreError, Money};

/// Errors while loading `khata.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (shown on reports)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display), including any trailing space
    pub currency_symbol: String,

    /// Decimal places shown for amounts (0 to 2)
    pub currency_decimals: u8,

    /// Password for reports, clearing data and imports.
    ///
    /// A convenience gate for a shared counter, not access control.
    pub admin_password: String,

    /// Database file; the platform data dir is used when unset
    pub db_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Khata POS"
    /// - Currency: PKR (Rs), 2 decimals
    /// - Admin password: "admin"
    fn default() -> Self {
        ConfigState {
            store_name: "Khata POS".to_string(),
            currency_code: "PKR".to_string(),
            currency_symbol: "Rs ".to_string(),
            currency_decimals: 2,
            admin_password: "admin".to_string(),
            db_path: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (khata.toml)
    /// 3. Environment variables
    ///
    /// A `config_path` given by the caller must exist; only the default
    /// location may be missing.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = match config_path {
            Some(path) => Some(path),
            None => Self::default_config_path().filter(|path| {
                let found = path.exists();
                if !found {
                    debug!(?path, "Config file not found, using defaults");
                }
                found
            }),
        };

        if let Some(path) = path {
            info!(?path, "Loading config from file");
            let contents = std::fs::read_to_string(&path)?;
            config = toml::from_str(&contents)?;
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_decimals > 2 {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be 0, 1 or 2, got {}",
                self.currency_decimals
            )));
        }

        if self.admin_password.is_empty() {
            return Err(ConfigError::Invalid("admin_password must not be empty".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// ## Environment Variables
    /// - `KHATA_STORE_NAME`: Override store name
    /// - `KHATA_CURRENCY_SYMBOL`: Override currency symbol
    /// - `KHATA_ADMIN_PASSWORD`: Override admin password
    /// - `KHATA_DB_PATH`: Override database file
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("KHATA_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("KHATA_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(password) = lookup("KHATA_ADMIN_PASSWORD") {
            debug!("Overriding admin password from environment");
            self.admin_password = password;
        }

        if let Some(path) = lookup("KHATA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.db_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "khata", "pos")
            .map(|dirs| dirs.config_dir().join("khata.toml"))
    }

    /// Checks the admin password for a privileged command.
    pub fn verify_password(&self, attempt: &str) -> Result<(), CoreError> {
        if attempt == self.admin_password {
            Ok(())
        } else {
            warn!("Privileged command refused: wrong password");
            Err(CoreError::Unauthorized)
        }
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "Rs 12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let decimals = u32::from(self.currency_decimals.min(2));

        // Money is always in paisa; round half away from zero when fewer
        // decimals are shown.
        let scale = 10_i64.pow(2 - decimals);
        let cents = amount.cents();
        let units = (cents.abs() + scale / 2) / scale;

        let divisor = 10_i64.pow(decimals);
        let whole = units / divisor;
        let frac = units % divisor;

        format!(
            "{}{}{}",
            if cents < 0 && units != 0 { "-" } else { "" },
            self.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = decimals as usize)
            } else {
                whole.to_string()
            }
        )
    }
}
