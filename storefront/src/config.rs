//! Storefront configuration.
//!
//! Defaults match the storefront as shipped: notifications live for three
//! seconds, order ids are nine characters and prices render in lira.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_NOTIFICATION_TTL_MS`: notification lifetime in milliseconds
//! - `STOREFRONT_ORDER_ID_LENGTH`: length of generated order ids
//! - `STOREFRONT_CURRENCY`: currency symbol used when rendering prices

use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Value could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// Value parsed but is out of range
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Storefront settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// How long a notification stays visible
    pub notification_ttl: Duration,
    /// Length of generated order ids
    pub order_id_length: usize,
    /// Symbol appended to rendered prices
    pub currency_symbol: String,
    /// Fresh ids to try when the generator repeats one already in the history
    pub id_retry_limit: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            notification_ttl: Duration::from_secs(3),
            order_id_length: 9,
            currency_symbol: "₺".to_string(),
            id_retry_limit: 8,
        }
    }
}

impl StorefrontConfig {
    /// Set the notification lifetime
    #[must_use]
    pub const fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Set the order id length
    #[must_use]
    pub const fn with_order_id_length(mut self, length: usize) -> Self {
        self.order_id_length = length;
        self
    }

    /// Set the currency symbol
    #[must_use]
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Set the id retry limit
    #[must_use]
    pub const fn with_id_retry_limit(mut self, limit: u32) -> Self {
        self.id_retry_limit = limit;
        self
    }

    /// Load configuration from the process environment
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparsable or out-of-range value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparsable or out-of-range value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("STOREFRONT_NOTIFICATION_TTL_MS") {
            let millis = parse(&raw, "STOREFRONT_NOTIFICATION_TTL_MS")?;
            config.notification_ttl = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("STOREFRONT_ORDER_ID_LENGTH") {
            config.order_id_length = parse(&raw, "STOREFRONT_ORDER_ID_LENGTH")?;
        }

        if let Some(symbol) = lookup("STOREFRONT_CURRENCY") {
            config.currency_symbol = symbol.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_ttl.is_zero() {
            return Err(ConfigError::ValidationError(
                "notification_ttl must be > 0".to_string(),
            ));
        }
        if !(4..=64).contains(&self.order_id_length) {
            return Err(ConfigError::ValidationError(
                "order_id_length must be between 4 and 64".to_string(),
            ));
        }
        if self.currency_symbol.is_empty() {
            return Err(ConfigError::ValidationError(
                "currency_symbol cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(raw: &str, var: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}
