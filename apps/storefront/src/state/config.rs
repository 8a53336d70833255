//! # Storefront Configuration
//!
//! Configuration loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_SHOP_NAME="Corner Shop"                                 │
//! │     STOREFRONT_API_URL=https://api.example.com                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/... (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [shop]
//! name = "Storefront"
//! currency_code = "USD"
//! currency_symbol = "$"
//! currency_decimals = 2
//! default_country = "US"
//!
//! [commerce]
//! project_key = "storefront-dev"
//! api_url = "https://api.europe-west1.gcp.commercetools.com"
//! timeout_secs = 10
//!
//! [accounts]
//! min_customer_age = 13
//! min_password_length = 8
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront_core::validation::AccountRules;
use storefront_core::{MIN_CUSTOMER_AGE, MIN_PASSWORD_LENGTH, SUPPORTED_COUNTRIES};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Config file name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Largest `shop.currency_decimals` accepted.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Largest `accounts.min_customer_age` accepted.
pub const MAX_CUSTOMER_AGE: u32 = 150;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Shop identity and money display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSettings {
    #[serde(default = "default_shop_name")]
    pub name: String,

    /// Currency code (ISO 4217) for new carts
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    /// Country preselected in address forms
    #[serde(default = "default_country")]
    pub default_country: String,
}

fn default_shop_name() -> String {
    "Storefront".to_string()
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

fn default_country() -> String {
    "US".to_string()
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            name: default_shop_name(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            default_country: default_country(),
        }
    }
}

/// Where the commerce platform lives.
///
/// `project_key` and `api_url` are reserved for a remote `CommerceApi`
/// client; the in-memory backend only logs them. `timeout_secs` bounds
/// every action the app dispatches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommerceSettings {
    #[serde(default = "default_project_key")]
    pub project_key: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_project_key() -> String {
    "storefront-dev".to_string()
}

fn default_api_url() -> String {
    "https://api.europe-west1.gcp.commercetools.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for CommerceSettings {
    fn default() -> Self {
        CommerceSettings {
            project_key: default_project_key(),
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Rules applied to registration and profile forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(default = "default_min_age")]
    pub min_customer_age: u32,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_min_age() -> u32 {
    MIN_CUSTOMER_AGE
}

fn default_min_password_length() -> usize {
    MIN_PASSWORD_LENGTH
}

impl Default for AccountSettings {
    fn default() -> Self {
        AccountSettings {
            min_customer_age: default_min_age(),
            min_password_length: default_min_password_length(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub shop: ShopSettings,

    #[serde(default)]
    pub commerce: CommerceSettings,

    #[serde(default)]
    pub accounts: AccountSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.commerce.project_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "commerce.project_key must not be empty".into(),
            ));
        }

        let url = &self.commerce.api_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.commerce.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "commerce.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.shop.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "shop.currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.shop.currency_decimals
            )));
        }

        if self.accounts.min_customer_age > MAX_CUSTOMER_AGE {
            return Err(ConfigError::Invalid(format!(
                "accounts.min_customer_age must be at most {}, got {}",
                MAX_CUSTOMER_AGE, self.accounts.min_customer_age
            )));
        }

        if self.accounts.min_password_length == 0 {
            return Err(ConfigError::Invalid(
                "accounts.min_password_length must be greater than 0".into(),
            ));
        }

        if !SUPPORTED_COUNTRIES.contains(&self.shop.default_country.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "shop.default_country '{}' is not supported",
                self.shop.default_country
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("STOREFRONT_SHOP_NAME") {
            self.shop.name = name;
        }

        if let Ok(code) = std::env::var("STOREFRONT_CURRENCY") {
            self.shop.currency_code = code.to_uppercase();
        }

        if let Ok(key) = std::env::var("STOREFRONT_PROJECT_KEY") {
            debug!(project_key = %key, "Overriding project key from environment");
            self.commerce.project_key = key;
        }

        if let Ok(url) = std::env::var("STOREFRONT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.commerce.api_url = url;
        }

        if let Ok(timeout) = std::env::var("STOREFRONT_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.commerce.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid STOREFRONT_TIMEOUT_SECS"),
            }
        }

        if let Ok(age) = std::env::var("STOREFRONT_MIN_AGE") {
            match age.parse::<u32>() {
                Ok(a) => self.accounts.min_customer_age = a,
                Err(_) => warn!(value = %age, "Ignoring invalid STOREFRONT_MIN_AGE"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn account_rules(&self) -> AccountRules {
        AccountRules {
            min_password_length: self.accounts.min_password_length,
            min_customer_age: self.accounts.min_customer_age,
        }
    }

    pub fn currency_code(&self) -> &str {
        &self.shop.currency_code
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.commerce.timeout_secs)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// Decimals above [`MAX_CURRENCY_DECIMALS`] are clamped.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.shop.currency_decimals.min(MAX_CURRENCY_DECIMALS));
        let divisor = 10_i64.pow(decimals);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();

        let amount = if decimals > 0 {
            format!("{}.{:0width$}", whole, frac, width = decimals as usize)
        } else {
            whole.to_string()
        };

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.shop.currency_symbol,
            amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let config = StorefrontConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_format_currency_without_decimals() {
        let mut config = StorefrontConfig::default();
        config.shop.currency_symbol = "¥".into();
        config.shop.currency_decimals = 0;
        assert_eq!(config.format_currency(1500), "¥1500");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();
        assert!(config.validate().is_ok());

        config.commerce.project_key = " ".into();
        assert!(config.validate().is_err());

        config.commerce.project_key = "shop".into();
        config.commerce.api_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        config.commerce.api_url = "https://example.com".into();
        config.accounts.min_password_length = 0;
        assert!(config.validate().is_err());

        config.accounts.min_password_length = 8;
        config.shop.default_country = "XX".into();
        assert!(config.validate().is_err());

        config.shop.default_country = "US".into();
        config.commerce.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_currency_decimals_are_bounded() {
        let config: StorefrontConfig = toml::from_str("[shop]\ncurrency_decimals = 19").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        // never panics, even when validation was skipped
        assert_eq!(config.format_currency(1999), "$0.1999");

        let config: StorefrontConfig = toml::from_str("[shop]\ncurrency_decimals = 4").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.format_currency(12345), "$1.2345");
    }

    #[test]
    fn test_min_customer_age_is_bounded() {
        let config: StorefrontConfig =
            toml::from_str("[accounts]\nmin_customer_age = 3000000000").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config: StorefrontConfig =
            toml::from_str("[accounts]\nmin_customer_age = 150").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [shop]
            name = "Corner Shop"

            [accounts]
            min_customer_age = 18
            "#,
        )
        .unwrap();

        assert_eq!(config.shop.name, "Corner Shop");
        assert_eq!(config.shop.currency_code, "USD");
        assert_eq!(config.account_rules().min_customer_age, 18);
        assert_eq!(config.commerce.timeout_secs, 10);
    }

    #[test]
    fn test_toml_serialization() {
        let config = StorefrontConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[shop]"));
        assert!(toml_str.contains("[commerce]"));
        assert!(toml_str.contains("[accounts]"));
    }
}
