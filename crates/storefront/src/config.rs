//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SATWA_HOST` - Bind address (default: 127.0.0.1)
//! - `SATWA_PORT` - Listen port (default: 5000)
//! - `SATWA_ORDER_SERVICE_URL` - Order Service base URL (default: <http://127.0.0.1:5000/api/>)
//! - `SATWA_ORDER_TOKEN` - Bearer token sent to the Order Service
//! - `SATWA_ORDER_TIMEOUT_SECS` - Checkout submit timeout (default: 15)
//! - `SATWA_DATA_DIR` - Directory for cart/wishlist snapshots (default: .satwa)
//! - `SATWA_FLAT_SHIPPING_FEE` - Shipping charged at or below the threshold (default: 10.00)
//! - `SATWA_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 100.00)
//! - `SATWA_TAX_RATE` - Tax rate as a fraction (default: 0.08)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use satwa_core::Price;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::pricing::PricingRules;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the mock API to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where checkout sends orders
    pub order_service: OrderServiceConfig,
    /// Directory holding cart and wishlist snapshots
    pub data_dir: PathBuf,
    /// Shipping and tax constants
    pub pricing: PricingRules,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Order Service connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct OrderServiceConfig {
    /// Base URL; orders are posted to `{base_url}orders`
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Upper bound on one submission
    pub timeout: Duration,
}

impl std::fmt::Debug for OrderServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderServiceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value or the
    /// order token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env.parse_or("SATWA_HOST", "127.0.0.1", str::parse::<IpAddr>)?;
        let port = env.parse_or("SATWA_PORT", "5000", str::parse::<u16>)?;
        let data_dir = PathBuf::from(env.get_or_default("SATWA_DATA_DIR", ".satwa"));

        Ok(Self {
            host,
            port,
            order_service: OrderServiceConfig::from_env(&env)?,
            data_dir,
            pricing: pricing_from_env(&env)?,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl OrderServiceConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let base_url = env.parse_or(
            "SATWA_ORDER_SERVICE_URL",
            "http://127.0.0.1:5000/api/",
            Url::parse,
        )?;
        let timeout_secs = env.parse_or("SATWA_ORDER_TIMEOUT_SECS", "15", str::parse::<u64>)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SATWA_ORDER_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let token = match env.get_optional("SATWA_ORDER_TOKEN") {
            Some(value) => {
                validate_secret_strength(&value, "SATWA_ORDER_TOKEN")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn pricing_from_env<F: Fn(&str) -> Option<String>>(
    env: &Env<F>,
) -> Result<PricingRules, ConfigError> {
    let flat_shipping_fee = env.parse_or("SATWA_FLAT_SHIPPING_FEE", "10.00", str::parse::<Price>)?;
    let free_shipping_threshold =
        env.parse_or("SATWA_FREE_SHIPPING_THRESHOLD", "100.00", str::parse::<Price>)?;
    let tax_rate = env.parse_or("SATWA_TAX_RATE", "0.08", str::parse::<Decimal>)?;

    for (key, price) in [
        ("SATWA_FLAT_SHIPPING_FEE", flat_shipping_fee),
        ("SATWA_FREE_SHIPPING_THRESHOLD", free_shipping_threshold),
    ] {
        if price.is_negative() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
    }
    if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "SATWA_TAX_RATE".to_string(),
            "must be between 0 and 1".to_string(),
        ));
    }

    Ok(PricingRules {
        flat_shipping_fee,
        free_shipping_threshold,
        tax_rate,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source. Empty values count as unset.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional environment variable.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get an environment variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to `default` when unset.
    fn parse_or<T, E: std::fmt::Display>(
        &self,
        key: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<T, ConfigError> {
        let raw = self.get_or_default(key, default);
        parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}
