//! Runtime configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ORDERS_HTTP_TIMEOUT_SECS` | `5` |
//! | `ORDERS_PAYMENT_URI` | `http://payment/paymentAuth` |
//! | `ORDERS_SHIPPING_URI` | `http://shipping/shipping` |
//! | `ORDERS_SHIPPING_FEE` | `4.99` |
//! | `ORDERS_POOL_MAX_WORKERS` | `50` |
//! | `ORDERS_POOL_QUEUE_CAPACITY` | `100` |
//! | `ORDERS_POOL_SATURATION` | `reject` (or `block`) |
//! | `ORDERS_PROXY_URL` | unset |

use crate::fetcher::{PoolConfig, SaturationPolicy};
use crate::orders::WorkflowSettings;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdersConfig {
    /// Bound on each individual join.
    pub timeout: Duration,
    pub payment_uri: String,
    pub shipping_uri: String,
    pub shipping_fee: Decimal,
    pub pool: PoolConfig,
    /// Optional HTTP proxy for outbound calls.
    pub proxy_url: Option<String>,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            payment_uri: "http://payment/paymentAuth".to_string(),
            shipping_uri: "http://shipping/shipping".to_string(),
            shipping_fee: Decimal::new(499, 2),
            pool: PoolConfig::default(),
            proxy_url: None,
        }
    }
}

impl OrdersConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_secs: u64 = parse(&lookup, "ORDERS_HTTP_TIMEOUT_SECS", defaults.timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(invalid("ORDERS_HTTP_TIMEOUT_SECS", "0", "must be at least 1"));
        }

        let shipping_fee: Decimal = parse(&lookup, "ORDERS_SHIPPING_FEE", defaults.shipping_fee)?;
        if shipping_fee.is_sign_negative() {
            return Err(invalid(
                "ORDERS_SHIPPING_FEE",
                &shipping_fee.to_string(),
                "must not be negative",
            ));
        }

        let max_workers: usize = parse(&lookup, "ORDERS_POOL_MAX_WORKERS", defaults.pool.max_workers)?;
        if max_workers == 0 {
            return Err(invalid("ORDERS_POOL_MAX_WORKERS", "0", "must be at least 1"));
        }

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            payment_uri: lookup("ORDERS_PAYMENT_URI").unwrap_or(defaults.payment_uri),
            shipping_uri: lookup("ORDERS_SHIPPING_URI").unwrap_or(defaults.shipping_uri),
            shipping_fee,
            pool: PoolConfig {
                max_workers,
                queue_capacity: parse(
                    &lookup,
                    "ORDERS_POOL_QUEUE_CAPACITY",
                    defaults.pool.queue_capacity,
                )?,
                saturation: parse(&lookup, "ORDERS_POOL_SATURATION", defaults.pool.saturation)?,
            },
            proxy_url: lookup("ORDERS_PROXY_URL").filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_payment_uri(mut self, uri: impl Into<String>) -> Self {
        self.payment_uri = uri.into();
        self
    }

    pub fn with_shipping_uri(mut self, uri: impl Into<String>) -> Self {
        self.shipping_uri = uri.into();
        self
    }

    pub fn with_shipping_fee(mut self, fee: Decimal) -> Self {
        self.shipping_fee = fee;
        self
    }

    pub fn with_pool(mut self, max_workers: usize, queue_capacity: usize, saturation: SaturationPolicy) -> Self {
        self.pool = PoolConfig {
            max_workers,
            queue_capacity,
            saturation,
        };
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            timeout: self.timeout,
            shipping_fee: self.shipping_fee,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(name, &raw, &e.to_string())),
    }
}

fn invalid(name: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
