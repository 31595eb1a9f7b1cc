//! Application configuration loaded from the environment.
//!
//! `.env` is read first when present. Every setting has a default, so an
//! empty environment yields a working development setup.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::pricing::models::{default_packages, PricingRates, TruckSurcharges};

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pricing: PricingRates,
    pub quotes: QuoteConfig,
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|source| ConfigError::InvalidHost {
            value: self.host.clone(),
            source,
        })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Draft session and quote lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteConfig {
    /// Days a finalized quote stays valid
    pub validity_days: u32,
    /// Upper bound on drafts held in memory
    pub max_sessions: u64,
    /// Drafts untouched for this long are dropped
    pub idle_minutes: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            validity_days: 30,
            max_sessions: 1000,
            idle_minutes: 120,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16 (got '{0}')")]
    InvalidPort(String),

    #[error("APP_HOST must parse to an IPv4 or IPv6 address (got '{value}')")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{key} must be a non-negative decimal (got '{value}')")]
    InvalidDecimal { key: String, value: String },

    #[error("{key} must be a positive integer (got '{value}')")]
    InvalidInteger { key: String, value: String },
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => 3000,
        };
        let log_level = lookup("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let defaults = PricingRates::default();
        let pricing = PricingRates {
            currency: lookup("PRICING_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or(defaults.currency),
            volume_rate: decimal(&lookup, "PRICING_VOLUME_RATE", defaults.volume_rate)?,
            distance_rate: decimal(&lookup, "PRICING_DISTANCE_RATE", defaults.distance_rate)?,
            truck: TruckSurcharges {
                small: decimal(&lookup, "PRICING_TRUCK_SMALL", defaults.truck.small)?,
                medium: decimal(&lookup, "PRICING_TRUCK_MEDIUM", defaults.truck.medium)?,
                large: decimal(&lookup, "PRICING_TRUCK_LARGE", defaults.truck.large)?,
            },
            packages: default_packages(),
        };

        let quote_defaults = QuoteConfig::default();
        let quotes = QuoteConfig {
            validity_days: positive(&lookup, "QUOTE_VALIDITY_DAYS", quote_defaults.validity_days)?,
            max_sessions: positive(&lookup, "DRAFT_MAX_SESSIONS", quote_defaults.max_sessions)?,
            idle_minutes: positive(&lookup, "DRAFT_IDLE_MINUTES", quote_defaults.idle_minutes)?,
        };

        Ok(Self {
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing,
            quotes,
        })
    }
}

fn decimal<F>(lookup: &F, key: &str, default: Decimal) -> Result<Decimal, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match Decimal::from_str(raw.trim()) {
        Ok(value) if !value.is_sign_negative() || value.is_zero() => Ok(value),
        _ => Err(ConfigError::InvalidDecimal {
            key: key.to_string(),
            value: raw,
        }),
    }
}

fn positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidInteger {
            key: key.to_string(),
            value: raw,
        }),
    }
}
