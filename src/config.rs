//! Runtime configuration
//!
//! Settings come from an optional TOML file at
//! `<config_home>/premio/config.toml` (or `--config <path>`), then from
//! `PREMIO_*` environment variables. A missing default file means defaults.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{ConfigError, RateSourceError};
use crate::models::MarketRateSet;

/// BCB SGS series 432: Selic target, % a.a., last data point
pub const DEFAULT_RATES_URL: &str =
    "https://api.bcb.gov.br/dados/serie/bcdata.sgs.432/dados/ultimos/1?formato=json";

const CONFIG_DIR: &str = "premio";
const CONFIG_FILENAME: &str = "config.toml";

/// Reference rates used when the live lookup fails
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackRates {
    pub selic: Decimal,
    pub cdi: Decimal,
    pub savings: Decimal,
    pub real_estate_fund: Decimal,
}

impl Default for FallbackRates {
    fn default() -> Self {
        let rates = MarketRateSet::FALLBACK;
        Self {
            selic: rates.selic_annual_percent(),
            cdi: rates.cdi_annual_percent(),
            savings: rates.savings_monthly_percent(),
            real_estate_fund: rates.real_estate_fund_monthly_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Endpoint returning the latest Selic data point
    pub rates_url: String,
    /// Whole-request timeout for the rate lookup
    pub fetch_timeout_secs: u64,
    /// How long the results screen waits for live rates before handing
    /// control back to the user
    pub refresh_grace_ms: u64,
    /// CDI is estimated as `selic - cdi_spread`
    pub cdi_spread: Decimal,
    /// Average FII distribution, % a.m.
    pub real_estate_fund_monthly_percent: Decimal,
    pub fallback: FallbackRates,
    /// Skip the remote lookup entirely
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rates_url: DEFAULT_RATES_URL.to_string(),
            fetch_timeout_secs: 5,
            refresh_grace_ms: 2000,
            cdi_spread: Decimal::from_parts(10, 0, 0, false, 2),
            real_estate_fund_monthly_percent: MarketRateSet::FALLBACK
                .real_estate_fund_monthly_percent(),
            fallback: FallbackRates::default(),
            offline: false,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.cdi_spread < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                key: "cdi_spread",
                reason: "must not be negative".to_string(),
            });
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "fetch_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.rates_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "rates_url",
                reason: "must not be empty".to_string(),
            });
        }
        self.fallback_rates().map_err(|e| ConfigError::Invalid {
            key: "fallback",
            reason: e.to_string(),
        })?;
        if self.real_estate_fund_monthly_percent < Decimal::ZERO
            || self.real_estate_fund_monthly_percent >= Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::Invalid {
                key: "real_estate_fund_monthly_percent",
                reason: format!(
                    "{} is not a plausible percentage",
                    self.real_estate_fund_monthly_percent
                ),
            });
        }
        Ok(())
    }

    /// The configured fallback as a validated rate set
    pub fn fallback_rates(&self) -> std::result::Result<MarketRateSet, RateSourceError> {
        MarketRateSet::new(
            self.fallback.selic,
            self.fallback.cdi,
            self.fallback.savings,
            self.fallback.real_estate_fund,
        )
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn refresh_grace(&self) -> Duration {
        Duration::from_millis(self.refresh_grace_ms)
    }

    /// Apply `PREMIO_OFFLINE` and `PREMIO_RATES_URL`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("PREMIO_OFFLINE") {
            self.offline = value != "0" && !value.is_empty();
        }
        if let Some(url) = lookup("PREMIO_RATES_URL") {
            if !url.trim().is_empty() {
                self.rates_url = url;
            }
        }
    }
}

/// Default config file location, respecting `XDG_CONFIG_HOME`
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load configuration.
///
/// An explicit `path` must exist; the default location is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(p) => (Some(p.to_path_buf()), true),
        None => (default_config_path(), false),
    };

    let mut config = match path {
        Some(path) if required || path.exists() => {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            Config::from_toml_str(&content)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        _ => {
            debug!("No config file found, using defaults");
            Config::default()
        }
    };

    config.apply_env_overrides();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
