//! Error handling for Premio
//!
//! Typed errors for the library modules and a unified Result alias
//! using anyhow for context chaining at the application boundary.

use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a rate lookup. Never surfaced to the user: the rate module
/// converts every one of them into the fallback rate set.
#[derive(Error, Debug)]
pub enum RateSourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status: {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("implausible rate {field}: {value}")]
    Implausible { field: &'static str, value: Decimal },
}

/// Errors from the simulation inputs and session transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),

    #[error("amount cannot be negative (got {0})")]
    NegativeAmount(Decimal),

    #[error("unknown investment option: {0}")]
    UnknownOption(String),

    #[error("results are already being shown; reset before a new simulation")]
    AlreadyShowingResults,
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = RateSourceError::Status(503);
        assert_eq!(err.to_string(), "unexpected http status: 503");

        let err = RateSourceError::MissingField("valor");
        assert_eq!(err.to_string(), "missing field in response: valor");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(anyhow::Error::new(ConfigError::Invalid {
            key: "cdi_spread",
            reason: "must not be negative".to_string(),
        }))
        .context("failed to load configuration");
        match result {
            Err(e) => {
                assert!(e.to_string().contains("failed to load configuration"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("cdi_spread"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_simulation_error_variants() {
        let err = SimulationError::NonPositiveAmount(Decimal::ZERO);
        assert!(err.to_string().starts_with("amount must be greater than zero"));

        let err = SimulationError::UnknownOption("nubank".to_string());
        assert_eq!(err.to_string(), "unknown investment option: nubank");
    }
}
