// Rates module - current market rates with an offline fallback

pub mod bcb;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RateSourceError;
use crate::models::{MarketRateSet, RateOrigin};

pub use bcb::BcbRateSource;

/// A remote (or scripted) supplier of market rates.
///
/// Implementations may fail freely; callers go through
/// [`current_rates_or_fallback`], which never does.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short identifier used in diagnostics
    fn id(&self) -> &'static str;

    /// Origin reported for a successful fetch
    fn origin(&self) -> RateOrigin {
        RateOrigin::Live
    }

    async fn fetch_rates(&self) -> Result<MarketRateSet, RateSourceError>;
}

/// Serves a static rate set; backs offline mode.
pub struct FixedRateSource {
    rates: MarketRateSet,
}

impl FixedRateSource {
    pub fn new(rates: MarketRateSet) -> Self {
        Self { rates }
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    fn id(&self) -> &'static str {
        "FIXED"
    }

    fn origin(&self) -> RateOrigin {
        RateOrigin::Fallback
    }

    async fn fetch_rates(&self) -> Result<MarketRateSet, RateSourceError> {
        Ok(self.rates)
    }
}

/// Query `source` once; on any failure return `fallback` and log why.
pub async fn current_rates_or_fallback(
    source: &dyn RateSource,
    fallback: MarketRateSet,
) -> (MarketRateSet, RateOrigin) {
    match source.fetch_rates().await {
        Ok(rates) => {
            let origin = source.origin();
            info!(
                "Using {} rates from {} (Selic {}% a.a.)",
                origin.as_str(),
                source.id(),
                rates.selic_annual_percent()
            );
            (rates, origin)
        }
        Err(e) => {
            warn!(
                "Error fetching rates from {}, using fallbacks: {}",
                source.id(),
                e
            );
            (fallback, RateOrigin::Fallback)
        }
    }
}

/// Current rates for one simulation session, per `config`.
///
/// Never fails: offline mode, a client that cannot be built, and every
/// lookup error all resolve to the configured fallback set.
pub async fn current_rates(config: &Config) -> (MarketRateSet, RateOrigin) {
    let fallback = match config.fallback_rates() {
        Ok(rates) => rates,
        Err(e) => {
            warn!("Configured fallback rates are invalid ({}), using built-in values", e);
            MarketRateSet::FALLBACK
        }
    };

    if config.offline {
        debug!("Offline mode, skipping rate lookup");
        return current_rates_or_fallback(&FixedRateSource::new(fallback), fallback).await;
    }

    match BcbRateSource::from_config(config) {
        Ok(source) => current_rates_or_fallback(&source, fallback).await,
        Err(e) => {
            warn!("Could not build BCB client, using fallbacks: {}", e);
            (fallback, RateOrigin::Fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FailingSource;

    #[async_trait]
    impl RateSource for FailingSource {
        fn id(&self) -> &'static str {
            "FAILING"
        }

        async fn fetch_rates(&self) -> Result<MarketRateSet, RateSourceError> {
            Err(RateSourceError::Status(500))
        }
    }

    struct ScriptedSource(MarketRateSet);

    #[async_trait]
    impl RateSource for ScriptedSource {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        async fn fetch_rates(&self) -> Result<MarketRateSet, RateSourceError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_failure_resolves_to_exact_fallback() {
        let (rates, origin) =
            current_rates_or_fallback(&FailingSource, MarketRateSet::FALLBACK).await;
        assert_eq!(rates, MarketRateSet::FALLBACK);
        assert_eq!(rates.selic_annual_percent(), dec!(12.25));
        assert_eq!(rates.cdi_annual_percent(), dec!(12.15));
        assert_eq!(rates.savings_monthly_percent(), dec!(0.5));
        assert_eq!(rates.real_estate_fund_monthly_percent(), dec!(0.88));
        assert_eq!(origin, RateOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_success_is_marked_live() {
        let live = MarketRateSet::new(dec!(15), dec!(14.9), dec!(0.5), dec!(0.9)).unwrap();
        let (rates, origin) =
            current_rates_or_fallback(&ScriptedSource(live), MarketRateSet::FALLBACK).await;
        assert_eq!(rates, live);
        assert_eq!(origin, RateOrigin::Live);
    }

    #[tokio::test]
    async fn test_fixed_source_reports_fallback_origin() {
        let custom = MarketRateSet::new(dec!(10), dec!(9.9), dec!(0.5), dec!(0.8)).unwrap();
        let (rates, origin) =
            current_rates_or_fallback(&FixedRateSource::new(custom), MarketRateSet::FALLBACK)
                .await;
        assert_eq!(rates, custom);
        assert_eq!(origin, RateOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_offline_config_never_touches_network() {
        let config = Config {
            offline: true,
            rates_url: "http://127.0.0.1:1/unreachable".to_string(),
            ..Config::default()
        };
        let (rates, origin) = current_rates(&config).await;
        assert_eq!(rates, MarketRateSet::FALLBACK);
        assert_eq!(origin, RateOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let config = Config {
            rates_url: "http://127.0.0.1:1/unreachable".to_string(),
            fetch_timeout_secs: 2,
            ..Config::default()
        };
        let (rates, origin) = current_rates(&config).await;
        assert_eq!(rates, MarketRateSet::FALLBACK);
        assert_eq!(origin, RateOrigin::Fallback);
    }
}
