//! Banco Central do Brasil SGS client.
//!
//! Only the Selic target (series 432) is fetched. CDI is estimated from it
//! with a configurable spread, since the monthly CDI series only carries a
//! partial accumulation early in the month.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info};

use super::RateSource;
use crate::config::Config;
use crate::error::RateSourceError;
use crate::models::MarketRateSet;
use crate::projection::annual_to_monthly;

/// Above this Selic (% a.a.) poupança pays a fixed 0.5% a.m. (+ TR)
const SAVINGS_SELIC_THRESHOLD: Decimal = Decimal::from_parts(85, 0, 0, false, 1);
const SAVINGS_FIXED_MONTHLY: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
/// At or below the threshold poupança pays 70% of Selic
const SAVINGS_SELIC_SHARE: Decimal = Decimal::from_parts(70, 0, 0, false, 2);

/// One data point of an SGS series
#[derive(Debug, Deserialize)]
struct SgsDataPoint {
    data: Option<String>,
    valor: Option<String>,
}

/// Rate source backed by the BCB SGS JSON API
pub struct BcbRateSource {
    client: Client,
    url: String,
    cdi_spread: Decimal,
    real_estate_fund_monthly_percent: Decimal,
}

impl BcbRateSource {
    pub fn from_config(config: &Config) -> Result<Self, RateSourceError> {
        let client = Client::builder()
            .user_agent(concat!("premio/", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.rates_url.clone(),
            cdi_spread: config.cdi_spread,
            real_estate_fund_monthly_percent: config.real_estate_fund_monthly_percent,
        })
    }
}

#[async_trait]
impl RateSource for BcbRateSource {
    fn id(&self) -> &'static str {
        "BCB"
    }

    async fn fetch_rates(&self) -> Result<MarketRateSet, RateSourceError> {
        info!("Fetching Selic from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let selic = parse_selic_response(&body)?;
        derive_rates(
            selic,
            self.cdi_spread,
            self.real_estate_fund_monthly_percent,
        )
    }
}

/// Extract the latest `valor` of an SGS response body.
///
/// The body is a JSON array such as `[{"data":"17/10/2026","valor":"12,25"}]`.
pub fn parse_selic_response(body: &str) -> Result<Decimal, RateSourceError> {
    let points: Vec<SgsDataPoint> = serde_json::from_str(body)?;
    let point = points
        .into_iter()
        .next()
        .ok_or(RateSourceError::MissingField("valor"))?;

    let valor = point
        .valor
        .filter(|v| !v.trim().is_empty())
        .ok_or(RateSourceError::MissingField("valor"))?;

    let selic = parse_decimal_comma(&valor)?;
    debug!(
        "SGS 432 data point {}: {}",
        point.data.as_deref().unwrap_or("?"),
        selic
    );
    Ok(selic)
}

/// Parse a decimal-comma number: `"12,25"` → 12.25
pub fn parse_decimal_comma(value: &str) -> Result<Decimal, RateSourceError> {
    let normalized = value.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|e| RateSourceError::Parse(format!("{:?}: {}", value, e)))
}

/// Regulated poupança monthly rate (% a.m.) for a given Selic (% a.a.).
/// TR is taken as zero.
pub fn savings_monthly_percent(selic_annual_percent: Decimal) -> Decimal {
    if selic_annual_percent > SAVINGS_SELIC_THRESHOLD {
        SAVINGS_FIXED_MONTHLY
    } else {
        let annual = selic_annual_percent * SAVINGS_SELIC_SHARE / Decimal::ONE_HUNDRED;
        annual_to_monthly(annual) * Decimal::ONE_HUNDRED
    }
}

/// Build the full rate set from a fetched Selic
pub fn derive_rates(
    selic_annual_percent: Decimal,
    cdi_spread: Decimal,
    real_estate_fund_monthly_percent: Decimal,
) -> Result<MarketRateSet, RateSourceError> {
    let cdi = (selic_annual_percent - cdi_spread).max(Decimal::ZERO);
    MarketRateSet::new(
        selic_annual_percent,
        cdi,
        savings_monthly_percent(selic_annual_percent),
        real_estate_fund_monthly_percent,
    )
}
