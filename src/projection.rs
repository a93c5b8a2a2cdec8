//! Monthly passive-income projection per investment option.
//!
//! Annual rates are de-annualized geometrically, `(1 + r)^(1/12) - 1`,
//! never by dividing by 12. Taxable options pay the 15% long-term
//! withholding bracket (holdings beyond 720 days); no holding period is
//! tracked, every simulation is assumed to be a long-term one.

use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

use crate::models::{
    InvestmentOption, MarketRateSet, PrincipalAmount, RateConvention, TaxTreatment,
};
use crate::utils::format_number_br;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Share of the gross yield kept after the 15% long-term withholding tax
pub const LONG_TERM_TAX_FACTOR: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// One row of the results screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub option: InvestmentOption,
    pub name: &'static str,
    pub rate_label: String,
    /// Effective monthly rate before tax, in percent
    pub monthly_rate_percent: Decimal,
    pub monthly_income: Decimal,
    pub annual_income: Decimal,
}

/// Convert an annual rate (as a fraction) to the equivalent monthly rate.
///
/// # Examples
/// ```
/// use premio::projection::annual_to_monthly;
/// use rust_decimal_macros::dec;
///
/// let monthly = annual_to_monthly(dec!(0.1268250301319698));
/// assert!((monthly - dec!(0.01)).abs() < dec!(0.000001));
/// ```
pub fn annual_to_monthly(annual: Decimal) -> Decimal {
    if annual.is_zero() {
        return Decimal::ZERO;
    }
    (Decimal::ONE + annual).powd(Decimal::ONE / MONTHS_PER_YEAR) - Decimal::ONE
}

/// Monthly rate (as a fraction) an option earns under `rates`, before tax
pub fn monthly_rate(option: InvestmentOption, rates: &MarketRateSet) -> Decimal {
    let percent = rates.get(option.rate_field());
    match option.convention() {
        RateConvention::Monthly => percent / HUNDRED,
        RateConvention::Annual => annual_to_monthly(percent / HUNDRED),
    }
}

/// Projected monthly income, net of tax, for `principal` invested in `option`
pub fn projected_monthly_yield(
    principal: PrincipalAmount,
    option: InvestmentOption,
    rates: &MarketRateSet,
) -> Decimal {
    let gross = principal.value() * monthly_rate(option, rates);
    match option.tax() {
        TaxTreatment::Exempt => gross,
        TaxTreatment::LongTermWithholding => gross * LONG_TERM_TAX_FACTOR,
    }
}

/// Rate as shown next to an option: "0,5% a.m." or "12,25% a.a."
pub fn rate_label(option: InvestmentOption, rates: &MarketRateSet) -> String {
    let percent = rates.get(option.rate_field());
    match option.convention() {
        RateConvention::Monthly => format!("{}% a.m.", format_number_br(percent, 0, 4)),
        RateConvention::Annual => format!("{}% a.a.", format_number_br(percent, 2, 2)),
    }
}

pub fn project(
    principal: PrincipalAmount,
    option: InvestmentOption,
    rates: &MarketRateSet,
) -> Projection {
    let monthly_income = projected_monthly_yield(principal, option, rates);
    Projection {
        option,
        name: option.name(),
        rate_label: rate_label(option, rates),
        monthly_rate_percent: monthly_rate(option, rates) * HUNDRED,
        monthly_income,
        annual_income: monthly_income * MONTHS_PER_YEAR,
    }
}

/// Project every option, in display order
pub fn project_all(principal: PrincipalAmount, rates: &MarketRateSet) -> Vec<Projection> {
    InvestmentOption::ALL
        .iter()
        .map(|option| project(principal, *option, rates))
        .collect()
}
