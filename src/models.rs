//! Domain types: market rates, investment options and the prize amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RateSourceError, SimulationError};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Which field of a [`MarketRateSet`] an investment option reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateField {
    SelicAnnual,
    CdiAnnual,
    SavingsMonthly,
    RealEstateFundMonthly,
}

impl RateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateField::SelicAnnual => "selic_annual_percent",
            RateField::CdiAnnual => "cdi_annual_percent",
            RateField::SavingsMonthly => "savings_monthly_percent",
            RateField::RealEstateFundMonthly => "real_estate_fund_monthly_percent",
        }
    }
}

/// Market rates used by one simulation session, all in percent.
///
/// Selic and CDI are annual (% a.a.), savings and FII yield are monthly
/// (% a.m.). Every value is validated to lie in `[0, 100)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketRateSet {
    selic_annual_percent: Decimal,
    cdi_annual_percent: Decimal,
    savings_monthly_percent: Decimal,
    real_estate_fund_monthly_percent: Decimal,
}

impl MarketRateSet {
    /// Embedded reference rates, used whenever the live lookup is unavailable.
    pub const FALLBACK: MarketRateSet = MarketRateSet {
        selic_annual_percent: Decimal::from_parts(1225, 0, 0, false, 2),
        cdi_annual_percent: Decimal::from_parts(1215, 0, 0, false, 2),
        savings_monthly_percent: Decimal::from_parts(5, 0, 0, false, 1),
        real_estate_fund_monthly_percent: Decimal::from_parts(88, 0, 0, false, 2),
    };

    pub fn new(
        selic_annual_percent: Decimal,
        cdi_annual_percent: Decimal,
        savings_monthly_percent: Decimal,
        real_estate_fund_monthly_percent: Decimal,
    ) -> Result<Self, RateSourceError> {
        let rates = Self {
            selic_annual_percent,
            cdi_annual_percent,
            savings_monthly_percent,
            real_estate_fund_monthly_percent,
        };
        for field in [
            RateField::SelicAnnual,
            RateField::CdiAnnual,
            RateField::SavingsMonthly,
            RateField::RealEstateFundMonthly,
        ] {
            let value = rates.get(field);
            if value < Decimal::ZERO || value >= HUNDRED {
                return Err(RateSourceError::Implausible {
                    field: field.as_str(),
                    value,
                });
            }
        }
        Ok(rates)
    }

    pub fn get(&self, field: RateField) -> Decimal {
        match field {
            RateField::SelicAnnual => self.selic_annual_percent,
            RateField::CdiAnnual => self.cdi_annual_percent,
            RateField::SavingsMonthly => self.savings_monthly_percent,
            RateField::RealEstateFundMonthly => self.real_estate_fund_monthly_percent,
        }
    }

    pub fn selic_annual_percent(&self) -> Decimal {
        self.selic_annual_percent
    }

    pub fn cdi_annual_percent(&self) -> Decimal {
        self.cdi_annual_percent
    }

    pub fn savings_monthly_percent(&self) -> Decimal {
        self.savings_monthly_percent
    }

    pub fn real_estate_fund_monthly_percent(&self) -> Decimal {
        self.real_estate_fund_monthly_percent
    }
}

impl Default for MarketRateSet {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Where a rate set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    /// Banco Central lookup succeeded
    Live,
    /// Embedded or configured reference values
    Fallback,
}

impl RateOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateOrigin::Live => "LIVE",
            RateOrigin::Fallback => "FALLBACK",
        }
    }
}

/// How the stored rate relates to a month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateConvention {
    /// Already a monthly percentage, used as-is
    Monthly,
    /// Annual percentage, de-annualized geometrically
    Annual,
}

/// Income tax applied to the projected yield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxTreatment {
    /// Poupança and FII distributions to individuals
    Exempt,
    /// Fixed income held for more than 720 days (15% bracket)
    LongTermWithholding,
}

/// The closed set of investment vehicles the simulator compares
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentOption {
    SavingsAccount,     // Poupança
    GovernmentBondFund, // Tesouro Selic
    CdiLinkedDeposit,   // "Caixinha" / 100% do CDI
    RealEstateFund,     // FIIs
}

impl InvestmentOption {
    /// Display order on the results screen
    pub const ALL: [InvestmentOption; 4] = [
        InvestmentOption::SavingsAccount,
        InvestmentOption::GovernmentBondFund,
        InvestmentOption::CdiLinkedDeposit,
        InvestmentOption::RealEstateFund,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            InvestmentOption::SavingsAccount => "poupanca",
            InvestmentOption::GovernmentBondFund => "selic",
            InvestmentOption::CdiLinkedDeposit => "cdi",
            InvestmentOption::RealEstateFund => "fiis",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InvestmentOption::SavingsAccount => "Poupança",
            InvestmentOption::GovernmentBondFund => "Tesouro Selic",
            InvestmentOption::CdiLinkedDeposit => "Caixinha / Porquinho",
            InvestmentOption::RealEstateFund => "Fundos Imobiliários",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InvestmentOption::SavingsAccount => {
                "Isenta de Imposto de Renda. Liquidez imediata, mas o menor rendimento da lista."
            }
            InvestmentOption::GovernmentBondFund => {
                "O investimento mais seguro do Brasil. Emprestado diretamente para o Governo Federal."
            }
            InvestmentOption::CdiLinkedDeposit => {
                "100% do CDI. Praticidade com rendimento diário superior à poupança."
            }
            InvestmentOption::RealEstateFund => {
                "Aluguéis mensais isentos de IR. Viver de renda com imóveis sem burocracia."
            }
        }
    }

    /// Material icon identifier
    pub fn icon(&self) -> &'static str {
        match self {
            InvestmentOption::SavingsAccount => "savings",
            InvestmentOption::GovernmentBondFund => "account_balance_wallet",
            InvestmentOption::CdiLinkedDeposit => "payments",
            InvestmentOption::RealEstateFund => "apartment",
        }
    }

    /// Hex color of the option's section
    pub fn color(&self) -> &'static str {
        match self {
            InvestmentOption::SavingsAccount => "#005295",
            InvestmentOption::GovernmentBondFund => "#004279",
            InvestmentOption::CdiLinkedDeposit => "#00315c",
            InvestmentOption::RealEstateFund => "#00213f",
        }
    }

    pub fn rate_field(&self) -> RateField {
        match self {
            InvestmentOption::SavingsAccount => RateField::SavingsMonthly,
            InvestmentOption::GovernmentBondFund => RateField::SelicAnnual,
            InvestmentOption::CdiLinkedDeposit => RateField::CdiAnnual,
            InvestmentOption::RealEstateFund => RateField::RealEstateFundMonthly,
        }
    }

    pub fn convention(&self) -> RateConvention {
        match self {
            InvestmentOption::SavingsAccount | InvestmentOption::RealEstateFund => {
                RateConvention::Monthly
            }
            InvestmentOption::GovernmentBondFund | InvestmentOption::CdiLinkedDeposit => {
                RateConvention::Annual
            }
        }
    }

    pub fn tax(&self) -> TaxTreatment {
        match self {
            InvestmentOption::SavingsAccount | InvestmentOption::RealEstateFund => {
                TaxTreatment::Exempt
            }
            InvestmentOption::GovernmentBondFund | InvestmentOption::CdiLinkedDeposit => {
                TaxTreatment::LongTermWithholding
            }
        }
    }
}

impl fmt::Display for InvestmentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InvestmentOption {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poupanca" | "savings" | "savings_account" => Ok(InvestmentOption::SavingsAccount),
            "selic" | "tesouro" | "government_bond_fund" => {
                Ok(InvestmentOption::GovernmentBondFund)
            }
            "cdi" | "caixinha" | "cdi_linked_deposit" => Ok(InvestmentOption::CdiLinkedDeposit),
            "fiis" | "fii" | "real_estate_fund" => Ok(InvestmentOption::RealEstateFund),
            other => Err(SimulationError::UnknownOption(other.to_string())),
        }
    }
}

/// Prize amount entered by the user, in reais with 2 fraction digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PrincipalAmount(Decimal);

impl PrincipalAmount {
    pub fn new(value: Decimal) -> Result<Self, SimulationError> {
        if value < Decimal::ZERO {
            return Err(SimulationError::NegativeAmount(value));
        }
        Ok(Self(value.round_dp(2)))
    }

    /// Accepts only strictly positive amounts, the confirm-action rule
    pub fn positive(value: Decimal) -> Result<Self, SimulationError> {
        if value <= Decimal::ZERO {
            return Err(SimulationError::NonPositiveAmount(value));
        }
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fallback_matches_reference_values() {
        let rates = MarketRateSet::FALLBACK;
        assert_eq!(rates.selic_annual_percent(), dec!(12.25));
        assert_eq!(rates.cdi_annual_percent(), dec!(12.15));
        assert_eq!(rates.savings_monthly_percent(), dec!(0.5));
        assert_eq!(rates.real_estate_fund_monthly_percent(), dec!(0.88));
    }

    #[test]
    fn test_rate_set_rejects_implausible_values() {
        let err = MarketRateSet::new(dec!(-1), dec!(10), dec!(0.5), dec!(0.8)).unwrap_err();
        assert!(err.to_string().contains("selic_annual_percent"));

        assert!(MarketRateSet::new(dec!(12), dec!(100), dec!(0.5), dec!(0.8)).is_err());
        assert!(MarketRateSet::new(dec!(0), dec!(0), dec!(0), dec!(0)).is_ok());
    }

    #[test]
    fn test_option_metadata_is_wired_to_rate_fields() {
        assert_eq!(
            InvestmentOption::SavingsAccount.rate_field(),
            RateField::SavingsMonthly
        );
        assert_eq!(
            InvestmentOption::CdiLinkedDeposit.convention(),
            RateConvention::Annual
        );
        assert_eq!(
            InvestmentOption::RealEstateFund.tax(),
            TaxTreatment::Exempt
        );
        assert_eq!(
            InvestmentOption::GovernmentBondFund.tax(),
            TaxTreatment::LongTermWithholding
        );
    }

    #[test]
    fn test_option_from_str() {
        assert_eq!(
            "POUPANCA".parse::<InvestmentOption>().unwrap(),
            InvestmentOption::SavingsAccount
        );
        assert_eq!(
            "fii".parse::<InvestmentOption>().unwrap(),
            InvestmentOption::RealEstateFund
        );
        for option in InvestmentOption::ALL {
            assert_eq!(option.id().parse::<InvestmentOption>().unwrap(), option);
        }
        assert!("nubank".parse::<InvestmentOption>().is_err());
    }

    #[test]
    fn test_principal_amount_rules() {
        assert!(PrincipalAmount::new(dec!(-0.01)).is_err());
        assert!(PrincipalAmount::new(dec!(0)).is_ok());
        assert!(PrincipalAmount::positive(dec!(0)).is_err());
        assert_eq!(
            PrincipalAmount::positive(dec!(10.005)).unwrap().value(),
            dec!(10.00)
        );
    }
}
