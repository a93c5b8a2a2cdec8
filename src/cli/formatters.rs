//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of the projection math from presentation.

use colored::Colorize;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::models::{InvestmentOption, MarketRateSet, PrincipalAmount, RateOrigin};
use crate::projection::Projection;
use crate::utils::{format_compact_currency, format_currency, format_number_br};

fn origin_note(origin: RateOrigin) -> String {
    match origin {
        RateOrigin::Live => "Taxas atualizadas via Banco Central (SGS 432)"
            .green()
            .to_string(),
        RateOrigin::Fallback => "Taxas de referência (Banco Central indisponível ou modo offline)"
            .yellow()
            .to_string(),
    }
}

/// Format the results screen for terminal output
pub fn format_results_table(
    principal: PrincipalAmount,
    projections: &[Projection],
    origin: RateOrigin,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} Se você ganhasse {}\n",
        "🎰".bold(),
        format_currency(principal.value()).bold()
    ));
    output.push_str("Quanto esse prêmio depositaria na sua conta todos os meses:\n\n");

    #[derive(Tabled)]
    struct ProjectionRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Investimento")]
        name: String,
        #[tabled(rename = "Taxa")]
        rate: String,
        #[tabled(rename = "Renda mensal")]
        monthly: String,
        #[tabled(rename = "Resumo")]
        compact: String,
    }

    let rows: Vec<ProjectionRow> = projections
        .iter()
        .enumerate()
        .map(|(i, p)| ProjectionRow {
            index: i + 1,
            name: p.name.to_string(),
            rate: p.rate_label.clone(),
            monthly: format_currency(p.monthly_income).green().to_string(),
            compact: format_compact_currency(p.monthly_income),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align the numeric columns
    table.modify(Columns::new(2..), Alignment::right());
    output.push_str(&table.to_string());
    output.push('\n');

    for (i, p) in projections.iter().enumerate() {
        output.push_str(&format!(
            "\n {} {}: {}",
            format!("{}.", i + 1).bright_black(),
            p.name.bold(),
            p.option.description()
        ));
    }

    if let Some(fii) = projections
        .iter()
        .find(|p| p.option == InvestmentOption::RealEstateFund)
    {
        output.push_str(&format!(
            "\n\n{} Em FIIs, você receberia cerca de {} extra todo mês.",
            "🏢".bold(),
            format_currency(fii.monthly_income).bold()
        ));
    }

    output.push_str(&format!(
        "\n\n{}\n{}\n",
        "IR de 15% (prazo acima de 720 dias) sobre Tesouro Selic e CDI; poupança e FIIs isentos."
            .bright_black(),
        origin_note(origin)
    ));

    output
}

/// Format a rate set for terminal output
pub fn format_rates_table(rates: &MarketRateSet, origin: RateOrigin) -> String {
    #[derive(Tabled)]
    struct RateRow {
        #[tabled(rename = "Taxa")]
        name: &'static str,
        #[tabled(rename = "Valor")]
        value: String,
    }

    let rows = vec![
        RateRow {
            name: "Selic",
            value: format!("{}% a.a.", format_number_br(rates.selic_annual_percent(), 2, 2)),
        },
        RateRow {
            name: "CDI",
            value: format!("{}% a.a.", format_number_br(rates.cdi_annual_percent(), 2, 2)),
        },
        RateRow {
            name: "Poupança",
            value: format!("{}% a.m.", format_number_br(rates.savings_monthly_percent(), 0, 4)),
        },
        RateRow {
            name: "FIIs",
            value: format!(
                "{}% a.m.",
                format_number_br(rates.real_estate_fund_monthly_percent(), 0, 4)
            ),
        },
    ];

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    format!(
        "\n{} Taxas em uso\n\n{}\n{}\n",
        "📈".cyan().bold(),
        table,
        origin_note(origin)
    )
}

#[derive(Serialize)]
struct JsonProjection<'a> {
    option: &'a str,
    name: &'a str,
    icon: &'a str,
    color: &'a str,
    rate_label: &'a str,
    monthly_rate_percent: String,
    monthly_income: String,
    annual_income: String,
    monthly_income_display: String,
    monthly_income_compact: String,
}

#[derive(Serialize)]
struct JsonRates<'a> {
    origin: RateOrigin,
    #[serde(flatten)]
    rates: &'a MarketRateSet,
}

fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Format a simulation as JSON
pub fn format_results_json(
    principal: PrincipalAmount,
    projections: &[Projection],
    rates: &MarketRateSet,
    origin: RateOrigin,
) -> String {
    #[derive(Serialize)]
    struct JsonSimulation<'a> {
        principal: String,
        principal_display: String,
        rates: JsonRates<'a>,
        projections: Vec<JsonProjection<'a>>,
    }

    let doc = JsonSimulation {
        principal: money(principal.value()),
        principal_display: format_currency(principal.value()),
        rates: JsonRates { origin, rates },
        projections: projections
            .iter()
            .map(|p| JsonProjection {
                option: p.option.id(),
                name: p.name,
                icon: p.option.icon(),
                color: p.option.color(),
                rate_label: &p.rate_label,
                monthly_rate_percent: p.monthly_rate_percent.round_dp(6).to_string(),
                monthly_income: money(p.monthly_income),
                annual_income: money(p.annual_income),
                monthly_income_display: format_currency(p.monthly_income),
                monthly_income_compact: format_compact_currency(p.monthly_income),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&doc)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a rate set as JSON
pub fn format_rates_json(rates: &MarketRateSet, origin: RateOrigin) -> String {
    serde_json::to_string_pretty(&JsonRates { origin, rates })
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project_all;
    use rust_decimal_macros::dec;

    fn million() -> PrincipalAmount {
        PrincipalAmount::new(dec!(1000000)).unwrap()
    }

    #[test]
    fn test_results_table_shows_full_and_compact_amounts() {
        colored::control::set_override(false);
        let rows = project_all(million(), &MarketRateSet::FALLBACK);
        let output = format_results_table(million(), &rows, RateOrigin::Fallback);

        assert!(output.contains("R$ 1.000.000,00"));
        assert!(output.contains("R$ 5.000,00"));
        assert!(output.contains("R$ 8.800,00"));
        assert!(output.contains("R$ 9k"));
        assert!(output.contains("0,88% a.m."));
        assert!(output.contains("Taxas de referência"));
        assert!(output.contains("Em FIIs, você receberia cerca de R$ 8.800,00 extra todo mês."));
    }

    #[test]
    fn test_results_table_without_fii_row_has_no_fii_summary() {
        colored::control::set_override(false);
        let rows = vec![crate::projection::project(
            million(),
            InvestmentOption::SavingsAccount,
            &MarketRateSet::FALLBACK,
        )];
        let output = format_results_table(million(), &rows, RateOrigin::Fallback);
        assert!(output.contains("R$ 5.000,00"));
        assert!(!output.contains("Em FIIs"));
    }

    #[test]
    fn test_results_json_is_machine_readable() {
        let rows = project_all(million(), &MarketRateSet::FALLBACK);
        let json =
            format_results_json(million(), &rows, &MarketRateSet::FALLBACK, RateOrigin::Live);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["principal"], "1000000.00");
        assert_eq!(value["rates"]["origin"], "live");
        assert_eq!(value["projections"].as_array().unwrap().len(), 4);
        assert_eq!(value["projections"][0]["option"], "poupanca");
        assert_eq!(value["projections"][0]["monthly_income"], "5000.00");
        assert_eq!(value["projections"][3]["monthly_income_display"], "R$ 8.800,00");
        assert_eq!(value["projections"][0]["icon"], "savings");
        assert_eq!(value["projections"][3]["icon"], "apartment");
        assert_eq!(value["projections"][3]["color"], "#00213f");
    }

    #[test]
    fn test_rates_json_flattens_rate_fields() {
        let json = format_rates_json(&MarketRateSet::FALLBACK, RateOrigin::Fallback);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["origin"], "fallback");
        assert!(value.get("selic_annual_percent").is_some());
        assert!(value.get("real_estate_fund_monthly_percent").is_some());
    }
}
