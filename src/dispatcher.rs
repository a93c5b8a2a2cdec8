//! Routes parsed CLI commands to their handlers.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::formatters::{
    format_rates_json, format_rates_table, format_results_json, format_results_table,
};
use crate::cli::Commands;
use crate::config::Config;
use crate::models::{InvestmentOption, PrincipalAmount};
use crate::projection::{project, project_all};
use crate::rates;
use crate::utils::parse_currency_string;

/// Route a parsed command to its handler. No subcommand means the
/// interactive session.
pub async fn dispatch_command(
    command: Option<Commands>,
    config: &Config,
    json_output: bool,
) -> Result<()> {
    match command {
        Some(Commands::Simulate { amount, option }) => {
            dispatch_simulate(&amount, option.as_deref(), config, json_output).await
        }
        Some(Commands::Rates) => dispatch_rates(config, json_output).await,
        Some(Commands::Interactive) | None => dispatch_interactive(config).await,
    }
}

async fn dispatch_simulate(
    amount: &str,
    option: Option<&str>,
    config: &Config,
    json_output: bool,
) -> Result<()> {
    let principal = PrincipalAmount::positive(parse_currency_string(amount))
        .with_context(|| format!("Invalid amount: {:?}", amount))?;
    let option = option
        .map(|o| o.parse::<InvestmentOption>())
        .transpose()?;

    info!("Simulating {} (option: {:?})", principal.value(), option);

    let (rates, origin) = rates::current_rates(config).await;
    let projections = match option {
        Some(opt) => vec![project(principal, opt, &rates)],
        None => project_all(principal, &rates),
    };

    if json_output {
        println!(
            "{}",
            format_results_json(principal, &projections, &rates, origin)
        );
    } else {
        print!("{}", format_results_table(principal, &projections, origin));
    }
    Ok(())
}

async fn dispatch_rates(config: &Config, json_output: bool) -> Result<()> {
    let (rates, origin) = rates::current_rates(config).await;
    if json_output {
        println!("{}", format_rates_json(&rates, origin));
    } else {
        print!("{}", format_rates_table(&rates, origin));
    }
    Ok(())
}

#[cfg(feature = "tui")]
async fn dispatch_interactive(config: &Config) -> Result<()> {
    crate::ui::launch_interactive(config).await
}

#[cfg(not(feature = "tui"))]
async fn dispatch_interactive(_config: &Config) -> Result<()> {
    anyhow::bail!("Interactive mode is not available in this build; use `premio simulate <AMOUNT>`")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> Config {
        Config {
            offline: true,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_simulate_rejects_zero_amount() {
        let err = dispatch_command(
            Some(Commands::Simulate {
                amount: "0,00".to_string(),
                option: None,
            }),
            &offline(),
            false,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Invalid amount"));
    }

    #[tokio::test]
    async fn test_simulate_rejects_unknown_option() {
        let result = dispatch_command(
            Some(Commands::Simulate {
                amount: "100000".to_string(),
                option: Some("bitcoin".to_string()),
            }),
            &offline(),
            true,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_offline_commands_succeed() {
        dispatch_command(
            Some(Commands::Simulate {
                amount: "100000000".to_string(),
                option: Some("fiis".to_string()),
            }),
            &offline(),
            true,
        )
        .await
        .unwrap();
        dispatch_command(Some(Commands::Rates), &offline(), false)
            .await
            .unwrap();
    }
}
