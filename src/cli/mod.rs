use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod help;

#[derive(Parser)]
#[command(name = "premio")]
#[command(
    version,
    about = "How much monthly income would a lottery prize pay in Brazilian investments?"
)]
#[command(
    long_about = "Projects the monthly passive income of a prize amount in poupança, Tesouro Selic, a 100%-of-CDI deposit and real-estate funds (FIIs), using the current Selic from Banco Central or built-in reference rates when offline."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Skip the Banco Central lookup and use reference rates
    #[arg(long = "offline", global = true)]
    pub offline: bool,

    /// Path to a config file (default: <config dir>/premio/config.toml)
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Project the monthly income of a prize amount
    Simulate {
        /// Amount, typed like the input screen: the last two digits are
        /// cents ("100000000" or "1.000.000,00" = R$ 1 million)
        amount: String,

        /// Only show one option (poupanca, selic, cdi, fiis)
        #[arg(short, long)]
        option: Option<String>,
    },

    /// Show the market rates in use
    Rates,

    /// Interactive input and results screens (default)
    Interactive,
}
