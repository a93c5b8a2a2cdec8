//! Premio - what a lottery prize would pay as monthly income
//!
//! This library projects the monthly passive income of a principal amount in
//! four Brazilian investment options (poupança, Tesouro Selic, a CDI-linked
//! deposit and real-estate funds), using live Selic data from Banco Central
//! with an embedded fallback rate set.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod projection;
pub mod rates;
pub mod session;
#[cfg(feature = "tui")]
pub mod ui;
pub mod utils;
