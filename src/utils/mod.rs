//! Currency formatting and parsing utilities
//!
//! This module provides centralized pt-BR formatting for every amount the
//! application displays, plus the keystroke parser behind the masked
//! amount input.

use rust_decimal::{Decimal, RoundingStrategy};

const THOUSAND: Decimal = Decimal::ONE_THOUSAND;
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest amount the parser can represent, in reais. Longer digit strings
/// saturate here instead of failing.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, 2);

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "R$ " prefix (Brazilian Real)
    BRL,
    /// No currency symbol (masked input, table cells)
    None,
}

/// Insert `.` every three digits of an integer string, from the right.
fn group_thousands(integer_part: &str) -> String {
    integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Format a number with pt-BR separators and between `min_frac` and
/// `max_frac` fraction digits. Rounds half away from zero, like
/// `Intl.NumberFormat`; trailing zeros beyond `min_frac` are dropped.
///
/// # Examples
/// ```
/// use premio::utils::format_number_br;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_number_br(dec!(2.5), 0, 2), "2,5");
/// assert_eq!(format_number_br(dec!(1234.5), 2, 2), "1.234,50");
/// assert_eq!(format_number_br(dec!(14999.5), 0, 0), "15.000");
/// ```
pub fn format_number_br(value: Decimal, min_frac: u32, max_frac: u32) -> String {
    let rounded = value.round_dp_with_strategy(max_frac, RoundingStrategy::MidpointAwayFromZero);
    let is_negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs_value = rounded.abs();

    let formatted = format!("{:.*}", max_frac as usize, abs_value);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (formatted.as_str(), ""),
    };

    let mut fraction = decimal_part.to_string();
    while fraction.len() > min_frac as usize && fraction.ends_with('0') {
        fraction.pop();
    }

    let sign = if is_negative { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, group_thousands(integer_part))
    } else {
        format!("{}{},{}", sign, group_thousands(integer_part), fraction)
    }
}

/// Format an amount with pt-BR separators and exactly 2 fraction digits,
/// with or without the `R$ ` prefix.
///
/// # Examples
/// ```
/// use premio::utils::{format_currency_with_symbol, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_symbol(dec!(1234.56), CurrencySymbol::BRL),
///     "R$ 1.234,56"
/// );
/// assert_eq!(
///     format_currency_with_symbol(dec!(1234), CurrencySymbol::None),
///     "1.234,00"
/// );
/// ```
pub fn format_currency_with_symbol(value: Decimal, symbol: CurrencySymbol) -> String {
    let prefix = match symbol {
        CurrencySymbol::BRL => "R$ ",
        CurrencySymbol::None => "",
    };
    format!("{}{}", prefix, format_number_br(value, 2, 2))
}

// ============ Convenience functions ============

/// Format as Brazilian Real with symbol: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use premio::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "R$ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_symbol(value, CurrencySymbol::BRL)
}

/// Format number only (no symbol): "1.234,56"
pub fn format_decimal_br(value: Decimal) -> String {
    format_currency_with_symbol(value, CurrencySymbol::None)
}

/// Abbreviated currency for headline figures.
///
/// Millions get up to 2 fraction digits and an "Mi" suffix, thousands get
/// none and a "k" suffix, anything smaller falls back to [`format_currency`].
///
/// # Examples
/// ```
/// use premio::utils::format_compact_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_compact_currency(dec!(2500000)), "R$ 2,5 Mi");
/// assert_eq!(format_compact_currency(dec!(15000)), "R$ 15k");
/// assert_eq!(format_compact_currency(dec!(500)), "R$ 500,00");
/// ```
pub fn format_compact_currency(value: Decimal) -> String {
    if value >= MILLION {
        format!("R$ {} Mi", format_number_br(value / MILLION, 0, 2))
    } else if value >= THOUSAND {
        format!("R$ {}k", format_number_br(value / THOUSAND, 0, 0))
    } else {
        format_currency(value)
    }
}

/// Parse keystrokes from the masked amount input.
///
/// Every non-digit is dropped and the last two digits are cents, so
/// `"1.000.000,00"` and `"100000000"` both parse to one million. Empty or
/// digit-free input is zero.
///
/// # Examples
/// ```
/// use premio::utils::parse_currency_string;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_currency_string("R$ 1.234,56"), dec!(1234.56));
/// assert_eq!(parse_currency_string("abc"), dec!(0));
/// ```
pub fn parse_currency_string(input: &str) -> Decimal {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Decimal::ZERO;
    }

    significant
        .parse::<i128>()
        .ok()
        .and_then(|cents| Decimal::try_from_i128_with_scale(cents, 2).ok())
        .unwrap_or(MAX_AMOUNT)
}

/// Live mask for the amount input: `"100000000"` becomes `"1.000.000,00"`.
/// Returns an empty string while no digit has been typed.
pub fn format_masked_input(input: &str) -> String {
    if !input.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }
    format_decimal_br(parse_currency_string(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_currency(dec!(0.99)), "R$ 0,99");
        assert_eq!(format_currency(dec!(1000000)), "R$ 1.000.000,00");
    }

    #[test]
    fn test_format_currency_small_values() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(0.01)), "R$ 0,01");
        assert_eq!(format_currency(dec!(12)), "R$ 12,00");
        assert_eq!(format_currency(dec!(999.99)), "R$ 999,99");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.56)), "R$ -1.234,56");
        assert_eq!(format_currency(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(1.005)), "R$ 1,01");
        assert_eq!(format_currency(dec!(822.4921)), "R$ 822,49");
        assert_eq!(format_currency(dec!(999.995)), "R$ 1.000,00");
    }

    #[test]
    fn test_format_without_symbol() {
        assert_eq!(format_decimal_br(dec!(100)), "100,00");
        assert_eq!(format_decimal_br(dec!(1000000)), "1.000.000,00");
    }

    #[test]
    fn test_compact_millions() {
        assert_eq!(format_compact_currency(dec!(2500000)), "R$ 2,5 Mi");
        assert_eq!(format_compact_currency(dec!(1000000)), "R$ 1 Mi");
        assert_eq!(format_compact_currency(dec!(1234567)), "R$ 1,23 Mi");
        assert_eq!(format_compact_currency(dec!(1500000000)), "R$ 1.500 Mi");
    }

    #[test]
    fn test_compact_thousands() {
        assert_eq!(format_compact_currency(dec!(15000)), "R$ 15k");
        assert_eq!(format_compact_currency(dec!(1000)), "R$ 1k");
        assert_eq!(format_compact_currency(dec!(8800)), "R$ 9k");
        assert_eq!(format_compact_currency(dec!(999999.99)), "R$ 1.000k");
    }

    #[test]
    fn test_compact_below_thousand_uses_full_format() {
        assert_eq!(format_compact_currency(dec!(500)), "R$ 500,00");
        assert_eq!(format_compact_currency(dec!(999.99)), "R$ 999,99");
    }

    #[test]
    fn test_formatters_handle_huge_magnitudes() {
        let full = format_currency(MAX_AMOUNT);
        assert!(full.starts_with("R$ 792.281.625"));
        assert!(full.ends_with(",35"));

        let compact = format_compact_currency(MAX_AMOUNT);
        assert!(compact.ends_with(" Mi"));
    }

    #[test]
    fn test_parse_empty_and_non_digit() {
        assert_eq!(parse_currency_string(""), Decimal::ZERO);
        assert_eq!(parse_currency_string("abc"), Decimal::ZERO);
        assert_eq!(parse_currency_string("R$ ,"), Decimal::ZERO);
        assert_eq!(parse_currency_string("000"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_treats_last_two_digits_as_cents() {
        assert_eq!(parse_currency_string("1"), dec!(0.01));
        assert_eq!(parse_currency_string("12345"), dec!(123.45));
        assert_eq!(parse_currency_string("100000000"), dec!(1000000));
        assert_eq!(parse_currency_string("1.000.000,00"), dec!(1000000));
    }

    #[test]
    fn test_parse_saturates_on_overlong_input() {
        let digits = "9".repeat(60);
        assert_eq!(parse_currency_string(&digits), MAX_AMOUNT);
    }

    #[test]
    fn test_masked_input() {
        assert_eq!(format_masked_input(""), "");
        assert_eq!(format_masked_input("abc"), "");
        assert_eq!(format_masked_input("5"), "0,05");
        assert_eq!(format_masked_input("100000000"), "1.000.000,00");
        assert_eq!(format_masked_input("1.000.000,001"), "10.000.000,01");
    }

    #[test]
    fn test_masked_input_round_trips_through_parser() {
        for cents in [0u64, 1, 9, 10, 99, 100, 12345, 100000000, 987654321012] {
            let typed = cents.to_string();
            let masked = format_masked_input(&typed);
            assert_eq!(
                parse_currency_string(&masked),
                Decimal::from(cents) / Decimal::ONE_HUNDRED,
                "round trip failed for {}",
                cents
            );
        }
    }
}
