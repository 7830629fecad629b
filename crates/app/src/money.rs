//! Fixed-point monetary amounts.
//!
//! Prices are stored as integer minor units (cents) and rendered as decimal
//! strings with exactly two fractional digits, so no binary floating point
//! ever touches an amount.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("amount contains invalid characters")]
    Invalid,

    #[error("amount has more than two fractional digits")]
    TooPrecise,

    #[error("amount is out of range")]
    OutOfRange,
}

/// Render minor units as a decimal string, e.g. `49995` → `"499.95"`.
#[must_use]
pub fn format_minor(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();

    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parse a decimal string with up to two fractional digits into minor units,
/// e.g. `"99.99"` → `9999`.
///
/// # Errors
///
/// Rejects empty input, non-digit characters, more than two fractional
/// digits, and amounts that overflow `i64`.
pub fn parse_decimal(input: &str) -> Result<i64, ParseMoneyError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(ParseMoneyError::Empty);
    }

    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseMoneyError::Invalid);
    }

    if fraction.len() > 2 {
        return Err(ParseMoneyError::TooPrecise);
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ParseMoneyError::OutOfRange)?
    };

    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)? * 10,
        _ => fraction.parse().map_err(|_| ParseMoneyError::Invalid)?,
    };

    whole
        .checked_mul(100)
        .and_then(|minor| minor.checked_add(cents))
        .ok_or(ParseMoneyError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_fractional_digits() {
        assert_eq!(format_minor(49995), "499.95");
        assert_eq!(format_minor(100), "1.00");
        assert_eq!(format_minor(5), "0.05");
        assert_eq!(format_minor(0), "0.00");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_minor(-150), "-1.50");
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_decimal("99.99"), Ok(9999));
        assert_eq!(parse_decimal("100"), Ok(10000));
        assert_eq!(parse_decimal("0.5"), Ok(50));
        assert_eq!(parse_decimal(".25"), Ok(25));
    }

    #[test]
    fn parse_and_format_round_trip() {
        assert_eq!(format_minor(parse_decimal("499.95").unwrap()), "499.95");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_decimal(""), Err(ParseMoneyError::Empty));
        assert_eq!(parse_decimal("."), Err(ParseMoneyError::Empty));
        assert_eq!(parse_decimal("12.345"), Err(ParseMoneyError::TooPrecise));
        assert_eq!(parse_decimal("-5"), Err(ParseMoneyError::Invalid));
        assert_eq!(parse_decimal("1,00"), Err(ParseMoneyError::Invalid));
        assert_eq!(
            parse_decimal("99999999999999999999"),
            Err(ParseMoneyError::OutOfRange)
        );
    }
}
