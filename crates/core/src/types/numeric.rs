//! Lenient numeric parsing for form input.
//!
//! Form fields are free text. Nothing is rejected at entry time: a number is
//! read from the leading part of the input and anything unparsable counts as
//! absent. Callers pick the fallback (`0` for stock and prices, `1` for the
//! minimum order quantity, and so on).

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse the leading integer of `input`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. `"12 pcs"` is `Some(12)`, `"pcs"` is `None`.
#[must_use]
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits.get(..end)?.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse the leading decimal number of `input`.
///
/// Accepts an optional sign, digits and one decimal point; at least one digit
/// is required. `"19.99 USD"` is `Some(19.99)`, `".5"` is `Some(0.5)`.
#[must_use]
pub fn parse_leading_decimal(input: &str) -> Option<Decimal> {
    let s = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    for (idx, c) in s.char_indices() {
        match c {
            '+' | '-' if idx == 0 => {}
            '.' if !seen_point => seen_point = true,
            c if c.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = idx + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    let number = s.get(..end)?.trim_end_matches('.');
    let number = number.strip_prefix('+').unwrap_or(number);
    // "-.5" and ".5" need a leading zero for Decimal
    let normalized = if let Some(rest) = number.strip_prefix("-.") {
        format!("-0.{rest}")
    } else if let Some(rest) = number.strip_prefix('.') {
        format!("0.{rest}")
    } else {
        number.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

/// Parse a stock quantity, treating unparsable input as zero.
#[must_use]
pub fn parse_quantity(input: &str) -> i64 {
    parse_leading_int(input).unwrap_or(0)
}

/// Parse a price, treating unparsable input as zero.
#[must_use]
pub fn parse_price(input: &str) -> Decimal {
    parse_leading_decimal(input).unwrap_or(Decimal::ZERO)
}

/// Parse an integer setting where zero means "use the default".
#[must_use]
pub fn nonzero_or(input: &str, default: i64) -> i64 {
    parse_leading_int(input)
        .filter(|value| *value != 0)
        .unwrap_or(default)
}
