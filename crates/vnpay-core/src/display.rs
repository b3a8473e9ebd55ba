//! Helpers for front ends: vi-VN currency formatting and lenient parsing of
//! typed amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::PayrollError;
use crate::types::{round_vnd, Money};
use crate::PayrollResult;

/// Format an amount the way vi-VN locales do: whole VND, `.` between
/// thousands groups.
///
/// ```
/// use rust_decimal_macros::dec;
/// assert_eq!(vnpay_core::display::format_currency(dec!(30242500)), "30.242.500");
/// ```
pub fn format_currency(amount: Money) -> String {
    let rounded = round_vnd(amount);
    if rounded.is_zero() {
        return "0".to_string();
    }

    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Keep only the ASCII digits of free-text entry; nothing left means zero.
pub fn parse_raw_input(value: &str) -> PayrollResult<Money> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&digits).map_err(|e| PayrollError::InvalidInput {
        field: "amount".into(),
        reason: format!("'{value}' is not a representable amount: {e}"),
    })
}
