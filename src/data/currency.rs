use super::InvoiceTotals;
use crate::BillpressError;
use crate::messages::Messages;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const SCALE: u32 = 2;

pub fn default_currency_value() -> Decimal {
    Decimal::new(0, SCALE)
}

/// Parses a raw amount the lenient way form input needs: surrounding
/// whitespace is ignored, a trailing non-numeric suffix is dropped and
/// anything unparseable counts as zero.
pub(crate) fn parse_amount(value: &str) -> Decimal {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return default_currency_value();
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .or_else(|_| Decimal::from_str(numeric_prefix(trimmed)))
        .unwrap_or_else(|_| default_currency_value())
}

fn numeric_prefix(value: &str) -> &str {
    let mut seen_dot = false;
    let mut end = 0;
    for (i, c) in value.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    value[..end].trim_end_matches('.')
}

/// Formats an amount with two decimals and a space between each group of
/// three integer digits, e.g. `20 000.00`.
pub(crate) fn format_amount(value: &str) -> String {
    format_decimal(&parse_amount(value))
}

pub(crate) fn format_decimal(num: &Decimal) -> String {
    let mut scaled_value = num.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    scaled_value.rescale(SCALE);
    if scaled_value.is_zero() {
        scaled_value.set_sign_positive(true);
    }
    let input = scaled_value.to_string();
    let (int_part, dec_part) = input.split_once('.').unwrap_or((&input, "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{dec_part}")
}

/// Checks `total == subtotal - discount + tax`, on two decimals.
pub(crate) fn check_totals(totals: &InvoiceTotals) -> Result<(), BillpressError> {
    let subtotal = parse_amount(&totals.subtotal);
    let discount = totals
        .discount
        .as_deref()
        .map(parse_amount)
        .unwrap_or_else(default_currency_value);
    let tax = totals
        .tax
        .as_deref()
        .map(parse_amount)
        .unwrap_or_else(default_currency_value);
    let total = parse_amount(&totals.total);

    let expected = subtotal
        .checked_sub(discount)
        .and_then(|v| v.checked_add(tax))
        .ok_or_else(|| {
            BillpressError::InvalidTotals(format!("{}: overflow", Messages::TotalsDoNotAddUp))
        })?;

    let round = |d: Decimal| d.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if round(expected) != round(total) {
        return Err(BillpressError::InvalidTotals(format!(
            "{}: expected {}, got {}",
            Messages::TotalsDoNotAddUp,
            format_decimal(&expected),
            format_decimal(&total)
        )));
    }
    Ok(())
}
