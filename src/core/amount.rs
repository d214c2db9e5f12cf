//! Decimal money amounts and their display formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown when a percentage cannot be computed.
pub const PERCENTAGE_PLACEHOLDER: &str = "-";

/// Returns `(delta / starting) * 100`, or `None` when the result is not a
/// finite number (zero baseline or overflow).
pub fn percentage_change(delta: Decimal, starting: Decimal) -> Option<Decimal> {
    delta
        .checked_div(starting)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Formats `value` with `precision` decimal places and `,` thousands separators.
///
/// A negative value keeps its sign even when it rounds to zero (`-0.00`).
pub fn format_amount(value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", precision as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && !value.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Formats a percentage with two decimals, or the placeholder when absent.
pub fn format_percentage(percentage: Option<Decimal>) -> String {
    percentage.map_or_else(
        || PERCENTAGE_PLACEHOLDER.to_string(),
        |p| format_amount(p, 2),
    )
}
