//! Presentation helpers shared by the discovery views and the store layer.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal digits kept when a coordinate component is stored.
pub const COORDINATE_SCALE: u32 = 8;

/// Round a coordinate component up (toward positive infinity) to 8 decimal
/// digits.
///
/// Non-finite input is returned unchanged.
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(COORDINATE_SCALE, RoundingStrategy::ToPositiveInfinity))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Capitalize the first letter of every space-separated word and lower-case
/// the rest, e.g. `"north INDIAN"` becomes `"North Indian"`.
///
/// Spacing is preserved as given. Blank input normalizes to `""`.
#[must_use]
pub fn normalize_label(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    value
        .split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    // Multi-char expansions (e.g. 'ß') would not survive a second pass, so
    // only single-char mappings are applied.
    let head = match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => first,
    };
    let mut out = String::with_capacity(word.len());
    out.push(head);
    out.push_str(&chars.as_str().to_lowercase());
    out
}
