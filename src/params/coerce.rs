//! Boundary coercion of raw numeric input
//!
//! Anything typed by a user or read from a loosely-formatted source passes
//! through here before it reaches the parameter model, so the engine only
//! ever sees finite numbers.

use log::warn;

/// Parse a raw value as a number, falling back to 0 for anything malformed.
///
/// Surrounding whitespace is ignored. Empty input, text that is not a
/// number, and non-finite values (`NaN`, `inf`) all become `0.0`.
pub fn parse_or_zero(raw: &str) -> f64 {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !trimmed.is_empty() {
                warn!("Coercing malformed numeric input {:?} to 0", raw);
            }
            0.0
        }
    }
}

/// Replace a non-finite number with 0; finite values pass through untouched.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
