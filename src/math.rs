//! Shared numeric helpers for square-root price math

use rust_decimal::Decimal;

/// Convert a computed ring value to a price rounded to 2 decimal places.
///
/// Banker's rounding, matching [`Decimal::round_dp`].
pub fn round2(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(2)
}

/// Floor of the square root; the base of the Square of 9 spiral.
pub fn floor_sqrt(value: f64) -> f64 {
    value.sqrt().floor()
}

/// The square of a root value.
pub fn square(value: f64) -> f64 {
    value * value
}
