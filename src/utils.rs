//! Assorted numeric helpers.

/// Relative tolerance used when checking that a distribution sums to one.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// Compare two floats with a tolerance relative to their magnitude.
///
/// Values whose magnitude is below one are compared absolutely, so that sums
/// near zero do not demand impossible precision.
#[inline]
pub fn approx_eq(a: f64, b: f64, rel_tol: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= rel_tol * scale
}

/// Left-to-right sum, so every caller accumulates in the same order.
#[inline]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}
