//! Monetary value guards shared by every calculator

/// Clamp a monetary value to the finite, non-negative range.
///
/// NaN, infinities and negative numbers all collapse to 0 so that nothing
/// pathological ever reaches a caller.
pub fn clamp_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
