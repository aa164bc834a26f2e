/// Relative tolerance for comparing two computations of the same mean.
pub const REL_TOLERANCE: f64 = 1e-9;

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// True when `a` and `b` differ by at most [`REL_TOLERANCE`] of their magnitude.
///
/// Magnitudes below 1.0 are compared absolutely, so means that land on or
/// near zero do not fail on rounding noise.
pub fn approx_eq(a: f64, b: f64) -> bool {
    // Matching infinities give a NaN difference; any other infinity is a mismatch.
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= REL_TOLERANCE * scale
}
