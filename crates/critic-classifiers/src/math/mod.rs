//! Dense matrix storage and the small numeric helpers the models share.
pub mod matrix;

pub use matrix::Array2;

/// Index of the largest value, preferring the lowest index on ties.
///
/// NaN entries never win. Returns `None` when no entry is comparable.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            None if !value.is_nan() => best = Some((idx, value)),
            Some((_, top)) if value > top => best = Some((idx, value)),
            _ => {}
        }
    }
    best.map(|(idx, _)| idx)
}

/// Natural log that maps zero to the smallest positive normal's log instead of `-inf`.
pub fn ln_clamped(value: f64) -> f64 {
    value.max(f64::MIN_POSITIVE).ln()
}
