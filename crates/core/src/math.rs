//! Vector scaling shared by the content and factorization engines

/// Euclidean (L2) norm
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Scale a vector to unit L2 norm in place; zero vectors are left untouched
///
/// # Example
///
/// ```
/// use bookrec_core::math::normalize_vector;
///
/// let mut v = vec![3.0, 4.0];
/// normalize_vector(&mut v);
/// assert!((v[0] - 0.6).abs() < 1e-12);
/// ```
pub fn normalize_vector(v: &mut [f64]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Min-max scale values into `[0, 1]`.
///
/// A constant column has no range and maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&v| if range > 0.0 { (v - min) / range } else { 0.0 })
        .collect()
}
