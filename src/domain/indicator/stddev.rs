//! Rolling population standard deviation, reported with its window mean.
//!
//! STDDEV(n)[i] = sqrt(sum((X[i-j] - mean)^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) values are invalid.

/// Mean and population standard deviation of `window`.
pub fn mean_and_stddev(window: &[f64]) -> (f64, f64) {
    if window.is_empty() {
        return (0.0, 0.0);
    }
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Rolling `(mean, stddev)` over `values`; `None` marks warmup positions.
pub fn calculate_stddev(values: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                Some(mean_and_stddev(&values[i + 1 - period..=i]))
            }
        })
        .collect()
}
