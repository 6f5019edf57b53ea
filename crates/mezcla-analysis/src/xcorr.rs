//! Cross-correlation and peak-lag detection.
//!
//! Direct (time-domain) cross-correlation:
//!
//! ```text
//! R_xy(τ) = Σ_n x[n] · y[n + τ]
//! ```
//!
//! A positive peak lag means y leads x (`y[n] ≈ x[n - τ]`). The sequences
//! the sync engine correlates are beat impulse trains a few hundred entries
//! long, so the O(n · max_lag) direct form is plenty.

/// Cross-correlation of `x` and `y` for lags in `[-max_lag, max_lag]`.
///
/// Output has length `2 * max_lag + 1`; entry `i` holds R_xy at lag
/// `i - max_lag`, i.e. layout `[R(-max_lag), …, R(0), …, R(max_lag)]`.
pub fn xcorr_direct(x: &[f32], y: &[f32], max_lag: usize) -> Vec<f32> {
    let n = x.len().max(y.len());
    let mut result = vec![0.0f32; 2 * max_lag + 1];

    for (out_i, lag) in (-(max_lag as i64)..=(max_lag as i64)).enumerate() {
        let mut sum = 0.0f32;
        for i in 0..n {
            let j = i as i64 + lag;
            if i < x.len() && j >= 0 && (j as usize) < y.len() {
                sum += x[i] * y[j as usize];
            }
        }
        result[out_i] = sum;
    }

    result
}

/// Lag of maximum correlation and its value.
///
/// `max_lag` must be the value passed to [`xcorr_direct`]; it converts the
/// array index back to a signed lag. Ties resolve to the lag nearest zero,
/// so two sequences that match equally well at several shifts are reported
/// as needing the smallest one.
pub fn peak_lag(correlation: &[f32], max_lag: usize) -> (i64, f32) {
    let mut best: Option<(i64, f32)> = None;

    for (i, &value) in correlation.iter().enumerate() {
        let lag = i as i64 - max_lag as i64;
        let better = match best {
            None => true,
            Some((best_lag, best_value)) => {
                value > best_value || (value == best_value && lag.abs() < best_lag.abs())
            }
        };
        if better {
            best = Some((lag, value));
        }
    }

    best.unwrap_or((0, 0.0))
}
