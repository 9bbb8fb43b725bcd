//! Numeric helpers shared by the detector, descriptor and voter.

use std::f64::consts::PI;

/// Returns the `q`-quantile of an ascending slice using linear interpolation
/// between the two nearest order statistics.
///
/// `q` is clamped to `[0, 1]`. Returns `None` for an empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Rounds an integer offset to the nearest multiple of `step`.
///
/// Exact halves round away from zero. `step` must be positive.
pub(crate) fn round_to_step(value: i64, step: i64) -> i64 {
    debug_assert!(step > 0);
    (value as f64 / step as f64).round() as i64 * step
}

/// Maps an angle in `[-pi, pi]` to one of `bins` equal slices of `[-pi, pi)`.
///
/// Slice 0 starts at `-pi`; anything at or past the last edge (including
/// `pi` itself) falls into the last slice.
pub(crate) fn orientation_bin(theta: f64, bins: usize) -> usize {
    let width = 2.0 * PI / bins as f64;
    let idx = ((theta + PI) / width).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(bins - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{orientation_bin, quantile_sorted, round_to_step};
    use std::f64::consts::PI;

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&values, 0.0), Some(0.0));
        assert_eq!(quantile_sorted(&values, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&values, 0.5), Some(2.0));
        let q = quantile_sorted(&values, 0.9).unwrap();
        assert!((q - 3.6).abs() < 1e-12);
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[7.0], 0.98), Some(7.0));
    }

    #[test]
    fn round_to_step_picks_nearest_multiple() {
        assert_eq!(round_to_step(0, 5), 0);
        assert_eq!(round_to_step(2, 5), 0);
        assert_eq!(round_to_step(3, 5), 5);
        assert_eq!(round_to_step(52, 5), 50);
        assert_eq!(round_to_step(-2, 5), 0);
        assert_eq!(round_to_step(-3, 5), -5);
        assert_eq!(round_to_step(2, 4), 4);
        assert_eq!(round_to_step(-2, 4), -4);
    }

    #[test]
    fn orientation_bins_cover_half_open_slices() {
        assert_eq!(orientation_bin(-PI, 8), 0);
        assert_eq!(orientation_bin(-3.0 * PI / 4.0 - 1e-9, 8), 0);
        assert_eq!(orientation_bin(-PI / 2.0 + 1e-9, 8), 2);
        assert_eq!(orientation_bin(-1e-9, 8), 3);
        assert_eq!(orientation_bin(0.0, 8), 4);
        assert_eq!(orientation_bin(PI / 4.0 + 1e-9, 8), 5);
        assert_eq!(orientation_bin(3.0 * PI / 4.0 + 1e-9, 8), 7);
        assert_eq!(orientation_bin(PI, 8), 7);
    }
}
