//! Percentile-based score thresholding.

use crate::image::ImageView;
use crate::util::math::quantile_sorted;

/// Counts interior pixels (border rows/columns excluded) strictly above
/// `threshold`.
pub(crate) fn count_interior_above(scores: ImageView<'_, f64>, threshold: f64) -> usize {
    let w = scores.width();
    let h = scores.height();
    if w < 3 || h < 3 {
        return 0;
    }
    (1..h - 1)
        .filter_map(|y| scores.row(y))
        .map(|row| row[1..w - 1].iter().filter(|&&v| v > threshold).count())
        .sum()
}

/// Chooses the selection threshold for a suppressed score map.
///
/// Starts at the `percentile` quantile of all scores. When more than
/// `max_points` interior pixels lie strictly above it, the threshold is raised
/// to the `1 - max_points / n` quantile and clamped to the `max_points + 1`-th
/// largest score, so at most `max_points` pixels can remain above it.
pub(crate) fn percentile_threshold(
    scores: ImageView<'_, f64>,
    percentile: f64,
    max_points: usize,
) -> f64 {
    let mut sorted: Vec<f64> = (0..scores.height())
        .filter_map(|y| scores.row(y))
        .flatten()
        .copied()
        .collect();
    sorted.sort_by(f64::total_cmp);

    let Some(mut threshold) = quantile_sorted(&sorted, percentile) else {
        return f64::INFINITY;
    };
    if count_interior_above(scores, threshold) > max_points {
        let n = sorted.len();
        let keep = 1.0 - max_points as f64 / n as f64;
        let floor = sorted[n - 1 - max_points];
        threshold = quantile_sorted(&sorted, keep).map_or(floor, |q| q.max(floor));
    }
    threshold
}
