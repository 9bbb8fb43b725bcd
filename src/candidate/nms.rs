//! 3x3 non-maximum suppression on dense score maps.

use crate::image::{ImageView, OwnedImage};
use crate::util::FeatVoteResult;

/// Zeroes every pixel that is not a positive maximum of its 3x3 neighborhood.
///
/// Neighborhoods are evaluated on the input map, so the scan order does not
/// matter. Plateaus keep all of their pixels. The first and last row and
/// column are always zeroed. Applying the suppression to its own output
/// returns the same map.
pub fn suppress_non_maxima_3x3(scores: ImageView<'_, f64>) -> FeatVoteResult<OwnedImage> {
    let w = scores.width();
    let h = scores.height();
    let mut out = OwnedImage::zeros(w, h)?;
    if w < 3 || h < 3 {
        return Ok(out);
    }

    for y in 1..h - 1 {
        let (Some(above), Some(row), Some(below)) =
            (scores.row(y - 1), scores.row(y), scores.row(y + 1))
        else {
            continue;
        };
        for x in 1..w - 1 {
            let v = row[x];
            if v.is_nan() || v <= 0.0 {
                continue;
            }
            let is_max = [above, row, below]
                .iter()
                .all(|r| r[x - 1] <= v && r[x] <= v && r[x + 1] <= v);
            if is_max {
                out.set(x, y, v);
            }
        }
    }
    Ok(out)
}
