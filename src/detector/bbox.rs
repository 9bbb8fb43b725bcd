/// Axis-aligned box `(x_min, y_min, x_max, y_max)` in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x_min: f64,
    /// Top edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_max: f64,
}

impl BoundingBox {
    /// Creates a box from its corner coordinates.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Box of size `width x height` centered at `(cx, cy)`.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    /// Horizontal extent `x_max - x_min`.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent `y_max - y_min`.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Midpoint as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Intersection over union, counting both edges as inside the box so a
    /// box spanning `x_min..=x_max` covers `x_max - x_min + 1` pixels.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let x0 = self.x_min.max(other.x_min);
        let y0 = self.y_min.max(other.y_min);
        let x1 = self.x_max.min(other.x_max);
        let y1 = self.y_max.min(other.y_max);
        let inter = (x1 - x0 + 1.0).max(0.0) * (y1 - y0 + 1.0).max(0.0);
        let area_a = (self.width() + 1.0) * (self.height() + 1.0);
        let area_b = (other.width() + 1.0) * (other.height() + 1.0);
        inter / (area_a + area_b - inter)
    }

    /// Mean of every coordinate over `boxes`; `None` when `boxes` is empty.
    pub fn average<'a, I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut sum = [0.0f64; 4];
        let mut count = 0usize;
        for b in boxes {
            sum[0] += b.x_min;
            sum[1] += b.y_min;
            sum[2] += b.x_max;
            sum[3] += b.y_max;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self::new(sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n))
    }
}
