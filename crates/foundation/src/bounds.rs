/// Axis-aligned bounding box in 2-D.
///
/// Coordinates are in whatever CRS the caller is working in; the box itself
/// is unit-agnostic. Invariant: `min[i] <= max[i]` on both axes. Degenerate
/// (zero-width or zero-height) boxes are legal and detectable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Bounds2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Bounds2 { min, max }
    }

    /// Folds an iterator of points into their exact bounding box.
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = [f64; 2]>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        Some(Bounds2 { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    /// Zero area on at least one axis.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    pub fn contains(&self, other: &Bounds2) -> bool {
        other.min[0] >= self.min[0]
            && other.min[1] >= self.min[1]
            && other.max[0] <= self.max[0]
            && other.max[1] <= self.max[1]
    }

    /// Smallest margin between `other` and this box's edges, negative if
    /// `other` sticks out on any side.
    pub fn containment_margin(&self, other: &Bounds2) -> f64 {
        let left = other.min[0] - self.min[0];
        let bottom = other.min[1] - self.min[1];
        let right = self.max[0] - other.max[0];
        let top = self.max[1] - other.max[1];
        left.min(bottom).min(right).min(top)
    }
}
