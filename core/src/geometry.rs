//! Planar geometry primitives shared by the scanner and the kinematics system.
//!
//! All coordinates follow the screen convention used throughout the arena:
//! `x` grows to the right and `y` grows downwards.

use std::cmp::Ordering;

use glam::DVec2;

/// Denominator magnitude below which two segments are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// Line segment expressed by its two endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// First endpoint of the segment.
    pub start: DVec2,
    /// Second endpoint of the segment.
    pub end: DVec2,
}

impl Segment {
    /// Creates a segment spanning the provided endpoints.
    #[must_use]
    pub const fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Intersects this segment with another one.
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<DVec2> {
        segment_intersection(self.start, self.end, other.start, other.end)
    }
}

/// Intersects segment `p1 p2` with segment `p3 p4`.
///
/// Parallel and collinear pairs never intersect. The returned point always
/// lies on both segments; the intersection of the infinite carrier lines is
/// never reported. Swapping the two segments yields a bit-identical result.
#[must_use]
pub fn segment_intersection(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    if segment_order(p3, p4, p1, p2) == Ordering::Less {
        solve_intersection(p3, p4, p1, p2)
    } else {
        solve_intersection(p1, p2, p3, p4)
    }
}

/// Lexicographic order of two segments over their endpoint coordinates.
fn segment_order(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> Ordering {
    [a1.x, a1.y, a2.x, a2.y]
        .iter()
        .zip([b1.x, b1.y, b2.x, b2.y].iter())
        .map(|(a, b)| a.total_cmp(b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn solve_intersection(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denom;
    let u = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x)) / denom;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    // Interpolated along the segment that sorts first.
    Some(p1 + (p2 - p1) * t)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Axis-aligned rectangle anchored at its upper-left corner.
///
/// Negative extents are tolerated: every query works on the min/max span of
/// the rectangle so a flipped rectangle behaves like its normalised twin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Horizontal coordinate of the anchor corner.
    pub x: f64,
    /// Vertical coordinate of the anchor corner.
    pub y: f64,
    /// Horizontal extent measured from the anchor.
    pub width: f64,
    /// Vertical extent measured from the anchor.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its anchor and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest horizontal coordinate covered by the rectangle.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.x.min(self.x + self.width)
    }

    /// Largest horizontal coordinate covered by the rectangle.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x.max(self.x + self.width)
    }

    /// Smallest vertical coordinate covered by the rectangle.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.y.min(self.y + self.height)
    }

    /// Largest vertical coordinate covered by the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y.max(self.y + self.height)
    }

    /// Pointer hit test: the left and top borders belong to the rectangle,
    /// the right and bottom borders do not.
    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        (self.left()..self.right()).contains(&point.x)
            && (self.top()..self.bottom()).contains(&point.y)
    }

    /// Point of the rectangle (border or interior) closest to `point`.
    #[must_use]
    pub fn closest_point(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        )
    }

    /// Squared distance between `point` and the closest point of the rectangle.
    #[must_use]
    pub fn distance_squared_to(&self, point: DVec2) -> f64 {
        self.closest_point(point).distance_squared(point)
    }

    /// Boundary edges in top, right, bottom, left order.
    #[must_use]
    pub fn edges(&self) -> [Segment; 4] {
        let top_left = DVec2::new(self.x, self.y);
        let top_right = DVec2::new(self.x + self.width, self.y);
        let bottom_right = DVec2::new(self.x + self.width, self.y + self.height);
        let bottom_left = DVec2::new(self.x, self.y + self.height);
        [
            Segment::new(top_left, top_right),
            Segment::new(top_right, bottom_right),
            Segment::new(bottom_right, bottom_left),
            Segment::new(bottom_left, top_left),
        ]
    }

    /// Returns the rectangle shifted by `delta`.
    #[must_use]
    pub fn translated(self, delta: DVec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }
}
