//! Planar geometry helpers shared by the metric extractor and the comparator.
//!
//! Coordinates follow image convention: `x` grows to the right, `y` grows
//! downwards.

use serde::{Deserialize, Serialize};

/// Length of the synthetic vertical reference used for inclination angles
const VERTICAL_REFERENCE_LENGTH: f64 = 100.0;

/// A usable 2D position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`
    #[must_use]
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Included angle at `b` of the triangle `a`-`b`-`c`, in degrees.
///
/// Uses the law of cosines. Coincident points (a zero-length side) and any
/// non-finite intermediate yield 0°. The cosine is clamped to [-1, 1] so
/// collinear points resolve to exactly 0° or 180° instead of failing.
#[must_use]
pub fn calculate_angle(a: &Point, b: &Point, c: &Point) -> f64 {
    let ab = a.distance_to(b);
    let cb = c.distance_to(b);
    let ac = a.distance_to(c);

    let denominator = 2.0 * ab * cb;
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let cosine = (ab * ab + cb * cb - ac * ac) / denominator;
    if !cosine.is_finite() {
        return 0.0;
    }

    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Inclination of the segment `pivot -> target` against the upward vertical
/// through `pivot`, in degrees (0° = target straight above, 90° = level).
#[must_use]
pub fn inclination_from_vertical(pivot: &Point, target: &Point) -> f64 {
    let reference = Point::new(pivot.x, pivot.y - VERTICAL_REFERENCE_LENGTH);
    calculate_angle(&reference, pivot, target)
}

/// Inclination of the segment `from -> to` against the horizontal, in
/// degrees within [0, 180]. An upright segment (`to` above `from`) is 90°.
#[must_use]
pub fn inclination_from_horizontal(from: &Point, to: &Point) -> f64 {
    let dx = to.x - from.x;
    let dy = from.y - to.y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dy.atan2(dx).to_degrees().abs()
}

/// Ratio of two spans, `None` when the denominator vanishes
#[must_use]
pub fn span_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator.abs() < crate::constants::EPSILON {
        None
    } else {
        Some(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_right_angle() {
        let angle = calculate_angle(&Point::new(0.0, 1.0), &Point::new(0.0, 0.0), &Point::new(1.0, 0.0));
        assert!(approx(angle, 90.0));
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = calculate_angle(&Point::new(-3.0, 0.0), &Point::new(0.0, 0.0), &Point::new(7.0, 0.0));
        assert!(approx(angle, 180.0));
    }

    #[test]
    fn test_coincident_points_yield_zero() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(calculate_angle(&p, &p, &Point::new(1.0, 2.0)), 0.0);
        assert_eq!(calculate_angle(&p, &p, &p), 0.0);
    }

    #[test]
    fn test_folded_back_collinear_is_zero() {
        let angle = calculate_angle(&Point::new(2.0, 0.0), &Point::new(0.0, 0.0), &Point::new(5.0, 0.0));
        assert!(approx(angle, 0.0));
    }

    #[test]
    fn test_inclination_from_vertical() {
        let knee = Point::new(100.0, 100.0);
        assert!(approx(inclination_from_vertical(&knee, &Point::new(100.0, 0.0)), 0.0));
        assert!(approx(inclination_from_vertical(&knee, &Point::new(0.0, 100.0)), 90.0));
        assert!(approx(inclination_from_vertical(&knee, &Point::new(0.0, 0.0)), 45.0));
    }

    #[test]
    fn test_inclination_from_horizontal() {
        let hip = Point::new(0.0, 10.0);
        assert!(approx(inclination_from_horizontal(&hip, &Point::new(0.0, 0.0)), 90.0));
        assert!(approx(inclination_from_horizontal(&hip, &Point::new(10.0, 0.0)), 45.0));
        assert!(approx(inclination_from_horizontal(&hip, &Point::new(-10.0, 0.0)), 135.0));
    }

    #[test]
    fn test_span_ratio() {
        assert_eq!(span_ratio(4.0, 2.0), Some(2.0));
        assert_eq!(span_ratio(4.0, 0.0), None);
    }
}
