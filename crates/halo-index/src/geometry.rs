//! Circle and axis-aligned rectangle primitives on the radar plane.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle. Containment is half-open: `min <= p < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

/// Circle on the radar plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Rect {
    /// Rectangle from its lower corner and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing every point, or `None` for an empty set.
    /// Points on the max edges are *not* contained (see `padded`).
    pub fn enclosing(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Finite with a positive area.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Half-open containment. A point on an edge shared by two adjacent
    /// rectangles belongs only to the one whose min edge it lies on.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Closed overlap test. Touching rectangles overlap, so a zero-radius
    /// query on a node edge still reaches that node.
    pub fn overlaps(&self, other: &Rect) -> bool {
        other.max.x >= self.min.x
            && other.min.x <= self.max.x
            && other.max.y >= self.min.y
            && other.min.y <= self.max.y
    }

    /// Grow by `fraction` of the extent on every side, with each half-extent
    /// at least `min_half_extent`. The result strictly contains `self`.
    pub fn padded(&self, fraction: f32, min_half_extent: f32) -> Self {
        let center = self.center();
        let half = Vec2::new(self.width(), self.height()) * (0.5 + fraction);
        let half = half.max(Vec2::splat(min_half_extent));
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Union with another rectangle.
    pub fn union(&self, other: &Rect) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Split into four equal quadrants: top-left, top-right, bottom-left,
    /// bottom-right. Adjacent quadrants share exact edge values, so the
    /// four tile the parent without gaps.
    pub fn quadrants(&self) -> [Rect; 4] {
        let mid = self.center();
        [
            Rect::from_min_max(Vec2::new(self.min.x, mid.y), Vec2::new(mid.x, self.max.y)),
            Rect::from_min_max(mid, self.max),
            Rect::from_min_max(self.min, mid),
            Rect::from_min_max(Vec2::new(mid.x, self.min.y), Vec2::new(self.max.x, mid.y)),
        ]
    }
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether a point lies within the circle (boundary included).
    pub fn contains(&self, p: Vec2) -> bool {
        self.center.distance_squared(p) <= self.radius * self.radius
    }

    /// Axis-aligned bounding rectangle of the circle.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_max(
            self.center - Vec2::splat(self.radius),
            self.center + Vec2::splat(self.radius),
        )
    }

    /// A query circle is usable when its centre is finite and its radius is
    /// a finite non-negative number.
    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)), "min corner is inside");
        assert!(r.contains(Vec2::new(9.999, 5.0)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)), "max edge is outside");
        assert!(!r.contains(Vec2::new(5.0, 10.0)), "max edge is outside");
        assert!(!r.contains(Vec2::new(-0.001, 5.0)));
        assert!(!r.contains(Vec2::new(f32::NAN, 5.0)));
    }

    #[test]
    fn test_quadrants_tile_parent() {
        let r = Rect::new(-20.0, 10.0, 40.0, 60.0);
        let q = r.quadrants();
        let area: f32 = q.iter().map(|c| c.width() * c.height()).sum();
        assert!((area - r.width() * r.height()).abs() < 1e-3);

        // The centre and every edge midpoint classify into exactly one quadrant.
        let c = r.center();
        let probes = [
            c,
            Vec2::new(c.x, r.min.y),
            Vec2::new(r.min.x, c.y),
            Vec2::new(c.x, r.max.y - 0.01),
            Vec2::new(r.max.x - 0.01, c.y),
        ];
        for p in probes {
            let hits = q.iter().filter(|quad| quad.contains(p)).count();
            assert_eq!(hits, 1, "point {p} landed in {hits} quadrants");
        }
    }

    #[test]
    fn test_quadrant_order() {
        let q = Rect::new(0.0, 0.0, 2.0, 2.0).quadrants();
        assert!(q[0].contains(Vec2::new(0.5, 1.5)), "top-left");
        assert!(q[1].contains(Vec2::new(1.5, 1.5)), "top-right");
        assert!(q[2].contains(Vec2::new(0.5, 0.5)), "bottom-left");
        assert!(q[3].contains(Vec2::new(1.5, 0.5)), "bottom-right");
    }

    #[test]
    fn test_overlaps_is_closed() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)), "touching edge");
        assert!(a.overlaps(&Rect::new(3.0, 3.0, 0.0, 0.0)), "degenerate point rect");
        assert!(!a.overlaps(&Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn test_circle_contains_and_bounds() {
        let c = Circle::new(Vec2::new(10.0, 10.0), 5.0);
        assert!(c.contains(Vec2::new(10.0, 10.0)));
        assert!(c.contains(Vec2::new(15.0, 10.0)), "boundary included");
        assert!(!c.contains(Vec2::new(14.0, 14.0)), "inside box, outside circle");
        let b = c.bounds();
        assert_eq!(b.min, Vec2::new(5.0, 5.0));
        assert_eq!(b.max, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn test_circle_validity() {
        assert!(Circle::new(Vec2::ZERO, 0.0).is_valid());
        assert!(!Circle::new(Vec2::ZERO, -1.0).is_valid());
        assert!(!Circle::new(Vec2::ZERO, f32::INFINITY).is_valid());
        assert!(!Circle::new(Vec2::new(f32::NAN, 0.0), 1.0).is_valid());
    }

    #[test]
    fn test_enclosing_and_padding() {
        assert!(Rect::enclosing(std::iter::empty()).is_none());

        let pts = [Vec2::new(10.0, 10.0), Vec2::new(90.0, 40.0), Vec2::new(50.0, -20.0)];
        let r = Rect::enclosing(pts).unwrap();
        assert_eq!(r.min, Vec2::new(10.0, -20.0));
        assert_eq!(r.max, Vec2::new(90.0, 40.0));

        let padded = r.padded(0.1, 1.0);
        for p in pts {
            assert!(padded.contains(p), "padded bounds must contain {p}");
        }
        assert!((padded.width() - 96.0).abs() < 1e-3);

        // A single point gets the minimum half-extent.
        let single = Rect::enclosing([Vec2::new(3.0, 4.0)]).unwrap().padded(0.1, 50.0);
        assert!(single.is_valid());
        assert_eq!(single.width(), 100.0);
        assert!(single.contains(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(5.0, -3.0, 1.0, 1.0);
        let u = a.union(&b);
        assert_eq!(u.min, Vec2::new(0.0, -3.0));
        assert_eq!(u.max, Vec2::new(6.0, 1.0));
    }
}
