// Copyright 2025 Lars Brubaker
// License: MIT
//
// Numeric contract and small geometric primitives shared by the clipper.
//
// All coordinates are f32, matching the data the engine is fed by upstream
// flatteners. Equality of x-positions and slopes is decided by GPC_EPSILON,
// a named constant so callers can reason about (and tests can reference)
// the exact tolerance in use.

pub type Real = f32;

/// Tolerance for "equal x" / "equal slope" comparisons, from GPC 2.31.
/// Comparisons are performed in f64 so the tolerance keeps its meaning even
/// though stored coordinates are f32.
pub const GPC_EPSILON: f64 = 2.220_446_049_250_313_1e-16;

/// Returns true if a and b are equal within GPC_EPSILON.
#[inline]
pub fn eq(a: Real, b: Real) -> bool {
    (a as f64 - b as f64).abs() <= GPC_EPSILON
}

/// A 2D point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }
}

impl From<(Real, Real)> for Point {
    #[inline]
    fn from((x, y): (Real, Real)) -> Self {
        Point { x, y }
    }
}

impl From<Point> for (Real, Real) {
    #[inline]
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Axis-aligned bounding box used by the minimax contour pre-filter.
#[derive(Copy, Clone, Debug)]
pub struct BBox {
    pub xmin: Real,
    pub ymin: Real,
    pub xmax: Real,
    pub ymax: Real,
}

impl BBox {
    /// Smallest box containing all of `points`. An empty slice yields an
    /// inverted box that overlaps nothing.
    pub fn of_points(points: &[Point]) -> BBox {
        let mut b = BBox {
            xmin: Real::MAX,
            ymin: Real::MAX,
            xmax: Real::MIN,
            ymax: Real::MIN,
        };
        for p in points {
            if p.x < b.xmin {
                b.xmin = p.x;
            }
            if p.y < b.ymin {
                b.ymin = p.y;
            }
            if p.x > b.xmax {
                b.xmax = p.x;
            }
            if p.y > b.ymax {
                b.ymax = p.y;
            }
        }
        b
    }

    /// Closed-interval overlap test (touching boxes overlap).
    #[inline]
    pub fn overlaps(&self, other: &BBox) -> bool {
        !(self.xmax < other.xmin || self.xmin > other.xmax)
            && !(self.ymax < other.ymin || self.ymin > other.ymax)
    }
}
