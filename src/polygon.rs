// Copyright 2025 Lars Brubaker
// License: MIT
//
// Public data model: polygons (lists of contours with hole flags) on the
// input and output side, and triangle-strip meshes on the output side.
//
// A Contour is a closed point sequence; the closing segment from the last
// point back to the first is implicit. Orientation is not significant to the
// clipper; holes are identified by the `is_hole` flag, not by winding.

use crate::geom::{BBox, Point, Real};

/// One closed boundary of a polygon.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
    pub points: Vec<Point>,
    /// True if this contour bounds a hole rather than filled area.
    pub is_hole: bool,
    /// Cleared by the minimax pre-filter to skip contours that cannot affect
    /// the result. Always true on output; honored as an input override.
    pub is_contributing: bool,
}

impl Contour {
    pub fn new() -> Self {
        Contour {
            points: Vec::new(),
            is_hole: false,
            is_contributing: true,
        }
    }

    /// Build a contour from (x, y) pairs.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Point>,
    {
        Contour {
            points: points.into_iter().map(Into::into).collect(),
            is_hole: false,
            is_contributing: true,
        }
    }

    #[inline]
    pub fn add_point(&mut self, x: Real, y: Real) {
        self.points.push(Point::new(x, y));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed shoelace area; sign depends on winding direction.
    pub fn signed_area(&self) -> Real {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0f32;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area * 0.5
    }

    /// Unsigned enclosed area.
    #[inline]
    pub fn area(&self) -> Real {
        self.signed_area().abs()
    }

    pub fn bbox(&self) -> BBox {
        BBox::of_points(&self.points)
    }
}

/// A polygon: zero or more contours, holes flagged individually.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    pub contours: Vec<Contour>,
}

impl Polygon {
    pub fn new() -> Self {
        Polygon {
            contours: Vec::new(),
        }
    }

    /// Convenience: a single-contour polygon from (x, y) pairs.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Point>,
    {
        Polygon {
            contours: vec![Contour::from_points(points)],
        }
    }

    #[inline]
    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    #[inline]
    pub fn num_contours(&self) -> usize {
        self.contours.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Total enclosed area: shell contours add, hole contours subtract.
    pub fn area(&self) -> Real {
        let mut total = 0.0f32;
        for c in &self.contours {
            if c.is_hole {
                total -= c.area();
            } else {
                total += c.area();
            }
        }
        total
    }

    /// Bounding box over every contour. Empty polygons yield an inverted box.
    pub fn bbox(&self) -> BBox {
        let mut points: Vec<Point> = Vec::new();
        for c in &self.contours {
            points.extend_from_slice(&c.points);
        }
        BBox::of_points(&points)
    }

    /// Drop contours that cannot close (fewer than 3 points). The clipper
    /// does this filtering internally; this is for callers preparing input.
    pub fn remove_open_contours(&self) -> Polygon {
        Polygon {
            contours: self
                .contours
                .iter()
                .filter(|c| c.points.len() >= 3)
                .cloned()
                .collect(),
        }
    }
}

/// One triangle strip: points [p0, p1, p2, p3, ...] encode triangles
/// (p0,p1,p2), (p1,p2,p3), ... with alternating winding.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriStrip {
    pub points: Vec<Point>,
}

impl TriStrip {
    pub fn new() -> Self {
        TriStrip { points: Vec::new() }
    }

    #[inline]
    pub fn add_point(&mut self, x: Real, y: Real) {
        self.points.push(Point::new(x, y));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of triangles encoded by the strip.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.points.len().saturating_sub(2)
    }

    /// Sum of unsigned triangle areas.
    pub fn area(&self) -> Real {
        let mut total = 0.0f32;
        for w in self.points.windows(3) {
            let (a, b, c) = (w[0], w[1], w[2]);
            total += (0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))).abs();
        }
        total
    }
}

/// A triangulated clip result: a list of triangle strips.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub strips: Vec<TriStrip>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh { strips: Vec::new() }
    }

    #[inline]
    pub fn add_strip(&mut self, strip: TriStrip) {
        self.strips.push(strip);
    }

    #[inline]
    pub fn num_strips(&self) -> usize {
        self.strips.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.strips.iter().map(|s| s.points.len()).sum()
    }

    /// Total triangulated area.
    pub fn area(&self) -> Real {
        self.strips.iter().map(|s| s.area()).sum()
    }
}
