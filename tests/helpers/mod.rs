// Copyright 2025 Lars Brubaker
// Shared test utilities for gpc-rust tests.

#![allow(dead_code)]

use gpc_rust::{Mesh, Point, Polygon};

/// Axis-aligned square with lower-left corner (x, y).
pub fn square(x: f32, y: f32, size: f32) -> Polygon {
    rect(x, y, size, size)
}

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Polygon {
    Polygon::from_points([(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
}

pub fn triangle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Polygon {
    Polygon::from_points([a, b, c])
}

pub fn assert_area_approx(actual: f32, expected: f32, tolerance: f32, label: &str) {
    assert!(
        (actual - expected).abs() < tolerance,
        "{}: expected area ~{}, got {} (diff={})",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}

/// Every result contour must close with more than two vertices.
pub fn verify_no_degenerate_contours(poly: &Polygon) {
    for (i, c) in poly.contours.iter().enumerate() {
        assert!(
            c.points.len() > 2,
            "contour {} has only {} points",
            i,
            c.points.len()
        );
        for p in &c.points {
            assert!(p.x.is_finite() && p.y.is_finite(), "non-finite vertex in contour {}", i);
        }
    }
}

/// Every strip must carry at least one triangle.
pub fn verify_no_degenerate_strips(mesh: &Mesh) {
    for (i, s) in mesh.strips.iter().enumerate() {
        assert!(
            s.points.len() > 2,
            "strip {} has only {} points",
            i,
            s.points.len()
        );
        for p in &s.points {
            assert!(p.x.is_finite() && p.y.is_finite(), "non-finite vertex in strip {}", i);
        }
    }
}

/// All vertices of a polygon, sorted, for order-insensitive comparison.
fn sorted_points(poly: &Polygon) -> Vec<Point> {
    let mut pts: Vec<Point> = poly
        .contours
        .iter()
        .flat_map(|c| c.points.iter().copied())
        .collect();
    pts.sort_by(|a, b| {
        a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
    });
    pts
}

/// Equality up to contour rotation and point order: same total area and the
/// same vertex multiset within tolerance.
pub fn assert_same_region(a: &Polygon, b: &Polygon, tolerance: f32, label: &str) {
    assert_area_approx(a.area(), b.area(), tolerance, label);
    let pa = sorted_points(a);
    let pb = sorted_points(b);
    assert_eq!(
        pa.len(),
        pb.len(),
        "{}: vertex counts differ ({} vs {})",
        label,
        pa.len(),
        pb.len()
    );
    for (p, q) in pa.iter().zip(pb.iter()) {
        assert!(
            (p.x - q.x).abs() < tolerance && (p.y - q.y).abs() < tolerance,
            "{}: vertex mismatch ({}, {}) vs ({}, {})",
            label,
            p.x,
            p.y,
            q.x,
            q.y
        );
    }
}
