// Copyright 2025 Lars Brubaker
// Tristrip output mode: the same clip semantics, triangulated.

mod helpers;

use gpc_rust::{clip_to_mesh, difference, polygon_to_mesh, ClipOp, Polygon};
use helpers::{assert_area_approx, square, verify_no_degenerate_strips};

#[test]
fn mesh_area_matches_polygon_area() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(0.5, 0.5, 1.0);

    let cases = [
        (ClipOp::Intersection, 0.25),
        (ClipOp::Union, 1.75),
        (ClipOp::Xor, 1.5),
        (ClipOp::Difference, 0.75),
    ];
    for (op, expected) in cases {
        let mesh = clip_to_mesh(op, &a, &b);
        verify_no_degenerate_strips(&mesh);
        assert_area_approx(mesh.area(), expected, 1e-4, &format!("{:?} mesh", op));
    }
}

#[test]
fn disjoint_union_yields_two_strips() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(5.0, 5.0, 1.0);
    let mesh = clip_to_mesh(ClipOp::Union, &a, &b);
    verify_no_degenerate_strips(&mesh);
    assert_eq!(mesh.num_strips(), 2);
    assert_area_approx(mesh.area(), 2.0, 1e-4, "disjoint mesh union");
}

#[test]
fn polygon_to_mesh_tessellates_a_square() {
    let a = square(0.0, 0.0, 2.0);
    let mesh = polygon_to_mesh(&a);
    verify_no_degenerate_strips(&mesh);
    assert_eq!(mesh.num_strips(), 1);
    assert_area_approx(mesh.area(), 4.0, 1e-4, "square tessellation");
}

#[test]
fn polygon_to_mesh_handles_holes() {
    // Tessellating a square-with-hole covers exactly the ring area.
    let d = difference(&square(0.0, 0.0, 4.0), &square(1.0, 1.0, 2.0));
    assert_eq!(d.num_contours(), 2);
    let mesh = polygon_to_mesh(&d);
    verify_no_degenerate_strips(&mesh);
    assert!(mesh.num_strips() >= 2);
    assert_area_approx(mesh.area(), 12.0, 1e-4, "ring tessellation");
}

#[test]
fn polygon_to_mesh_drops_open_contours() {
    let mut p = square(0.0, 0.0, 1.0);
    p.contours
        .push(gpc_rust::Contour::from_points([(5.0, 5.0), (6.0, 6.0)]));
    let mesh = polygon_to_mesh(&p);
    verify_no_degenerate_strips(&mesh);
    assert_area_approx(mesh.area(), 1.0, 1e-4, "open contour dropped");
}

#[test]
fn triangle_tessellates_to_one_triangle() {
    let t = helpers::triangle((0.0, 0.0), (2.0, 0.0), (1.0, 2.0));
    let mesh = polygon_to_mesh(&t);
    verify_no_degenerate_strips(&mesh);
    assert_eq!(mesh.num_strips(), 1);
    assert_eq!(mesh.strips[0].triangle_count(), 1);
    assert_area_approx(mesh.area(), 2.0, 1e-4, "triangle tessellation");
}

#[test]
fn empty_inputs_produce_empty_meshes() {
    let a = square(0.0, 0.0, 1.0);
    let empty = Polygon::new();
    assert!(clip_to_mesh(ClipOp::Intersection, &a, &empty).is_empty());
    assert!(clip_to_mesh(ClipOp::Intersection, &empty, &a).is_empty());
    assert!(clip_to_mesh(ClipOp::Difference, &empty, &a).is_empty());
    assert!(clip_to_mesh(ClipOp::Union, &empty, &empty).is_empty());
    assert!(polygon_to_mesh(&empty).is_empty());
}

#[test]
fn strip_triangles_are_consistent_with_vertex_count() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(0.5, 0.5, 1.0);
    let mesh = clip_to_mesh(ClipOp::Union, &a, &b);
    for strip in &mesh.strips {
        assert_eq!(strip.triangle_count(), strip.points.len() - 2);
    }
    assert!(mesh.vertex_count() >= 3 * mesh.num_strips());
}
