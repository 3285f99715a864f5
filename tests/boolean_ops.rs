// Copyright 2025 Lars Brubaker
// Boolean operation correctness on concrete shapes, with area verification.

mod helpers;

use gpc_rust::lmt::{build_lmt, minimax_test, EdgeTable, LmtTable, ScanBeamTable, CLIP, SUBJ};
use gpc_rust::{difference, intersection, union, xor, ClipOp, Polygon};
use helpers::{assert_area_approx, square, verify_no_degenerate_contours};

#[test]
fn overlapping_unit_squares() {
    // A at the origin, B shifted by (0.5, 0.5): overlap is a 0.5 x 0.5 square.
    let a = square(0.0, 0.0, 1.0);
    let b = square(0.5, 0.5, 1.0);

    let i = intersection(&a, &b);
    verify_no_degenerate_contours(&i);
    assert_eq!(i.num_contours(), 1);
    assert_area_approx(i.area(), 0.25, 1e-5, "intersection");

    let u = union(&a, &b);
    verify_no_degenerate_contours(&u);
    assert_eq!(u.num_contours(), 1);
    assert_area_approx(u.area(), 1.75, 1e-5, "union");

    let x = xor(&a, &b);
    verify_no_degenerate_contours(&x);
    assert_area_approx(x.area(), 1.5, 1e-5, "xor");

    let d = difference(&a, &b);
    verify_no_degenerate_contours(&d);
    assert_area_approx(d.area(), 0.75, 1e-5, "difference");
}

#[test]
fn difference_carves_a_hole() {
    // Subtracting an interior square leaves a shell plus exactly one hole.
    let outer = square(0.0, 0.0, 4.0);
    let inner = square(1.0, 1.0, 2.0);

    let d = difference(&outer, &inner);
    verify_no_degenerate_contours(&d);
    assert_eq!(d.num_contours(), 2);
    let holes = d.contours.iter().filter(|c| c.is_hole).count();
    assert_eq!(holes, 1);
    // Holes sort after shells.
    assert!(!d.contours[0].is_hole);
    assert!(d.contours[1].is_hole);
    assert_area_approx(d.area(), 12.0, 1e-5, "square with hole");
}

#[test]
fn disjoint_squares_intersect_to_nothing() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(100.0, 100.0, 1.0);
    assert!(intersection(&a, &b).is_empty());

    // The minimax pre-filter alone must prove this: with both contours
    // flagged non-contributing, no sweep edges are built at all.
    let mut s_contrib = vec![true; 1];
    let mut c_contrib = vec![true; 1];
    minimax_test(&a, &b, ClipOp::Intersection, &mut s_contrib, &mut c_contrib);
    assert_eq!(s_contrib, vec![false]);
    assert_eq!(c_contrib, vec![false]);

    let mut edges = EdgeTable::new();
    let mut lmt = LmtTable::new();
    let mut sbt = ScanBeamTable::new();
    build_lmt(&mut edges, &mut lmt, &mut sbt, &a, &s_contrib, SUBJ, ClipOp::Intersection);
    build_lmt(&mut edges, &mut lmt, &mut sbt, &b, &c_contrib, CLIP, ClipOp::Intersection);
    assert!(edges.nodes.is_empty());
    assert!(lmt.is_empty());
}

#[test]
fn union_of_disjoint_squares_keeps_both_contours() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(3.0, 3.0, 1.0);
    let u = union(&a, &b);
    verify_no_degenerate_contours(&u);
    assert_eq!(u.num_contours(), 2);
    assert_area_approx(u.area(), 2.0, 1e-5, "disjoint union");
}

#[test]
fn contained_square_union_absorbs() {
    let big = square(0.0, 0.0, 4.0);
    let small = square(1.0, 1.0, 1.0);
    let u = union(&big, &small);
    assert_eq!(u.num_contours(), 1);
    assert_area_approx(u.area(), 16.0, 1e-5, "containment union");

    let i = intersection(&big, &small);
    assert_eq!(i.num_contours(), 1);
    assert_area_approx(i.area(), 1.0, 1e-5, "containment intersection");
}

#[test]
fn xor_of_nested_squares_is_a_ring() {
    let outer = square(0.0, 0.0, 4.0);
    let inner = square(1.0, 1.0, 2.0);
    let x = xor(&outer, &inner);
    verify_no_degenerate_contours(&x);
    assert_eq!(x.num_contours(), 2);
    assert_eq!(x.contours.iter().filter(|c| c.is_hole).count(), 1);
    assert_area_approx(x.area(), 12.0, 1e-5, "nested xor");
}

#[test]
fn self_intersecting_bowtie_resolves_by_parity() {
    // The bowtie's diagonals cross at (1, 1); even-odd filling yields two
    // triangles of unit area each. A far-away square forces the sweep to run.
    let bowtie = Polygon::from_points([(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
    let far = square(10.0, 10.0, 1.0);
    let u = union(&bowtie, &far);
    verify_no_degenerate_contours(&u);
    assert_area_approx(u.area(), 3.0, 1e-4, "bowtie union");
}

#[test]
fn multi_contour_subject_clips_per_contour() {
    // Two subject squares, clip overlaps only the first.
    let mut subj = square(0.0, 0.0, 2.0);
    subj.contours
        .extend(square(10.0, 0.0, 2.0).contours);
    let clip_poly = square(1.0, 1.0, 2.0);

    let i = intersection(&subj, &clip_poly);
    assert_eq!(i.num_contours(), 1);
    assert_area_approx(i.area(), 1.0, 1e-5, "multi-contour intersection");

    let d = difference(&subj, &clip_poly);
    verify_no_degenerate_contours(&d);
    assert_area_approx(d.area(), 7.0, 1e-5, "multi-contour difference");
}

#[test]
fn shared_edge_squares_union_merges() {
    // Two squares sharing a full vertical edge; the union is one rectangle
    // and the coincident edges must bundle away.
    let a = square(0.0, 0.0, 1.0);
    let b = square(1.0, 0.0, 1.0);
    let u = union(&a, &b);
    verify_no_degenerate_contours(&u);
    assert_eq!(u.num_contours(), 1);
    assert_area_approx(u.area(), 2.0, 1e-5, "shared edge union");

    // Their intersection is a zero-area sliver and must vanish.
    let i = intersection(&a, &b);
    assert_area_approx(i.area(), 0.0, 1e-5, "shared edge intersection");
}

#[test]
fn triangle_clipping() {
    let t = helpers::triangle((0.0, 0.0), (4.0, 0.0), (2.0, 4.0));
    let band = helpers::rect(0.0, 1.0, 4.0, 1.0);
    // Horizontal band across the triangle: a trapezoid of height 1.
    // Width at y=1 is 3, at y=2 is 2, so area = (3 + 2) / 2.
    let i = intersection(&t, &band);
    verify_no_degenerate_contours(&i);
    assert_area_approx(i.area(), 2.5, 1e-4, "triangle band intersection");
}
