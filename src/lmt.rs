// Copyright 2025 Lars Brubaker
// License: MIT
//
// Port of the GPC edge-table / local-minimum-table construction
// (gpc.c build_lmt, insert_bound, bound_list, add_to_sbtree, minimax_test).
//
// Each contour is reduced to its "optimal" vertices (points whose y differs
// from at least one neighbour), then split into monotonic edge bounds
// anchored at local minima. Bounds are registered in the LMT at their
// starting y, ordered by (bottom-x, slope). Every distinct vertex y is also
// recorded in the scan beam table, which becomes the sweep's stop list.
//
// In C, edges form a pointer graph. Here all edges live in one contiguous
// arena per clip call and every link (AET prev/next, bound chain pred/succ,
// LMT next-bound) is a u32 handle, INVALID when absent.

use crate::clip::ClipOp;
use crate::geom::{Point, Real};
use crate::polygon::Polygon;

/// Index into EdgeTable::nodes.
pub type EdgeId = u32;

/// Null handle sentinel.
pub const INVALID: u32 = u32::MAX;

// Polygon-tag / side / half-plane indices, kept as array indices so the
// classifier formulas read like the reference.
pub const CLIP: usize = 0;
pub const SUBJ: usize = 1;
pub const ABOVE: usize = 0;
pub const BELOW: usize = 1;
pub const LEFT: u8 = 0;
pub const RIGHT: u8 = 1;

/// Edge bundle state at a scanbeam boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum BundleState {
    #[default]
    Unbundled,
    BundleHead,
    /// Passive member of a bundle; its flags were absorbed by the head.
    BundleTail,
}

/// One directed edge of a monotonic bound.
#[derive(Clone, Debug)]
pub struct EdgeNode {
    pub bot: Point,
    pub top: Point,
    /// x where the edge crosses the current scanbeam bottom.
    pub xb: Real,
    /// x where the edge crosses the current scanbeam top.
    pub xt: Real,
    /// Change in x for a unit increase in y.
    pub dx: Real,
    /// Owning polygon: CLIP or SUBJ.
    pub kind: usize,
    /// Bundle edge flags, [ABOVE/BELOW][CLIP/SUBJ].
    pub bundle: [[u8; 2]; 2],
    /// Bundle left/right indicators per polygon.
    pub bside: [u8; 2],
    /// Bundle state per half-plane.
    pub bstate: [BundleState; 2],
    /// Output front handles per half-plane, INVALID when none.
    pub outp: [u32; 2],
    /// AET links.
    pub prev: EdgeId,
    pub next: EdgeId,
    /// Bound-chain links: edge connected at the lower / upper end.
    pub pred: EdgeId,
    pub succ: EdgeId,
    /// Next bound starting at the same LMT node.
    pub next_bound: EdgeId,
}

impl EdgeNode {
    pub(crate) fn new(bot: Point, top: Point, kind: usize, op: ClipOp) -> Self {
        EdgeNode {
            bot,
            top,
            xb: bot.x,
            xt: 0.0,
            dx: (top.x - bot.x) / (top.y - bot.y),
            kind,
            bundle: [[0; 2]; 2],
            bside: [
                if op == ClipOp::Difference { RIGHT } else { LEFT },
                LEFT,
            ],
            bstate: [BundleState::Unbundled; 2],
            outp: [INVALID; 2],
            prev: INVALID,
            next: INVALID,
            pred: INVALID,
            succ: INVALID,
            next_bound: INVALID,
        }
    }
}

/// Arena of all edges built for one clip invocation.
#[derive(Default)]
pub struct EdgeTable {
    pub nodes: Vec<EdgeNode>,
}

impl EdgeTable {
    pub fn new() -> Self {
        EdgeTable { nodes: Vec::new() }
    }
}

/// One local minimum: the y value and the x/slope-ordered list of bounds
/// starting there (chained through EdgeNode::next_bound).
#[derive(Clone, Debug)]
pub struct LmtNode {
    pub y: Real,
    pub first_bound: EdgeId,
}

/// Y-ordered local minimum table.
#[derive(Default)]
pub struct LmtTable {
    pub nodes: Vec<LmtNode>,
}

impl LmtTable {
    pub fn new() -> Self {
        LmtTable { nodes: Vec::new() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find or insert the node for `y`, keeping the table y-ascending.
    fn bound_list(&mut self, y: Real) -> usize {
        let mut i = 0;
        while i < self.nodes.len() {
            if y < self.nodes[i].y {
                break;
            }
            if y == self.nodes[i].y {
                return i;
            }
            i += 1;
        }
        self.nodes.insert(
            i,
            LmtNode {
                y,
                first_bound: INVALID,
            },
        );
        i
    }
}

/// Accumulator for every distinct y at which an edge starts or ends.
/// The reference grows a binary tree and flattens it; sorting a Vec and
/// collapsing duplicates produces the identical table.
#[derive(Default)]
pub struct ScanBeamTable {
    ys: Vec<Real>,
}

impl ScanBeamTable {
    pub fn new() -> Self {
        ScanBeamTable { ys: Vec::new() }
    }

    #[inline]
    pub fn record(&mut self, y: Real) {
        self.ys.push(y);
    }

    /// Sorted, de-duplicated scan beam list.
    pub fn build(mut self) -> Vec<Real> {
        self.ys.sort_by(Real::total_cmp);
        self.ys.dedup();
        self.ys
    }
}

#[inline]
fn prev_index(i: usize, n: usize) -> usize {
    (i + n - 1) % n
}

#[inline]
fn next_index(i: usize, n: usize) -> usize {
    (i + 1) % n
}

/// Vertex keeps its place only if its y differs from a neighbour's; this
/// drops redundant collinear points on horizontal runs.
#[inline]
fn optimal(points: &[Point], i: usize) -> bool {
    let n = points.len();
    points[prev_index(i, n)].y != points[i].y || points[next_index(i, n)].y != points[i].y
}

#[inline]
fn fwd_min(v: &[Point], i: usize) -> bool {
    let n = v.len();
    v[prev_index(i, n)].y >= v[i].y && v[next_index(i, n)].y > v[i].y
}

#[inline]
fn not_fmax(v: &[Point], i: usize) -> bool {
    v[next_index(i, v.len())].y > v[i].y
}

#[inline]
fn rev_min(v: &[Point], i: usize) -> bool {
    let n = v.len();
    v[prev_index(i, n)].y > v[i].y && v[next_index(i, n)].y >= v[i].y
}

#[inline]
fn not_rmax(v: &[Point], i: usize) -> bool {
    v[prev_index(i, v.len())].y > v[i].y
}

/// Insert bound `e` into the LMT node's bound list, primary-sorted on
/// bottom-x, secondary on slope. Ties keep insertion order.
fn insert_bound(edges: &mut [EdgeNode], lmt: &mut LmtTable, node: usize, e: EdgeId) {
    let mut current = lmt.nodes[node].first_bound;
    if current == INVALID {
        lmt.nodes[node].first_bound = e;
        return;
    }
    let mut prev: EdgeId = INVALID;
    loop {
        let cur = &edges[current as usize];
        let before = edges[e as usize].bot.x < cur.bot.x
            || (edges[e as usize].bot.x == cur.bot.x && edges[e as usize].dx < cur.dx);
        if before {
            if prev == INVALID {
                lmt.nodes[node].first_bound = e;
            } else {
                edges[prev as usize].next_bound = e;
            }
            edges[e as usize].next_bound = current;
            return;
        }
        if cur.next_bound == INVALID {
            edges[current as usize].next_bound = e;
            return;
        }
        prev = current;
        current = edges[current as usize].next_bound;
    }
}

/// Build the LMT and scan beam entries for one polygon. `contributing`
/// holds the per-contour verdict of the minimax pre-filter (or the caller's
/// own override); non-contributing contours produce no edges at all.
pub fn build_lmt(
    edges: &mut EdgeTable,
    lmt: &mut LmtTable,
    sbt: &mut ScanBeamTable,
    poly: &Polygon,
    contributing: &[bool],
    kind: usize,
    op: ClipOp,
) {
    for (c, contour) in poly.contours.iter().enumerate() {
        if !contributing[c] || contour.points.len() < 3 {
            continue;
        }

        // Contour optimisation: drop vertices that sit inside a horizontal
        // run, record the survivors' y values as scanbeam candidates.
        let mut v: Vec<Point> = Vec::with_capacity(contour.points.len());
        for i in 0..contour.points.len() {
            if optimal(&contour.points, i) {
                v.push(contour.points[i]);
                sbt.record(contour.points[i].y);
            }
        }
        let n = v.len();
        if n == 0 {
            continue;
        }

        // Forward pass: ascending bounds from forward local minima.
        for min in 0..n {
            if !fwd_min(&v, min) {
                continue;
            }
            let mut num_edges = 1usize;
            let mut max = next_index(min, n);
            while not_fmax(&v, max) {
                num_edges += 1;
                max = next_index(max, n);
            }

            let first = edges.nodes.len() as EdgeId;
            let mut vi = min;
            for i in 0..num_edges {
                let bot = v[vi];
                vi = next_index(vi, n);
                let top = v[vi];
                let mut e = EdgeNode::new(bot, top, kind, op);
                if i > 0 {
                    e.pred = first + i as u32 - 1;
                }
                if i + 1 < num_edges {
                    e.succ = first + i as u32 + 1;
                }
                edges.nodes.push(e);
            }
            let node = lmt.bound_list(v[min].y);
            insert_bound(&mut edges.nodes, lmt, node, first);
        }

        // Reverse pass: descending bounds from reverse local minima.
        for min in 0..n {
            if !rev_min(&v, min) {
                continue;
            }
            let mut num_edges = 1usize;
            let mut max = prev_index(min, n);
            while not_rmax(&v, max) {
                num_edges += 1;
                max = prev_index(max, n);
            }

            let first = edges.nodes.len() as EdgeId;
            let mut vi = min;
            for i in 0..num_edges {
                let bot = v[vi];
                vi = prev_index(vi, n);
                let top = v[vi];
                let mut e = EdgeNode::new(bot, top, kind, op);
                if i > 0 {
                    e.pred = first + i as u32 - 1;
                }
                if i + 1 < num_edges {
                    e.succ = first + i as u32 + 1;
                }
                edges.nodes.push(e);
            }
            let node = lmt.bound_list(v[min].y);
            insert_bound(&mut edges.nodes, lmt, node, first);
        }
    }
}

/// Bounding-box pre-filter for INTERSECTION and DIFFERENCE: a clip contour
/// overlapping no subject contour cannot contribute, and under INTERSECTION
/// the same holds for subject contours against the clip polygon.
pub fn minimax_test(
    subj: &Polygon,
    clip: &Polygon,
    op: ClipOp,
    s_contrib: &mut [bool],
    c_contrib: &mut [bool],
) {
    let s_bbox: Vec<_> = subj.contours.iter().map(|c| c.bbox()).collect();
    let c_bbox: Vec<_> = clip.contours.iter().map(|c| c.bbox()).collect();

    let mut o_table = vec![false; s_bbox.len() * c_bbox.len()];
    for (s, sb) in s_bbox.iter().enumerate() {
        for (c, cb) in c_bbox.iter().enumerate() {
            o_table[s * c_bbox.len() + c] = sb.overlaps(cb);
        }
    }

    for c in 0..c_bbox.len() {
        let overlap = (0..s_bbox.len()).any(|s| o_table[s * c_bbox.len() + c]);
        if !overlap {
            c_contrib[c] = false;
        }
    }

    if op == ClipOp::Intersection {
        for s in 0..s_bbox.len() {
            let overlap = (0..c_bbox.len()).any(|c| o_table[s * c_bbox.len() + c]);
            if !overlap {
                s_contrib[s] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Contour;

    fn square(x: Real, y: Real, size: Real) -> Polygon {
        Polygon::from_points([
            (x, y),
            (x + size, y),
            (x + size, y + size),
            (x, y + size),
        ])
    }

    fn build(poly: &Polygon, kind: usize, op: ClipOp) -> (EdgeTable, LmtTable, Vec<Real>) {
        let mut edges = EdgeTable::new();
        let mut lmt = LmtTable::new();
        let mut sbt = ScanBeamTable::new();
        let contributing = vec![true; poly.num_contours()];
        build_lmt(&mut edges, &mut lmt, &mut sbt, poly, &contributing, kind, op);
        (edges, lmt, sbt.build())
    }

    #[test]
    fn square_produces_one_minimum_with_two_bounds() {
        let (edges, lmt, sbt) = build(&square(0.0, 0.0, 1.0), SUBJ, ClipOp::Union);
        assert_eq!(lmt.nodes.len(), 1);
        assert_eq!(lmt.nodes[0].y, 0.0);
        assert_eq!(sbt, vec![0.0, 1.0]);

        // Two bounds, each a single vertical-ish edge pair side.
        let first = lmt.nodes[0].first_bound;
        assert_ne!(first, INVALID);
        let second = edges.nodes[first as usize].next_bound;
        assert_ne!(second, INVALID);
        assert_eq!(edges.nodes[second as usize].next_bound, INVALID);

        // Bounds are x-ordered: left side before right side.
        assert!(edges.nodes[first as usize].bot.x <= edges.nodes[second as usize].bot.x);
        assert_eq!(edges.nodes.len(), 2);
    }

    #[test]
    fn horizontal_duplicates_are_dropped() {
        // Extra collinear point in the middle of the bottom edge.
        let poly = Polygon::from_points([
            (0.0, 0.0),
            (0.5, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
        ]);
        let (edges, _, _) = build(&poly, SUBJ, ClipOp::Union);
        // The midpoint (0.5, 0.0) has equal-y neighbours on both sides and
        // must not generate edges.
        assert!(edges
            .nodes
            .iter()
            .all(|e| e.bot.x != 0.5 && e.top.x != 0.5));
    }

    #[test]
    fn w_profile_collects_all_bounds_at_shared_minimum_y() {
        // Two local minima at y=0 with a maximum between them. Each minimum
        // contributes one forward and one reverse bound, all registered at
        // the same LMT node.
        let poly = Polygon::from_points([
            (0.0, 0.0),
            (1.0, 2.0),
            (2.0, 0.0),
            (3.0, 3.0),
            (-1.0, 3.0),
        ]);
        let (edges, lmt, _) = build(&poly, SUBJ, ClipOp::Union);
        assert_eq!(lmt.nodes.len(), 1);
        let mut bounds = 0;
        let mut b = lmt.nodes[0].first_bound;
        while b != INVALID {
            bounds += 1;
            b = edges.nodes[b as usize].next_bound;
        }
        assert_eq!(bounds, 4);
    }

    #[test]
    fn difference_inverts_clip_side() {
        let (edges, _, _) = build(&square(0.0, 0.0, 1.0), CLIP, ClipOp::Difference);
        assert!(edges.nodes.iter().all(|e| e.bside[CLIP] == RIGHT));
        let (edges, _, _) = build(&square(0.0, 0.0, 1.0), CLIP, ClipOp::Union);
        assert!(edges.nodes.iter().all(|e| e.bside[CLIP] == LEFT));
    }

    #[test]
    fn short_contours_build_nothing() {
        let mut poly = Polygon::new();
        poly.add_contour(Contour::from_points([(0.0, 0.0), (1.0, 1.0)]));
        let (edges, lmt, sbt) = build(&poly, SUBJ, ClipOp::Union);
        assert!(edges.nodes.is_empty());
        assert!(lmt.is_empty());
        assert!(sbt.is_empty());
    }

    #[test]
    fn minimax_flags_disjoint_contours() {
        let subj = square(0.0, 0.0, 1.0);
        let clip = square(10.0, 10.0, 1.0);
        let mut s = vec![true; 1];
        let mut c = vec![true; 1];
        minimax_test(&subj, &clip, ClipOp::Intersection, &mut s, &mut c);
        assert!(!s[0]);
        assert!(!c[0]);

        // DIFFERENCE only prunes the clip side.
        let mut s = vec![true; 1];
        let mut c = vec![true; 1];
        minimax_test(&subj, &clip, ClipOp::Difference, &mut s, &mut c);
        assert!(s[0]);
        assert!(!c[0]);
    }
}
