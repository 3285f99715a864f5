// Copyright 2025 Lars Brubaker
// License: MIT
//
// Port of the GPC scanbeam sweep (gpc.c gpc_polygon_clip / gpc_tristrip_clip).
//
// The two C entry points share everything except what happens when the
// classifier fires: the polygon clipper grows contour fronts, the tristrip
// clipper grows triangle strips. Here a single sweep loop is parameterized
// by a FrontBuilder so the beam machinery — bundling, parity, horizontal
// state, the intersection table, AET maintenance — exists exactly once.
//
// The sixteen-way vertex classification and the per-operation quadrant
// formulas are transcribed from the reference verbatim. They are the
// semantic core of the algorithm and are not derivable from first
// principles; do not "simplify" them.

use log::{debug, trace};

use crate::aet::Aet;
use crate::geom::{eq, Point, Real, GPC_EPSILON};
use crate::lmt::{
    build_lmt, minimax_test, BundleState, EdgeId, EdgeNode, EdgeTable, LmtTable, ScanBeamTable,
    ABOVE, BELOW, CLIP, INVALID, LEFT, RIGHT, SUBJ,
};
use crate::output::{ContourFronts, StripFronts};
use crate::polygon::{Mesh, Polygon};

/// The supported boolean operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipOp {
    Difference,
    Intersection,
    Xor,
    Union,
}

// ─────────────────────────────── Public API ───────────────────────────────

/// Clip `subject` against `clip_poly`, returning the result as a polygon
/// with shell contours first and hole contours appended after.
pub fn clip(op: ClipOp, subject: &Polygon, clip_poly: &Polygon) -> Polygon {
    if trivial_null(op, subject, clip_poly) {
        return Polygon::new();
    }
    // An empty operand under UNION or XOR cannot change the other: pass it
    // through without running the sweep.
    if subject.is_empty() && (op == ClipOp::Union || op == ClipOp::Xor) {
        return clip_poly.clone();
    }
    if clip_poly.is_empty() && (op == ClipOp::Union || op == ClipOp::Xor) {
        return subject.clone();
    }
    debug!(
        "clip {:?}: subject {} contours, clip {} contours",
        op,
        subject.num_contours(),
        clip_poly.num_contours()
    );
    sweep(op, subject, clip_poly, ContourBuilder::default())
}

/// Clip `subject` against `clip_poly`, returning the result triangulated
/// into triangle strips.
pub fn clip_to_mesh(op: ClipOp, subject: &Polygon, clip_poly: &Polygon) -> Mesh {
    if trivial_null(op, subject, clip_poly) {
        return Mesh::new();
    }
    debug!(
        "clip_to_mesh {:?}: subject {} contours, clip {} contours",
        op,
        subject.num_contours(),
        clip_poly.num_contours()
    );
    sweep(op, subject, clip_poly, StripBuilder::default())
}

pub fn union(a: &Polygon, b: &Polygon) -> Polygon {
    clip(ClipOp::Union, a, b)
}

pub fn intersection(a: &Polygon, b: &Polygon) -> Polygon {
    clip(ClipOp::Intersection, a, b)
}

pub fn xor(a: &Polygon, b: &Polygon) -> Polygon {
    clip(ClipOp::Xor, a, b)
}

pub fn difference(a: &Polygon, b: &Polygon) -> Polygon {
    clip(ClipOp::Difference, a, b)
}

/// Tessellate a single polygon into triangle strips (a union against an
/// empty clip polygon).
pub fn polygon_to_mesh(p: &Polygon) -> Mesh {
    let cleaned = p.remove_open_contours();
    clip_to_mesh(ClipOp::Union, &cleaned, &Polygon::new())
}

/// The trivial empty-result cases shared by both output modes.
fn trivial_null(op: ClipOp, subject: &Polygon, clip_poly: &Polygon) -> bool {
    (subject.is_empty() && clip_poly.is_empty())
        || (subject.is_empty() && (op == ClipOp::Intersection || op == ClipOp::Difference))
        || (clip_poly.is_empty() && op == ClipOp::Intersection)
}

// ──────────────────────────── Classifier tables ───────────────────────────

/// Vertex classification at a topology-change event, encoded from the four
/// quadrant occupancy bits as tr + 2·tl + 4·br + 8·bl.
#[derive(Copy, Clone, Debug, PartialEq)]
enum VertexType {
    /// Empty non-intersection.
    Nul = 0,
    /// External maximum.
    Emx = 1,
    /// External left intermediate.
    Eli = 2,
    /// Top edge.
    Ted = 3,
    /// External right intermediate.
    Eri = 4,
    /// Right edge.
    Red = 5,
    /// Internal maximum and minimum.
    Imm = 6,
    /// Internal minimum.
    Imn = 7,
    /// External minimum.
    Emn = 8,
    /// External maximum and minimum.
    Emm = 9,
    /// Left edge.
    Led = 10,
    /// Internal left intermediate.
    Ili = 11,
    /// Bottom edge.
    Bed = 12,
    /// Internal right intermediate.
    Iri = 13,
    /// Internal maximum.
    Imx = 14,
    /// Full non-intersection.
    Ful = 15,
}

impl VertexType {
    fn from_bits(tr: u8, tl: u8, br: u8, bl: u8) -> VertexType {
        match tr + (tl << 1) + (br << 2) + (bl << 3) {
            0 => VertexType::Nul,
            1 => VertexType::Emx,
            2 => VertexType::Eli,
            3 => VertexType::Ted,
            4 => VertexType::Eri,
            5 => VertexType::Red,
            6 => VertexType::Imm,
            7 => VertexType::Imn,
            8 => VertexType::Emn,
            9 => VertexType::Emm,
            10 => VertexType::Led,
            11 => VertexType::Ili,
            12 => VertexType::Bed,
            13 => VertexType::Iri,
            14 => VertexType::Imx,
            _ => VertexType::Ful,
        }
    }
}

/// Horizontal edge states and the transition table applied per polygon as
/// the classifier walks the AET. Indexed by [state][((exists - 1) << 1) + parity].
mod hstate {
    pub const NH: u8 = 0;
    pub const BH: u8 = 1;
    pub const TH: u8 = 2;

    pub const NEXT: [[u8; 6]; 3] = [
        [BH, TH, TH, BH, NH, NH],
        [NH, NH, NH, NH, TH, TH],
        [NH, NH, NH, NH, BH, BH],
    ];
}

/// Contributing flag and quadrant occupancy bits (tr, tl, br, bl) for one
/// edge at a scanbeam boundary, before the parity/horizontal updates.
fn classify_boundary(
    op: ClipOp,
    exists: &[u8; 2],
    parity: &[u8; 2],
    horiz: &[u8; 2],
    edge: &EdgeNode,
) -> (bool, u8, u8, u8, u8) {
    let hc = (horiz[CLIP] != hstate::NH) as u8;
    let hs = (horiz[SUBJ] != hstate::NH) as u8;
    match op {
        ClipOp::Difference | ClipOp::Intersection => {
            let contributing = (exists[CLIP] != 0 && (parity[SUBJ] != 0 || horiz[SUBJ] != 0))
                || (exists[SUBJ] != 0 && (parity[CLIP] != 0 || horiz[CLIP] != 0))
                || (exists[CLIP] != 0 && exists[SUBJ] != 0 && parity[CLIP] == parity[SUBJ]);
            let br = (parity[CLIP] != 0 && parity[SUBJ] != 0) as u8;
            let bl = ((parity[CLIP] ^ edge.bundle[ABOVE][CLIP]) != 0
                && (parity[SUBJ] ^ edge.bundle[ABOVE][SUBJ]) != 0) as u8;
            let tr = ((parity[CLIP] ^ hc) != 0 && (parity[SUBJ] ^ hs) != 0) as u8;
            let tl = ((parity[CLIP] ^ hc ^ edge.bundle[BELOW][CLIP]) != 0
                && (parity[SUBJ] ^ hs ^ edge.bundle[BELOW][SUBJ]) != 0) as u8;
            (contributing, tr, tl, br, bl)
        }
        ClipOp::Xor => {
            let contributing = exists[CLIP] != 0 || exists[SUBJ] != 0;
            let br = parity[CLIP] ^ parity[SUBJ];
            let bl = (parity[CLIP] ^ edge.bundle[ABOVE][CLIP])
                ^ (parity[SUBJ] ^ edge.bundle[ABOVE][SUBJ]);
            let tr = (parity[CLIP] ^ hc) ^ (parity[SUBJ] ^ hs);
            let tl = (parity[CLIP] ^ hc ^ edge.bundle[BELOW][CLIP])
                ^ (parity[SUBJ] ^ hs ^ edge.bundle[BELOW][SUBJ]);
            (contributing, tr, tl, br, bl)
        }
        ClipOp::Union => {
            let contributing = (exists[CLIP] != 0 && (parity[SUBJ] == 0 || horiz[SUBJ] != 0))
                || (exists[SUBJ] != 0 && (parity[CLIP] == 0 || horiz[CLIP] != 0))
                || (exists[CLIP] != 0 && exists[SUBJ] != 0 && parity[CLIP] == parity[SUBJ]);
            let br = (parity[CLIP] != 0 || parity[SUBJ] != 0) as u8;
            let bl = ((parity[CLIP] ^ edge.bundle[ABOVE][CLIP]) != 0
                || (parity[SUBJ] ^ edge.bundle[ABOVE][SUBJ]) != 0) as u8;
            let tr = ((parity[CLIP] ^ hc) != 0 || (parity[SUBJ] ^ hs) != 0) as u8;
            let tl = ((parity[CLIP] ^ hc ^ edge.bundle[BELOW][CLIP]) != 0
                || (parity[SUBJ] ^ hs ^ edge.bundle[BELOW][SUBJ]) != 0) as u8;
            (contributing, tr, tl, br, bl)
        }
    }
}

/// Quadrant occupancy bits at an intra-beam intersection point. `in_clip`
/// and `in_subj` play the role parity plays at beam boundaries.
fn classify_intersection(
    op: ClipOp,
    in_clip: u8,
    in_subj: u8,
    e0: &EdgeNode,
    e1: &EdgeNode,
) -> (u8, u8, u8, u8) {
    let e0c = e0.bundle[ABOVE][CLIP];
    let e0s = e0.bundle[ABOVE][SUBJ];
    let e1c = e1.bundle[ABOVE][CLIP];
    let e1s = e1.bundle[ABOVE][SUBJ];
    match op {
        ClipOp::Difference | ClipOp::Intersection => {
            let tr = (in_clip != 0 && in_subj != 0) as u8;
            let tl = ((in_clip ^ e1c) != 0 && (in_subj ^ e1s) != 0) as u8;
            let br = ((in_clip ^ e0c) != 0 && (in_subj ^ e0s) != 0) as u8;
            let bl = ((in_clip ^ e1c ^ e0c) != 0 && (in_subj ^ e1s ^ e0s) != 0) as u8;
            (tr, tl, br, bl)
        }
        ClipOp::Xor => {
            let tr = in_clip ^ in_subj;
            let tl = (in_clip ^ e1c) ^ (in_subj ^ e1s);
            let br = (in_clip ^ e0c) ^ (in_subj ^ e0s);
            let bl = (in_clip ^ e1c ^ e0c) ^ (in_subj ^ e1s ^ e0s);
            (tr, tl, br, bl)
        }
        ClipOp::Union => {
            let tr = (in_clip != 0 || in_subj != 0) as u8;
            let tl = ((in_clip ^ e1c) != 0 || (in_subj ^ e1s) != 0) as u8;
            let br = ((in_clip ^ e0c) != 0 || (in_subj ^ e0s) != 0) as u8;
            let bl = ((in_clip ^ e1c ^ e0c) != 0 || (in_subj ^ e1s ^ e0s) != 0) as u8;
            (tr, tl, br, bl)
        }
    }
}

// ──────────────────────────── Output builders ──────────────────────────────

/// The sweep's hook into output generation. One implementation grows
/// contour fronts, the other triangle strips; the beam machinery is shared.
trait FrontBuilder {
    type Output;
    /// Tristrips use a different rewind predicate when a bundle head is
    /// swapped across an intersection.
    const STRIP_SEARCH: bool;

    fn begin_boundary_pass(&mut self);
    fn boundary(&mut self, edges: &mut [EdgeNode], edge: EdgeId, vclass: VertexType, xb: Real, yb: Real);
    fn intersection(
        &mut self,
        edges: &mut [EdgeNode],
        e0: EdgeId,
        e1: EdgeId,
        vclass: VertexType,
        ix: Real,
        iy: Real,
    );
    fn finish(self) -> Self::Output;
}

/// Polygon-mode output: contour fronts grown left/right and merged.
struct ContourBuilder {
    fronts: ContourFronts,
    /// Cached front for intermediate events within the current boundary pass.
    cf: u32,
    /// x of the vertex last emitted, to suppress duplicates.
    px: Real,
}

impl Default for ContourBuilder {
    fn default() -> Self {
        ContourBuilder {
            fronts: ContourFronts::new(),
            cf: INVALID,
            px: -Real::MAX,
        }
    }
}

impl FrontBuilder for ContourBuilder {
    type Output = Polygon;
    const STRIP_SEARCH: bool = false;

    fn begin_boundary_pass(&mut self) {
        self.cf = INVALID;
        self.px = -Real::MAX;
    }

    fn boundary(&mut self, edges: &mut [EdgeNode], edge: EdgeId, vclass: VertexType, xb: Real, yb: Real) {
        let eu = edge as usize;
        match vclass {
            VertexType::Emn | VertexType::Imn => {
                let f = self.fronts.add_local_min(xb, yb);
                edges[eu].outp[ABOVE] = f;
                self.px = xb;
                self.cf = f;
            }
            VertexType::Eri => {
                if xb != self.px && self.cf != INVALID {
                    self.fronts.add_right(self.cf, xb, yb);
                    self.px = xb;
                }
                edges[eu].outp[ABOVE] = self.cf;
                self.cf = INVALID;
            }
            VertexType::Eli => {
                let below = edges[eu].outp[BELOW];
                if below != INVALID {
                    self.fronts.add_left(below, xb, yb);
                }
                self.px = xb;
                self.cf = below;
            }
            VertexType::Emx => {
                if xb != self.px && self.cf != INVALID {
                    self.fronts.add_left(self.cf, xb, yb);
                    self.px = xb;
                }
                let below = edges[eu].outp[BELOW];
                if self.cf != INVALID && below != INVALID {
                    self.fronts.merge_right(self.cf, below);
                }
                self.cf = INVALID;
            }
            VertexType::Ili => {
                if xb != self.px && self.cf != INVALID {
                    self.fronts.add_left(self.cf, xb, yb);
                    self.px = xb;
                }
                edges[eu].outp[ABOVE] = self.cf;
                self.cf = INVALID;
            }
            VertexType::Iri => {
                let below = edges[eu].outp[BELOW];
                if below != INVALID {
                    self.fronts.add_right(below, xb, yb);
                }
                self.px = xb;
                self.cf = below;
                edges[eu].outp[BELOW] = INVALID;
            }
            VertexType::Imx => {
                if xb != self.px && self.cf != INVALID {
                    self.fronts.add_right(self.cf, xb, yb);
                    self.px = xb;
                }
                let below = edges[eu].outp[BELOW];
                if self.cf != INVALID && below != INVALID {
                    self.fronts.merge_left(self.cf, below);
                }
                self.cf = INVALID;
                edges[eu].outp[BELOW] = INVALID;
            }
            VertexType::Imm => {
                if xb != self.px && self.cf != INVALID {
                    self.fronts.add_right(self.cf, xb, yb);
                    self.px = xb;
                }
                let below = edges[eu].outp[BELOW];
                if self.cf != INVALID && below != INVALID {
                    self.fronts.merge_left(self.cf, below);
                }
                edges[eu].outp[BELOW] = INVALID;
                let f = self.fronts.add_local_min(xb, yb);
                edges[eu].outp[ABOVE] = f;
                self.cf = f;
            }
            VertexType::Emm => {
                if xb != self.px && self.cf != INVALID {
                    self.fronts.add_left(self.cf, xb, yb);
                    self.px = xb;
                }
                let below = edges[eu].outp[BELOW];
                if self.cf != INVALID && below != INVALID {
                    self.fronts.merge_right(self.cf, below);
                }
                edges[eu].outp[BELOW] = INVALID;
                let f = self.fronts.add_local_min(xb, yb);
                edges[eu].outp[ABOVE] = f;
                self.cf = f;
            }
            VertexType::Led => {
                let below = edges[eu].outp[BELOW];
                if edges[eu].bot.y == yb && below != INVALID {
                    self.fronts.add_left(below, xb, yb);
                }
                edges[eu].outp[ABOVE] = below;
                self.px = xb;
            }
            VertexType::Red => {
                let below = edges[eu].outp[BELOW];
                if edges[eu].bot.y == yb && below != INVALID {
                    self.fronts.add_right(below, xb, yb);
                }
                edges[eu].outp[ABOVE] = below;
                self.px = xb;
            }
            _ => {}
        }
    }

    fn intersection(
        &mut self,
        edges: &mut [EdgeNode],
        e0: EdgeId,
        e1: EdgeId,
        vclass: VertexType,
        ix: Real,
        iy: Real,
    ) {
        let (e0u, e1u) = (e0 as usize, e1 as usize);
        let p = edges[e0u].outp[ABOVE];
        let q = edges[e1u].outp[ABOVE];
        match vclass {
            VertexType::Emn | VertexType::Imn => {
                let f = self.fronts.add_local_min(ix, iy);
                edges[e0u].outp[ABOVE] = f;
                edges[e1u].outp[ABOVE] = f;
            }
            VertexType::Eri => {
                if p != INVALID {
                    self.fronts.add_right(p, ix, iy);
                    edges[e1u].outp[ABOVE] = p;
                    edges[e0u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Eli => {
                if q != INVALID {
                    self.fronts.add_left(q, ix, iy);
                    edges[e0u].outp[ABOVE] = q;
                    edges[e1u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Emx => {
                if p != INVALID && q != INVALID {
                    self.fronts.add_left(p, ix, iy);
                    self.fronts.merge_right(p, q);
                    edges[e0u].outp[ABOVE] = INVALID;
                    edges[e1u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Ili => {
                if p != INVALID {
                    self.fronts.add_left(p, ix, iy);
                    edges[e1u].outp[ABOVE] = p;
                    edges[e0u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Iri => {
                if q != INVALID {
                    self.fronts.add_right(q, ix, iy);
                    edges[e0u].outp[ABOVE] = q;
                    edges[e1u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Imx => {
                if p != INVALID && q != INVALID {
                    self.fronts.add_right(p, ix, iy);
                    self.fronts.merge_left(p, q);
                    edges[e0u].outp[ABOVE] = INVALID;
                    edges[e1u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Imm => {
                if p != INVALID && q != INVALID {
                    self.fronts.add_right(p, ix, iy);
                    self.fronts.merge_left(p, q);
                    let f = self.fronts.add_local_min(ix, iy);
                    edges[e0u].outp[ABOVE] = f;
                    edges[e1u].outp[ABOVE] = f;
                }
            }
            VertexType::Emm => {
                if p != INVALID && q != INVALID {
                    self.fronts.add_left(p, ix, iy);
                    self.fronts.merge_right(p, q);
                    let f = self.fronts.add_local_min(ix, iy);
                    edges[e0u].outp[ABOVE] = f;
                    edges[e1u].outp[ABOVE] = f;
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Polygon {
        self.fronts.harvest()
    }
}

/// Tristrip-mode output. `cf` and `cft` deliberately persist across beams.
struct StripBuilder {
    fronts: StripFronts,
    /// Cached edge whose front collects the strip being grown.
    cf: EdgeId,
    cft: VertexType,
}

impl Default for StripBuilder {
    fn default() -> Self {
        StripBuilder {
            fronts: StripFronts::new(),
            cf: INVALID,
            cft: VertexType::Led,
        }
    }
}

impl StripBuilder {
    /// Append a vertex to side `s` of the front edge `e` points at through
    /// half-plane `p` (the VERTEX macro of the reference).
    fn vertex(&mut self, edges: &[EdgeNode], e: EdgeId, p: usize, s: u8, x: Real, y: Real) {
        let f = edges[e as usize].outp[p];
        if f != INVALID {
            self.fronts.vertex(f, s, x, y);
        }
    }
}

/// Nearest AET predecessor of `e` carrying a front in half-plane `p`, and
/// its x at height `j` (the P_EDGE macro).
fn p_edge(edges: &[EdgeNode], e: EdgeId, p: usize, j: Real) -> Option<(EdgeId, Real)> {
    let mut d = edges[e as usize].prev;
    while d != INVALID && edges[d as usize].outp[p] == INVALID {
        d = edges[d as usize].prev;
    }
    if d == INVALID {
        return None;
    }
    let du = d as usize;
    Some((d, edges[du].bot.x + edges[du].dx * (j - edges[du].bot.y)))
}

/// Nearest AET successor of `e` carrying a front in half-plane `p`, and its
/// x at height `j` (the N_EDGE macro).
fn n_edge(edges: &[EdgeNode], e: EdgeId, p: usize, j: Real) -> Option<(EdgeId, Real)> {
    let mut d = edges[e as usize].next;
    while d != INVALID && edges[d as usize].outp[p] == INVALID {
        d = edges[d as usize].next;
    }
    if d == INVALID {
        return None;
    }
    let du = d as usize;
    Some((d, edges[du].bot.x + edges[du].dx * (j - edges[du].bot.y)))
}

impl FrontBuilder for StripBuilder {
    type Output = Mesh;
    const STRIP_SEARCH: bool = true;

    fn begin_boundary_pass(&mut self) {}

    fn boundary(&mut self, edges: &mut [EdgeNode], edge: EdgeId, vclass: VertexType, xb: Real, yb: Real) {
        let eu = edge as usize;
        match vclass {
            VertexType::Emn => {
                let f = self.fronts.new_strip(xb, yb);
                edges[eu].outp[ABOVE] = f;
                self.cf = edge;
            }
            VertexType::Eri => {
                if self.cf != INVALID {
                    edges[eu].outp[ABOVE] = edges[self.cf as usize].outp[ABOVE];
                    if xb != edges[self.cf as usize].xb {
                        self.vertex(edges, edge, ABOVE, RIGHT, xb, yb);
                    }
                }
                self.cf = INVALID;
            }
            VertexType::Eli => {
                self.vertex(edges, edge, BELOW, LEFT, xb, yb);
                edges[eu].outp[ABOVE] = INVALID;
                self.cf = edge;
            }
            VertexType::Emx => {
                if self.cf != INVALID && xb != edges[self.cf as usize].xb {
                    self.vertex(edges, edge, BELOW, RIGHT, xb, yb);
                }
                edges[eu].outp[ABOVE] = INVALID;
                self.cf = INVALID;
            }
            VertexType::Imn => {
                if self.cft == VertexType::Led && self.cf != INVALID {
                    let cfu = self.cf as usize;
                    if edges[cfu].bot.y != yb {
                        let cf_xb = edges[cfu].xb;
                        self.vertex(edges, self.cf, BELOW, LEFT, cf_xb, yb);
                    }
                    let f = self.fronts.new_strip(edges[cfu].xb, yb);
                    edges[cfu].outp[ABOVE] = f;
                }
                if self.cf != INVALID {
                    edges[eu].outp[ABOVE] = edges[self.cf as usize].outp[ABOVE];
                }
                self.vertex(edges, edge, ABOVE, RIGHT, xb, yb);
            }
            VertexType::Ili => {
                let f = self.fronts.new_strip(xb, yb);
                edges[eu].outp[ABOVE] = f;
                self.cf = edge;
                self.cft = VertexType::Ili;
            }
            VertexType::Iri => {
                if self.cft == VertexType::Led && self.cf != INVALID {
                    let cfu = self.cf as usize;
                    if edges[cfu].bot.y != yb {
                        let cf_xb = edges[cfu].xb;
                        self.vertex(edges, self.cf, BELOW, LEFT, cf_xb, yb);
                    }
                    let f = self.fronts.new_strip(edges[cfu].xb, yb);
                    edges[cfu].outp[ABOVE] = f;
                }
                self.vertex(edges, edge, BELOW, RIGHT, xb, yb);
                edges[eu].outp[ABOVE] = INVALID;
            }
            VertexType::Imx => {
                self.vertex(edges, edge, BELOW, LEFT, xb, yb);
                edges[eu].outp[ABOVE] = INVALID;
                self.cft = VertexType::Imx;
            }
            VertexType::Imm => {
                self.vertex(edges, edge, BELOW, LEFT, xb, yb);
                if self.cf != INVALID {
                    edges[eu].outp[ABOVE] = edges[self.cf as usize].outp[ABOVE];
                    if xb != edges[self.cf as usize].xb {
                        self.vertex(edges, self.cf, ABOVE, RIGHT, xb, yb);
                    }
                }
                self.cf = edge;
            }
            VertexType::Emm => {
                self.vertex(edges, edge, BELOW, RIGHT, xb, yb);
                let f = self.fronts.new_strip(xb, yb);
                edges[eu].outp[ABOVE] = f;
                self.cf = edge;
            }
            VertexType::Led => {
                if edges[eu].bot.y == yb {
                    self.vertex(edges, edge, BELOW, LEFT, xb, yb);
                }
                edges[eu].outp[ABOVE] = edges[eu].outp[BELOW];
                self.cf = edge;
                self.cft = VertexType::Led;
            }
            VertexType::Red => {
                if self.cf != INVALID {
                    edges[eu].outp[ABOVE] = edges[self.cf as usize].outp[ABOVE];
                    if self.cft == VertexType::Led {
                        if edges[self.cf as usize].bot.y == yb {
                            self.vertex(edges, edge, BELOW, RIGHT, xb, yb);
                        } else if edges[eu].bot.y == yb {
                            let cf_xb = edges[self.cf as usize].xb;
                            self.vertex(edges, self.cf, BELOW, LEFT, cf_xb, yb);
                            self.vertex(edges, edge, BELOW, RIGHT, xb, yb);
                        }
                    } else {
                        self.vertex(edges, edge, BELOW, RIGHT, xb, yb);
                        self.vertex(edges, edge, ABOVE, RIGHT, xb, yb);
                    }
                }
                self.cf = INVALID;
            }
            _ => {}
        }
    }

    fn intersection(
        &mut self,
        edges: &mut [EdgeNode],
        e0: EdgeId,
        e1: EdgeId,
        vclass: VertexType,
        ix: Real,
        iy: Real,
    ) {
        let (e0u, e1u) = (e0 as usize, e1 as usize);
        let p = edges[e0u].outp[ABOVE];
        let q = edges[e1u].outp[ABOVE];
        match vclass {
            VertexType::Emn => {
                let f = self.fronts.new_strip(ix, iy);
                edges[e1u].outp[ABOVE] = f;
                edges[e0u].outp[ABOVE] = f;
            }
            VertexType::Eri => {
                if p != INVALID {
                    if let Some((pe, px)) = p_edge(edges, e0, ABOVE, iy) {
                        self.vertex(edges, pe, ABOVE, LEFT, px, iy);
                        self.vertex(edges, e0, ABOVE, RIGHT, ix, iy);
                        edges[e1u].outp[ABOVE] = edges[e0u].outp[ABOVE];
                        edges[e0u].outp[ABOVE] = INVALID;
                    }
                }
            }
            VertexType::Eli => {
                if q != INVALID {
                    if let Some((ne, nx)) = n_edge(edges, e1, ABOVE, iy) {
                        self.vertex(edges, e1, ABOVE, LEFT, ix, iy);
                        self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                        edges[e0u].outp[ABOVE] = edges[e1u].outp[ABOVE];
                        edges[e1u].outp[ABOVE] = INVALID;
                    }
                }
            }
            VertexType::Emx => {
                if p != INVALID && q != INVALID {
                    self.vertex(edges, e0, ABOVE, LEFT, ix, iy);
                    edges[e0u].outp[ABOVE] = INVALID;
                    edges[e1u].outp[ABOVE] = INVALID;
                }
            }
            VertexType::Imn => {
                if let (Some((pe, px)), Some((ne, nx))) = (
                    p_edge(edges, e0, ABOVE, iy),
                    n_edge(edges, e1, ABOVE, iy),
                ) {
                    self.vertex(edges, pe, ABOVE, LEFT, px, iy);
                    self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                    let f = self.fronts.new_strip(px, iy);
                    edges[pe as usize].outp[ABOVE] = f;
                    edges[e1u].outp[ABOVE] = f;
                    self.vertex(edges, e1, ABOVE, RIGHT, ix, iy);
                    let g = self.fronts.new_strip(ix, iy);
                    edges[e0u].outp[ABOVE] = g;
                    edges[ne as usize].outp[ABOVE] = g;
                    self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                }
            }
            VertexType::Ili => {
                if p != INVALID {
                    if let Some((ne, nx)) = n_edge(edges, e1, ABOVE, iy) {
                        self.vertex(edges, e0, ABOVE, LEFT, ix, iy);
                        self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                        edges[e1u].outp[ABOVE] = edges[e0u].outp[ABOVE];
                        edges[e0u].outp[ABOVE] = INVALID;
                    }
                }
            }
            VertexType::Iri => {
                if q != INVALID {
                    if let Some((pe, px)) = p_edge(edges, e0, ABOVE, iy) {
                        self.vertex(edges, e1, ABOVE, RIGHT, ix, iy);
                        self.vertex(edges, pe, ABOVE, LEFT, px, iy);
                        edges[e0u].outp[ABOVE] = edges[e1u].outp[ABOVE];
                        edges[e1u].outp[ABOVE] = INVALID;
                    }
                }
            }
            VertexType::Imx => {
                if p != INVALID && q != INVALID {
                    self.vertex(edges, e0, ABOVE, RIGHT, ix, iy);
                    self.vertex(edges, e1, ABOVE, LEFT, ix, iy);
                    edges[e0u].outp[ABOVE] = INVALID;
                    edges[e1u].outp[ABOVE] = INVALID;
                    if let (Some((pe, px)), Some((ne, nx))) = (
                        p_edge(edges, e0, ABOVE, iy),
                        n_edge(edges, e1, ABOVE, iy),
                    ) {
                        self.vertex(edges, pe, ABOVE, LEFT, px, iy);
                        let f = self.fronts.new_strip(px, iy);
                        edges[pe as usize].outp[ABOVE] = f;
                        self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                        edges[ne as usize].outp[ABOVE] = f;
                        self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                    }
                }
            }
            VertexType::Imm => {
                if p != INVALID && q != INVALID {
                    self.vertex(edges, e0, ABOVE, RIGHT, ix, iy);
                    self.vertex(edges, e1, ABOVE, LEFT, ix, iy);
                    if let (Some((pe, px)), Some((ne, nx))) = (
                        p_edge(edges, e0, ABOVE, iy),
                        n_edge(edges, e1, ABOVE, iy),
                    ) {
                        self.vertex(edges, pe, ABOVE, LEFT, px, iy);
                        let f = self.fronts.new_strip(px, iy);
                        edges[pe as usize].outp[ABOVE] = f;
                        self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                        edges[e1u].outp[ABOVE] = f;
                        self.vertex(edges, e1, ABOVE, RIGHT, ix, iy);
                        let g = self.fronts.new_strip(ix, iy);
                        edges[e0u].outp[ABOVE] = g;
                        edges[ne as usize].outp[ABOVE] = g;
                        self.vertex(edges, ne, ABOVE, RIGHT, nx, iy);
                    }
                }
            }
            VertexType::Emm => {
                if p != INVALID && q != INVALID {
                    self.vertex(edges, e0, ABOVE, LEFT, ix, iy);
                    let f = self.fronts.new_strip(ix, iy);
                    edges[e1u].outp[ABOVE] = f;
                    edges[e0u].outp[ABOVE] = f;
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Mesh {
        self.fronts.harvest()
    }
}

// ───────────────────────── Intersection discovery ──────────────────────────

/// Sorted-edge-table entry; the table orders live AET edges by their x at
/// the top of the beam, discovering crossings as it goes.
struct StEntry {
    edge: EdgeId,
    xb: Real,
    xt: Real,
    dx: Real,
}

/// One intra-beam intersection event. `point.y` is relative to the beam
/// bottom.
struct ItNode {
    edge0: EdgeId,
    edge1: EdgeId,
    point: Point,
}

/// Insert `edge` into the ST (held as a Vec with the head at the back),
/// recording an IT node for every existing entry the edge crosses.
fn add_st_edge(
    st: &mut Vec<StEntry>,
    it: &mut Vec<ItNode>,
    edges: &[EdgeNode],
    edge: EdgeId,
    dy: Real,
) {
    let e = &edges[edge as usize];
    let mut pos = st.len();
    while pos > 0 {
        let s = &st[pos - 1];
        let den = (s.xt - s.xb) - (e.xt - e.xb);
        if e.xt >= s.xt || e.dx == s.dx || (den as f64).abs() <= GPC_EPSILON {
            // No crossing: the edge slots in here.
            break;
        }
        let r = (e.xb - s.xb) / den;
        let x = s.xb + r * (s.xt - s.xb);
        let y = r * dy;
        add_intersection(it, s.edge, edge, x, y);
        pos -= 1;
    }
    st.insert(
        pos,
        StEntry {
            edge,
            xb: e.xb,
            xt: e.xt,
            dx: e.dx,
        },
    );
}

/// Keep the IT y-ordered; ties stay in discovery order.
fn add_intersection(it: &mut Vec<ItNode>, edge0: EdgeId, edge1: EdgeId, x: Real, y: Real) {
    let pos = it
        .iter()
        .position(|n| n.point.y > y)
        .unwrap_or(it.len());
    it.insert(
        pos,
        ItNode {
            edge0,
            edge1,
            point: Point::new(x, y),
        },
    );
}

// ─────────────────────────────── The sweep ─────────────────────────────────

fn sweep<B: FrontBuilder>(op: ClipOp, subj: &Polygon, clip_poly: &Polygon, mut builder: B) -> B::Output {
    // Identify potentially contributing contours.
    let mut s_contrib: Vec<bool> = subj.contours.iter().map(|c| c.is_contributing).collect();
    let mut c_contrib: Vec<bool> = clip_poly.contours.iter().map(|c| c.is_contributing).collect();
    if (op == ClipOp::Intersection || op == ClipOp::Difference)
        && !subj.is_empty()
        && !clip_poly.is_empty()
    {
        minimax_test(subj, clip_poly, op, &mut s_contrib, &mut c_contrib);
    }

    // Build the LMT and scan beam table.
    let mut edge_table = EdgeTable::new();
    let mut lmt = LmtTable::new();
    let mut sbt_acc = ScanBeamTable::new();
    if !subj.is_empty() {
        build_lmt(&mut edge_table, &mut lmt, &mut sbt_acc, subj, &s_contrib, SUBJ, op);
    }
    if !clip_poly.is_empty() {
        build_lmt(&mut edge_table, &mut lmt, &mut sbt_acc, clip_poly, &c_contrib, CLIP, op);
    }
    if lmt.is_empty() {
        return builder.finish();
    }

    let sbt = sbt_acc.build();
    trace!("sweep: {} edges, {} scanbeams", edge_table.nodes.len(), sbt.len());
    let edges = &mut edge_table.nodes;

    let mut parity: [u8; 2] = [LEFT, LEFT];
    if op == ClipOp::Difference {
        parity[CLIP] = RIGHT;
    }

    let mut aet = Aet::new();
    let mut local_min = 0usize;
    let mut scanbeam = 0usize;

    while scanbeam < sbt.len() {
        let yb = sbt[scanbeam];
        scanbeam += 1;
        let mut yt = 0.0f32;
        let mut dy = 0.0f32;
        if scanbeam < sbt.len() {
            yt = sbt[scanbeam];
            dy = yt - yb;
        }

        // === Scanbeam boundary processing ===================================

        // Add edges starting at this local minimum to the AET.
        if local_min < lmt.nodes.len() && lmt.nodes[local_min].y == yb {
            let mut e = lmt.nodes[local_min].first_bound;
            while e != INVALID {
                let next_bound = edges[e as usize].next_bound;
                aet.insert(edges, e);
                e = next_bound;
            }
            local_min += 1;
        }
        if aet.is_empty() {
            continue;
        }
        builder.begin_boundary_pass();

        // Create bundles within the AET.
        {
            let top = aet.top as usize;
            let kind = edges[top].kind;
            edges[top].bundle[ABOVE][kind] = (edges[top].top.y != yb) as u8;
            edges[top].bundle[ABOVE][1 - kind] = 0;
            edges[top].bstate[ABOVE] = BundleState::Unbundled;
        }
        let mut e0 = aet.top;
        let mut next_edge = edges[aet.top as usize].next;
        while next_edge != INVALID {
            let ne = next_edge as usize;
            let ne_kind = edges[ne].kind;
            let ne_opp = 1 - ne_kind;
            edges[ne].bundle[ABOVE][ne_kind] = (edges[ne].top.y != yb) as u8;
            edges[ne].bundle[ABOVE][ne_opp] = 0;
            edges[ne].bstate[ABOVE] = BundleState::Unbundled;

            // Bundle edges above the boundary if they coincide.
            if edges[ne].bundle[ABOVE][ne_kind] == 1 {
                let e0u = e0 as usize;
                if eq(edges[e0u].xb, edges[ne].xb)
                    && eq(edges[e0u].dx, edges[ne].dx)
                    && edges[e0u].top.y != yb
                {
                    let head_same = edges[e0u].bundle[ABOVE][ne_kind];
                    let head_opp = edges[e0u].bundle[ABOVE][ne_opp];
                    edges[ne].bundle[ABOVE][ne_kind] ^= head_same;
                    edges[ne].bundle[ABOVE][ne_opp] = head_opp;
                    edges[ne].bstate[ABOVE] = BundleState::BundleHead;
                    edges[e0u].bundle[ABOVE][CLIP] = 0;
                    edges[e0u].bundle[ABOVE][SUBJ] = 0;
                    edges[e0u].bstate[ABOVE] = BundleState::BundleTail;
                }
                e0 = next_edge;
            }
            next_edge = edges[ne].next;
        }

        // Process each edge at this scanbeam boundary.
        let mut horiz: [u8; 2] = [hstate::NH, hstate::NH];
        let mut exists: [u8; 2] = [0, 0];
        let mut edge = aet.top;
        while edge != INVALID {
            let eu = edge as usize;
            exists[CLIP] =
                edges[eu].bundle[ABOVE][CLIP] + (edges[eu].bundle[BELOW][CLIP] << 1);
            exists[SUBJ] =
                edges[eu].bundle[ABOVE][SUBJ] + (edges[eu].bundle[BELOW][SUBJ] << 1);
            if exists[CLIP] != 0 || exists[SUBJ] != 0 {
                edges[eu].bside[CLIP] = parity[CLIP];
                edges[eu].bside[SUBJ] = parity[SUBJ];

                let (contributing, tr, tl, br, bl) =
                    classify_boundary(op, &exists, &parity, &horiz, &edges[eu]);

                parity[CLIP] ^= edges[eu].bundle[ABOVE][CLIP];
                parity[SUBJ] ^= edges[eu].bundle[ABOVE][SUBJ];

                if exists[CLIP] != 0 {
                    horiz[CLIP] = hstate::NEXT[horiz[CLIP] as usize]
                        [(((exists[CLIP] - 1) << 1) + parity[CLIP]) as usize];
                }
                if exists[SUBJ] != 0 {
                    horiz[SUBJ] = hstate::NEXT[horiz[SUBJ] as usize]
                        [(((exists[SUBJ] - 1) << 1) + parity[SUBJ]) as usize];
                }

                if contributing {
                    let vclass = VertexType::from_bits(tr, tl, br, bl);
                    let xb = edges[eu].xb;
                    builder.boundary(edges, edge, vclass, xb, yb);
                }
            }
            edge = edges[eu].next;
        }

        // Delete terminating edges from the AET, otherwise compute xt.
        let mut edge = aet.top;
        while edge != INVALID {
            let eu = edge as usize;
            let next = edges[eu].next;
            if edges[eu].top.y == yb {
                let prev = edges[eu].prev;
                aet.remove(edges, edge);

                // Copy bundle head state to the adjacent tail edge.
                if edges[eu].bstate[BELOW] == BundleState::BundleHead && prev != INVALID {
                    let pu = prev as usize;
                    if edges[pu].bstate[BELOW] == BundleState::BundleTail {
                        edges[pu].outp[BELOW] = edges[eu].outp[BELOW];
                        edges[pu].bstate[BELOW] = BundleState::Unbundled;
                        let pp = edges[pu].prev;
                        if pp != INVALID
                            && edges[pp as usize].bstate[BELOW] == BundleState::BundleTail
                        {
                            edges[pu].bstate[BELOW] = BundleState::BundleHead;
                        }
                    }
                }
            } else if edges[eu].top.y == yt {
                edges[eu].xt = edges[eu].top.x;
            } else {
                edges[eu].xt = edges[eu].bot.x + edges[eu].dx * (yt - edges[eu].bot.y);
            }
            edge = next;
        }

        if scanbeam < sbt.len() {
            // === Scanbeam interior processing ===============================

            // Build the intersection table for this beam.
            let mut st: Vec<StEntry> = Vec::new();
            let mut it: Vec<ItNode> = Vec::new();
            let mut edge = aet.top;
            while edge != INVALID {
                let eu = edge as usize;
                if edges[eu].bstate[ABOVE] == BundleState::BundleHead
                    || edges[eu].bundle[ABOVE][CLIP] != 0
                    || edges[eu].bundle[ABOVE][SUBJ] != 0
                {
                    add_st_edge(&mut st, &mut it, edges, edge, dy);
                }
                edge = edges[eu].next;
            }

            // Process each intersection, in y order.
            for node in &it {
                let (e0, e1) = (node.edge0, node.edge1);
                let (e0u, e1u) = (e0 as usize, e1 as usize);

                // Only generate output for contributing intersections.
                if (edges[e0u].bundle[ABOVE][CLIP] != 0 || edges[e0u].bundle[ABOVE][SUBJ] != 0)
                    && (edges[e1u].bundle[ABOVE][CLIP] != 0
                        || edges[e1u].bundle[ABOVE][SUBJ] != 0)
                {
                    let ix = node.point.x;
                    let iy = node.point.y + yb;

                    let in_clip = ((edges[e0u].bundle[ABOVE][CLIP] != 0
                        && edges[e0u].bside[CLIP] == 0)
                        || (edges[e1u].bundle[ABOVE][CLIP] != 0 && edges[e1u].bside[CLIP] != 0)
                        || (edges[e0u].bundle[ABOVE][CLIP] == 0
                            && edges[e1u].bundle[ABOVE][CLIP] == 0
                            && edges[e0u].bside[CLIP] != 0
                            && edges[e1u].bside[CLIP] != 0))
                        as u8;
                    let in_subj = ((edges[e0u].bundle[ABOVE][SUBJ] != 0
                        && edges[e0u].bside[SUBJ] == 0)
                        || (edges[e1u].bundle[ABOVE][SUBJ] != 0 && edges[e1u].bside[SUBJ] != 0)
                        || (edges[e0u].bundle[ABOVE][SUBJ] == 0
                            && edges[e1u].bundle[ABOVE][SUBJ] == 0
                            && edges[e0u].bside[SUBJ] != 0
                            && edges[e1u].bside[SUBJ] != 0))
                        as u8;

                    let (tr, tl, br, bl) =
                        classify_intersection(op, in_clip, in_subj, &edges[e0u], &edges[e1u]);
                    let vclass = VertexType::from_bits(tr, tl, br, bl);
                    builder.intersection(edges, e0, e1, vclass, ix, iy);
                }

                // Swap bundle sides in response to the crossing.
                if edges[e0u].bundle[ABOVE][CLIP] != 0 {
                    edges[e1u].bside[CLIP] ^= 1;
                }
                if edges[e1u].bundle[ABOVE][CLIP] != 0 {
                    edges[e0u].bside[CLIP] ^= 1;
                }
                if edges[e0u].bundle[ABOVE][SUBJ] != 0 {
                    edges[e1u].bside[SUBJ] ^= 1;
                }
                if edges[e1u].bundle[ABOVE][SUBJ] != 0 {
                    edges[e0u].bside[SUBJ] ^= 1;
                }

                // Swap the e0 and e1 bundles in the AET.
                aet.swap_intersecting(edges, e0, e1, B::STRIP_SEARCH);
            }

            // Prepare for the next scanbeam.
            let mut edge = aet.top;
            while edge != INVALID {
                let eu = edge as usize;
                let next = edges[eu].next;
                let succ = edges[eu].succ;
                if edges[eu].top.y == yt && succ != INVALID {
                    // Replace the AET edge by its bound successor.
                    let su = succ as usize;
                    edges[su].outp[BELOW] = edges[eu].outp[ABOVE];
                    edges[su].bstate[BELOW] = edges[eu].bstate[ABOVE];
                    edges[su].bundle[BELOW][CLIP] = edges[eu].bundle[ABOVE][CLIP];
                    edges[su].bundle[BELOW][SUBJ] = edges[eu].bundle[ABOVE][SUBJ];
                    aet.replace(edges, edge, succ);
                } else {
                    edges[eu].outp[BELOW] = edges[eu].outp[ABOVE];
                    edges[eu].bstate[BELOW] = edges[eu].bstate[ABOVE];
                    edges[eu].bundle[BELOW][CLIP] = edges[eu].bundle[ABOVE][CLIP];
                    edges[eu].bundle[BELOW][SUBJ] = edges[eu].bundle[ABOVE][SUBJ];
                    edges[eu].xb = edges[eu].xt;
                }
                edges[eu].outp[ABOVE] = INVALID;
                edge = next;
            }
        }
    }

    builder.finish()
}
