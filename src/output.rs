// Copyright 2025 Lars Brubaker
// License: MIT
//
// Output front builders (gpc.c polygon_node / add_left / add_right /
// merge_left / merge_right / new_tristrip / add_vertex).
//
// A front is an in-progress output contour or triangle strip. Contour
// fronts hold one vertex chain grown at both ends; merging two fronts
// concatenates their chains and retires one of them. The reference keeps a
// proxy pointer per front and eagerly rewrites every alias on merge; here
// the proxy is a union-find parent handle resolved lazily with path
// compression, which gives the same canonical-front semantics without the
// global rewrite pass.

use std::collections::VecDeque;

use crate::geom::{Point, Real};
use crate::polygon::{Contour, Mesh, Polygon, TriStrip};

/// Index into a front arena.
pub type FrontId = u32;

struct PolyFront {
    /// The vertex chain; add_left prepends, add_right appends.
    pts: VecDeque<Point>,
    hole: bool,
    /// False once this front was absorbed into another by a merge.
    active: bool,
    /// Union-find parent; own id when canonical.
    proxy: FrontId,
}

/// Polygon-mode front arena.
#[derive(Default)]
pub struct ContourFronts {
    nodes: Vec<PolyFront>,
}

impl ContourFronts {
    pub fn new() -> Self {
        ContourFronts { nodes: Vec::new() }
    }

    /// Start a new contour seeded with a single vertex.
    pub fn add_local_min(&mut self, x: Real, y: Real) -> FrontId {
        let id = self.nodes.len() as FrontId;
        let mut pts = VecDeque::new();
        pts.push_back(Point::new(x, y));
        self.nodes.push(PolyFront {
            pts,
            hole: false,
            active: true,
            proxy: id,
        });
        id
    }

    /// Canonical front for `f`, compressing the proxy chain on the way.
    pub fn resolve(&mut self, f: FrontId) -> FrontId {
        let mut root = f;
        while self.nodes[root as usize].proxy != root {
            root = self.nodes[root as usize].proxy;
        }
        let mut cur = f;
        while cur != root {
            let next = self.nodes[cur as usize].proxy;
            self.nodes[cur as usize].proxy = root;
            cur = next;
        }
        root
    }

    pub fn add_left(&mut self, f: FrontId, x: Real, y: Real) {
        let r = self.resolve(f);
        self.nodes[r as usize].pts.push_front(Point::new(x, y));
    }

    pub fn add_right(&mut self, f: FrontId, x: Real, y: Real) {
        let r = self.resolve(f);
        self.nodes[r as usize].pts.push_back(Point::new(x, y));
    }

    /// Merge p into q around a left (hole-forming) event: the surviving
    /// chain is p's vertices followed by q's.
    pub fn merge_left(&mut self, p: FrontId, q: FrontId) {
        let pr = self.resolve(p);
        let qr = self.resolve(q);
        self.nodes[qr as usize].hole = true;
        if pr != qr {
            let mut ppts = std::mem::take(&mut self.nodes[pr as usize].pts);
            ppts.append(&mut self.nodes[qr as usize].pts);
            self.nodes[qr as usize].pts = ppts;
            self.nodes[pr as usize].active = false;
            self.nodes[pr as usize].proxy = qr;
        }
    }

    /// Merge p into q around a right (external) event: q's chain followed
    /// by p's.
    pub fn merge_right(&mut self, p: FrontId, q: FrontId) {
        let pr = self.resolve(p);
        let qr = self.resolve(q);
        self.nodes[qr as usize].hole = false;
        if pr != qr {
            let mut ppts = std::mem::take(&mut self.nodes[pr as usize].pts);
            self.nodes[qr as usize].pts.append(&mut ppts);
            self.nodes[pr as usize].active = false;
            self.nodes[pr as usize].proxy = qr;
        }
    }

    /// Collect surviving fronts into a polygon, shells first, holes after.
    /// Fronts with two or fewer vertices are degenerate and dropped.
    pub fn harvest(self) -> Polygon {
        let mut shells: Vec<Contour> = Vec::new();
        let mut holes: Vec<Contour> = Vec::new();
        for node in self.nodes {
            if !node.active || node.pts.len() <= 2 {
                continue;
            }
            let contour = Contour {
                points: node.pts.into_iter().collect(),
                is_hole: node.hole,
                is_contributing: true,
            };
            if contour.is_hole {
                holes.push(contour);
            } else {
                shells.push(contour);
            }
        }
        shells.extend(holes);
        Polygon { contours: shells }
    }
}

struct StripFront {
    /// Left and right vertex runs, interleaved at harvest time.
    v: [Vec<Point>; 2],
}

/// Tristrip-mode front arena. Strips never merge, so there is no proxy.
#[derive(Default)]
pub struct StripFronts {
    nodes: Vec<StripFront>,
}

impl StripFronts {
    pub fn new() -> Self {
        StripFronts { nodes: Vec::new() }
    }

    /// Start a new strip seeded with a single left-side vertex.
    pub fn new_strip(&mut self, x: Real, y: Real) -> FrontId {
        let id = self.nodes.len() as FrontId;
        self.nodes.push(StripFront {
            v: [vec![Point::new(x, y)], Vec::new()],
        });
        id
    }

    #[inline]
    pub fn vertex(&mut self, f: FrontId, side: u8, x: Real, y: Real) {
        self.nodes[f as usize].v[side as usize].push(Point::new(x, y));
    }

    /// Collect strips with more than two vertices, alternating left/right.
    pub fn harvest(self) -> Mesh {
        let mut mesh = Mesh::new();
        for node in self.nodes {
            let total = node.v[0].len() + node.v[1].len();
            if total <= 2 {
                continue;
            }
            let mut strip = TriStrip {
                points: Vec::with_capacity(total),
            };
            let (lt, rt) = (&node.v[0], &node.v[1]);
            let (mut li, mut ri) = (0usize, 0usize);
            while li < lt.len() || ri < rt.len() {
                if li < lt.len() {
                    strip.points.push(lt[li]);
                    li += 1;
                }
                if ri < rt.len() {
                    strip.points.push(rt[ri]);
                    ri += 1;
                }
            }
            mesh.add_strip(strip);
        }
        mesh
    }
}
