// Copyright 2025 Lars Brubaker
// License: MIT
//
// The active edge table: all edges crossing the current scanbeam, kept
// sorted by bottom-x with slope as tie-break. Links live on the edges
// themselves (EdgeNode::prev/next); this struct only owns the head handle,
// in the manner of a sorted doubly-linked dictionary.

use crate::lmt::{BundleState, EdgeId, EdgeNode, ABOVE, CLIP, INVALID, SUBJ};

#[derive(Default)]
pub struct Aet {
    pub top: EdgeId,
}

impl Aet {
    pub fn new() -> Self {
        Aet { top: INVALID }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top == INVALID
    }

    /// Insert `edge` preserving (xb, dx) order. Equal keys keep insertion
    /// order, which is what makes bundling deterministic.
    pub fn insert(&mut self, edges: &mut [EdgeNode], edge: EdgeId) {
        if self.top == INVALID {
            self.top = edge;
            edges[edge as usize].prev = INVALID;
            edges[edge as usize].next = INVALID;
            return;
        }

        let mut prev: EdgeId = INVALID;
        let mut current = self.top;
        loop {
            let cur = &edges[current as usize];
            let before = edges[edge as usize].xb < cur.xb
                || (edges[edge as usize].xb == cur.xb && edges[edge as usize].dx < cur.dx);
            if before {
                edges[edge as usize].prev = prev;
                edges[edge as usize].next = current;
                edges[current as usize].prev = edge;
                if prev == INVALID {
                    self.top = edge;
                } else {
                    edges[prev as usize].next = edge;
                }
                return;
            }
            if edges[current as usize].next == INVALID {
                edges[current as usize].next = edge;
                edges[edge as usize].prev = current;
                edges[edge as usize].next = INVALID;
                return;
            }
            prev = current;
            current = edges[current as usize].next;
        }
    }

    /// Splice `edge` out of the list. Bundle bookkeeping for terminating
    /// edges is the sweep's job; this only repairs links.
    pub fn remove(&mut self, edges: &mut [EdgeNode], edge: EdgeId) {
        let prev = edges[edge as usize].prev;
        let next = edges[edge as usize].next;
        if prev != INVALID {
            edges[prev as usize].next = next;
        } else {
            self.top = next;
        }
        if next != INVALID {
            edges[next as usize].prev = prev;
        }
    }

    /// Replace `edge` in place by `succ` (its topological successor in the
    /// same bound), leaving `succ` with `edge`'s neighbours.
    pub fn replace(&mut self, edges: &mut [EdgeNode], edge: EdgeId, succ: EdgeId) {
        let prev = edges[edge as usize].prev;
        let next = edges[edge as usize].next;
        if prev != INVALID {
            edges[prev as usize].next = succ;
        } else {
            self.top = succ;
        }
        if next != INVALID {
            edges[next as usize].prev = succ;
        }
        edges[succ as usize].prev = prev;
        edges[succ as usize].next = next;
    }

    /// Swap the bundles headed by `e0` and `e1` after they cross inside a
    /// scanbeam. `strip_search` selects the tristrip variant of the
    /// bundle-head rewind predicate.
    pub fn swap_intersecting(
        &mut self,
        edges: &mut [EdgeNode],
        e0: EdgeId,
        e1: EdgeId,
        strip_search: bool,
    ) {
        let mut prev = edges[e0 as usize].prev;
        let next = edges[e1 as usize].next;
        if next != INVALID {
            edges[next as usize].prev = e0;
        }

        // A bundle head moves together with its preceding tail edges; rewind
        // to the edge just before the bundle.
        if edges[e0 as usize].bstate[ABOVE] == BundleState::BundleHead {
            let mut search = true;
            while search {
                if prev == INVALID {
                    search = false;
                    continue;
                }
                prev = edges[prev as usize].prev;
                if prev != INVALID {
                    let stop = if strip_search {
                        edges[prev as usize].bundle[ABOVE][CLIP] != 0
                            || edges[prev as usize].bundle[ABOVE][SUBJ] != 0
                            || edges[prev as usize].bstate[ABOVE] == BundleState::BundleHead
                    } else {
                        edges[prev as usize].bstate[ABOVE] != BundleState::BundleTail
                    };
                    if stop {
                        search = false;
                    }
                } else {
                    search = false;
                }
            }
        }

        if prev == INVALID {
            let old_top = self.top;
            edges[old_top as usize].prev = e1;
            edges[e1 as usize].next = old_top;
            self.top = edges[e0 as usize].next;
        } else {
            let pn = edges[prev as usize].next;
            edges[pn as usize].prev = e1;
            edges[e1 as usize].next = pn;
            edges[prev as usize].next = edges[e0 as usize].next;
        }
        let e0_next = edges[e0 as usize].next;
        if e0_next != INVALID {
            edges[e0_next as usize].prev = prev;
        }
        let e1_next = edges[e1 as usize].next;
        if e1_next != INVALID {
            edges[e1_next as usize].prev = e1;
        }
        edges[e0 as usize].next = next;
    }
}
