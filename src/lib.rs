// gpc-rust: Pure Rust port of the General Polygon Clipper (GPC) by Alan Murta
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod aet;
pub mod clip;
pub mod geom;
pub mod lmt;
pub mod output;
pub mod polygon;

pub use clip::{clip, clip_to_mesh, difference, intersection, polygon_to_mesh, union, xor, ClipOp};
pub use geom::{Point, Real, GPC_EPSILON};
pub use polygon::{Contour, Mesh, Polygon, TriStrip};
