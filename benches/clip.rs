//! Benchmarks for the boolean clipping engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gpc_rust::{clip, clip_to_mesh, ClipOp, Polygon};

/// An n-pointed star centred on (cx, cy); self-intersection free.
fn star(cx: f32, cy: f32, points: usize, r_outer: f32, r_inner: f32) -> Polygon {
    let mut pts = Vec::with_capacity(points * 2);
    for i in 0..points * 2 {
        let r = if i % 2 == 0 { r_outer } else { r_inner };
        let a = i as f32 / (points * 2) as f32 * std::f32::consts::TAU;
        pts.push((cx + r * a.cos(), cy + r * a.sin()));
    }
    Polygon::from_points(pts)
}

/// A checkerboard of disjoint square contours.
fn grid(n: usize, cell: f32) -> Polygon {
    let mut poly = Polygon::new();
    for row in 0..n {
        for col in 0..n {
            if (row + col) % 2 == 0 {
                let x = col as f32 * cell;
                let y = row as f32 * cell;
                poly.contours.extend(
                    Polygon::from_points([
                        (x, y),
                        (x + cell, y),
                        (x + cell, y + cell),
                        (x, y + cell),
                    ])
                    .contours,
                );
            }
        }
    }
    poly
}

fn bench_star_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("star_vs_star");
    for points in [8usize, 32, 128] {
        let a = star(0.0, 0.0, points, 10.0, 4.0);
        let b = star(3.0, 2.0, points, 10.0, 4.0);
        for op in [ClipOp::Union, ClipOp::Intersection, ClipOp::Xor] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", op), points),
                &(&a, &b),
                |bench, &(a, b)| bench.iter(|| clip(black_box(op), black_box(a), black_box(b))),
            );
        }
    }
    group.finish();
}

fn bench_grid_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_difference");
    for n in [4usize, 8, 16] {
        let board = grid(n, 2.0);
        let punch = star(n as f32, n as f32, 6, n as f32, n as f32 * 0.4);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(&board, &punch), |bench, &(a, b)| {
            bench.iter(|| clip(black_box(ClipOp::Difference), black_box(a), black_box(b)))
        });
    }
    group.finish();
}

fn bench_tristrip_output(c: &mut Criterion) {
    let a = star(0.0, 0.0, 32, 10.0, 4.0);
    let b = star(3.0, 2.0, 32, 10.0, 4.0);
    c.bench_function("tristrip_union_32_star", |bench| {
        bench.iter(|| clip_to_mesh(black_box(ClipOp::Union), black_box(&a), black_box(&b)))
    });
}

criterion_group!(benches, bench_star_ops, bench_grid_difference, bench_tristrip_output);
criterion_main!(benches);
