use criterion::{Criterion, criterion_group, criterion_main};
use std::collections::HashMap;
use std::hint::black_box;

use gltf_extent::numeric::Float;
use gltf_extent::transform::RowMatrix;
use gltf_extent::{BoundsConfig, Node, SceneGraph, compute_bounding_box_with};
use gltf_extent::rounding::DecimalRounding;

// 200 node deep chain, every node owning a 10k vertex mesh
fn deep_scene() -> (SceneGraph, HashMap<String, Vec<Float>>) {
    let depth = 200;
    let graph: SceneGraph = (0..depth)
        .map(|i| {
            let mut node = Node::new()
                .with_matrix(RowMatrix::translation(0.5, -0.25, 1.0))
                .with_meshes(["grid"]);
            if i + 1 < depth {
                node = node.with_children([format!("node{:03}", i + 1)]);
            }
            (format!("node{i:03}"), node)
        })
        .collect();

    let grid: Vec<Float> = (0..10_000)
        .flat_map(|i| {
            let x = (i % 100) as Float;
            let z = (i / 100) as Float;
            [x, (x * z).sin(), z]
        })
        .collect();
    let source = [("grid".to_string(), grid)].into_iter().collect();
    (graph, source)
}

fn bench_bounds(c: &mut Criterion) {
    let (graph, source) = deep_scene();

    c.bench_function("bounds_sequential", |b| {
        let config = BoundsConfig { precision: Some(3), parallel: false };
        b.iter(|| {
            let result = compute_bounding_box_with(black_box(&graph), &source, &config, &DecimalRounding);
            if let Err(ref e) = result {
                println!("[BENCH] bounds error: {e}");
            }
        })
    });

    c.bench_function("bounds_parallel", |b| {
        let config = BoundsConfig { precision: Some(3), parallel: true };
        b.iter(|| {
            let result = compute_bounding_box_with(black_box(&graph), &source, &config, &DecimalRounding);
            if let Err(ref e) = result {
                println!("[BENCH] bounds error: {e}");
            }
        })
    });
}

criterion_group!(benches, bench_bounds);
criterion_main!(benches);
