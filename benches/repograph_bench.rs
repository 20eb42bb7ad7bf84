// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Builder throughput on synthetic listings

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repograph::graph::{build_graph, filter_graph};
use repograph::tree::build_tree;
use repograph::types::Entry;

/// Parent-first listing: `dirs` directories of `files` files each
fn listing(dirs: usize, files: usize) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(dirs * (files + 1));
    for d in 0..dirs {
        let dir = format!("pkg{d}/src");
        entries.push(Entry::tree(format!("pkg{d}")));
        entries.push(Entry::tree(dir.clone()));
        for f in 0..files {
            entries.push(Entry::blob(format!("{dir}/module_{f}.rs")));
        }
    }
    entries
}

fn bench_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders");
    for size in [10, 100, 500] {
        let entries = listing(size, 20);
        group.bench_with_input(BenchmarkId::new("build_graph", size), &entries, |b, e| {
            b.iter(|| build_graph(black_box(e)));
        });

        let graph = build_graph(&entries).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("build_tree", size), &graph, |b, g| {
            b.iter(|| build_tree(black_box(&g.nodes)));
        });
        group.bench_with_input(BenchmarkId::new("filter_graph", size), &graph, |b, g| {
            b.iter(|| filter_graph(black_box(g), black_box("module_1")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_builders);
criterion_main!(benches);
