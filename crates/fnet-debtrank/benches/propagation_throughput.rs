use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fnet_core::rng::RngHandle;
use fnet_debtrank::{centrality_scores, CentralityOpts, PropagationParams, Propagator};
use fnet_graph::gen_random_exposures;

fn single_run_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("debtrank_single_run");
    for &nodes in &[200usize, 1_000, 5_000] {
        let mut rng = RngHandle::from_seed(nodes as u64);
        let graph = gen_random_exposures(nodes, 10.0 / nodes as f64, 0.3, &mut rng).unwrap();
        let propagator = Propagator::new(&graph, &BTreeMap::new()).unwrap();
        let params = PropagationParams::default();
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, _| {
            b.iter(|| black_box(propagator.run(&["N0000"], &params).unwrap().impact));
        });
    }
    group.finish();
}

fn centrality_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(99);
    let graph = gen_random_exposures(300, 0.03, 0.3, &mut rng).unwrap();
    let relevance = BTreeMap::new();
    let opts = CentralityOpts::default();

    c.bench_function("debtrank_centrality_300", |b| {
        b.iter(|| black_box(centrality_scores(&graph, &relevance, &opts).unwrap().len()));
    });
}

criterion_group!(benches, single_run_bench, centrality_bench);
criterion_main!(benches);
