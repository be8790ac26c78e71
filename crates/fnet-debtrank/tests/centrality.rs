use std::collections::BTreeMap;

use fnet_core::rng::RngHandle;
use fnet_core::FnetError;
use fnet_debtrank::{
    centrality_scores, compute_centrality, compute_centrality_from_attributes, run,
    CentralityOpts, PropagationParams,
};
use fnet_graph::{
    canonical_hash, gen_chain, gen_random_exposures, AttributeValue, NetworkConfig,
    NodeAttribute, WeightedDirectedGraph,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn chain_centrality_is_written_on_every_node() {
    let mut graph = gen_chain(&["A", "B", "C"], 1.0).unwrap();
    let scores = compute_centrality(&mut graph, &BTreeMap::new(), &CentralityOpts::default())
        .unwrap();

    assert_eq!(scores.keys().collect::<Vec<_>>(), ["A", "B", "C"]);
    assert!(close(scores["A"], 2.0 / 3.0));
    assert!(close(scores["B"], 1.0 / 3.0));
    assert!(close(scores["C"], 0.0));
    for (key, score) in &scores {
        assert_eq!(
            graph
                .get_node_attribute(key, NodeAttribute::Centrality)
                .unwrap(),
            AttributeValue::Number(*score)
        );
    }
}

#[test]
fn centrality_matches_single_node_runs() {
    let mut rng = RngHandle::from_seed(23);
    let graph = gen_random_exposures(30, 0.2, 0.4, &mut rng).unwrap();
    let relevance: BTreeMap<String, f64> = graph
        .nodes()
        .enumerate()
        .map(|(i, key)| (key.to_string(), 1.0 + i as f64))
        .collect();

    let scores = centrality_scores(&graph, &relevance, &CentralityOpts::default()).unwrap();
    for key in graph.nodes() {
        let outcome = run(&graph, &[key], &relevance, &PropagationParams::default()).unwrap();
        assert_eq!(scores[key], outcome.impact);
    }
}

#[test]
fn repeated_passes_are_idempotent_and_keep_topology() {
    let mut rng = RngHandle::from_seed(3);
    let mut graph = gen_random_exposures(40, 0.15, 0.5, &mut rng).unwrap();
    let before = canonical_hash(&graph);
    let edges = graph.edge_count();

    let opts = CentralityOpts {
        concurrency: 2,
        ..CentralityOpts::default()
    };
    let first = compute_centrality(&mut graph, &BTreeMap::new(), &opts).unwrap();
    let second = compute_centrality(&mut graph, &BTreeMap::new(), &opts).unwrap();

    assert_eq!(first, second);
    assert_eq!(canonical_hash(&graph), before);
    assert_eq!(graph.edge_count(), edges);
}

#[test]
fn worker_count_does_not_change_scores() {
    let mut rng = RngHandle::from_seed(41);
    let graph = gen_random_exposures(25, 0.3, 0.3, &mut rng).unwrap();
    let relevance = BTreeMap::new();

    let single = CentralityOpts {
        concurrency: 1,
        ..CentralityOpts::default()
    };
    let many = CentralityOpts {
        concurrency: 4,
        parallel_threshold: 1,
        ..CentralityOpts::default()
    };
    assert_eq!(
        centrality_scores(&graph, &relevance, &single).unwrap(),
        centrality_scores(&graph, &relevance, &many).unwrap()
    );
}

#[test]
fn stored_relevance_drives_the_pass() {
    let mut graph = gen_chain(&["A", "B"], 1.0).unwrap();
    graph
        .set_attribute_map(
            NodeAttribute::Relevance,
            [
                ("A", AttributeValue::Number(1.0)),
                ("B", AttributeValue::Number(3.0)),
            ],
        )
        .unwrap();

    let scores = compute_centrality_from_attributes(&mut graph, &CentralityOpts::default()).unwrap();
    assert!(close(scores["A"], 0.75));
    assert!(close(scores["B"], 0.0));
}

#[test]
fn empty_graph_has_no_scores() {
    let mut graph = WeightedDirectedGraph::new(NetworkConfig::default());
    let scores =
        compute_centrality(&mut graph, &BTreeMap::new(), &CentralityOpts::default()).unwrap();
    assert!(scores.is_empty());
}

#[test]
fn degenerate_relevance_leaves_attributes_untouched() {
    let mut graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let relevance = BTreeMap::from([("A".to_string(), 0.0)]);

    let err = compute_centrality(&mut graph, &relevance, &CentralityOpts::default()).unwrap_err();
    assert!(matches!(err, FnetError::DegenerateRelevance(_)));
    assert_eq!(graph.attributes("A").unwrap().centrality, None);
    assert_eq!(graph.attributes("B").unwrap().centrality, None);
}
