use std::collections::BTreeMap;

use fnet_core::rng::RngHandle;
use fnet_core::FnetError;
use fnet_debtrank::{
    run, run_cancellable, CancelToken, DistressStatus, PropagationParams, Propagator, Termination,
};
use fnet_graph::{
    canonical_hash, gen_chain, gen_complete, EdgePart, GraphParts, NodeAttributes, NodePart,
    WeightedDirectedGraph,
};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn uniform() -> BTreeMap<String, f64> {
    BTreeMap::new()
}

fn graph_of(keys: &[&str], edges: &[(&str, &str, f64)]) -> WeightedDirectedGraph {
    let parts = GraphParts {
        nodes: keys
            .iter()
            .map(|key| NodePart {
                key: key.to_string(),
                attributes: NodeAttributes::named(*key),
            })
            .collect(),
        edges: edges
            .iter()
            .map(|(source, target, weight)| EdgePart {
                source: source.to_string(),
                target: target.to_string(),
                weight: *weight,
            })
            .collect(),
        ..GraphParts::default()
    };
    WeightedDirectedGraph::from_parts(parts).unwrap()
}

#[test]
fn isolated_node_goes_inactive_without_impact() {
    let graph = graph_of(&["A"], &[]);
    let outcome = run(&graph, &["A"], &uniform(), &PropagationParams::default()).unwrap();

    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.termination, Termination::Converged);
    assert!(close(outcome.impact, 0.0));
    assert!(close(outcome.baseline, 1.0));
    let a = outcome.distress_of("A").unwrap();
    assert_eq!(a.status, DistressStatus::Inactive);
    assert!(close(a.level, 1.0));
}

#[test]
fn two_node_chain_transmits_full_distress() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let outcome = run(&graph, &["A"], &uniform(), &PropagationParams::default()).unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.rounds, 2);
    assert!(close(outcome.baseline, 0.5));
    assert!(close(outcome.impact, 0.5));
    for key in ["A", "B"] {
        let node = outcome.distress_of(key).unwrap();
        assert_eq!(node.status, DistressStatus::Inactive);
        assert!(close(node.level, 1.0));
    }
}

#[test]
fn weighted_chain_attenuates_along_the_path() {
    let graph = gen_chain(&["A", "B", "C"], 0.5).unwrap();
    let outcome = run(&graph, &["A"], &uniform(), &PropagationParams::default()).unwrap();

    assert_eq!(outcome.rounds, 3);
    assert!(close(outcome.distress_of("B").unwrap().level, 0.5));
    assert!(close(outcome.distress_of("C").unwrap().level, 0.25));
    assert!(close(outcome.impact, 0.75 / 3.0));
}

#[test]
fn rounds_read_only_the_previous_snapshot() {
    let graph = gen_chain(&["A", "B", "C"], 1.0).unwrap();
    let params = PropagationParams {
        max_iterations: 1,
        ..PropagationParams::default()
    };
    let outcome = run(&graph, &["A"], &uniform(), &params).unwrap();

    assert_eq!(outcome.termination, Termination::IterationCap);
    assert_eq!(outcome.rounds, 1);
    let b = outcome.distress_of("B").unwrap();
    assert_eq!(b.status, DistressStatus::Distressed);
    assert!(close(b.level, 1.0));
    let c = outcome.distress_of("C").unwrap();
    assert_eq!(c.status, DistressStatus::Undistressed);
    assert!(close(c.level, 0.0));
}

#[test]
fn parallel_rounds_match_sequential_rounds() {
    let mut rng = RngHandle::from_seed(5);
    let graph = gen_complete(24, 0.0, 0.1, &mut rng).unwrap();
    let sequential = PropagationParams::default();
    let parallel = PropagationParams {
        parallel_threshold: 1,
        ..PropagationParams::default()
    };

    let a = run(&graph, &["N0003"], &uniform(), &sequential).unwrap();
    let b = run(&graph, &["N0003"], &uniform(), &parallel).unwrap();
    assert_eq!(a, b);
}

#[test]
fn levels_clamp_at_one() {
    let graph = graph_of(&["A", "B", "C"], &[("A", "C", 0.8), ("B", "C", 0.8)]);
    let outcome = run(&graph, &["A", "B"], &uniform(), &PropagationParams::default()).unwrap();

    let c = outcome.distress_of("C").unwrap();
    assert_eq!(c.level, 1.0);
    assert!(close(outcome.impact, 1.0 / 3.0));
}

#[test]
fn duplicate_shock_keys_count_once() {
    let graph = gen_chain(&["A", "B"], 0.5).unwrap();
    let once = run(&graph, &["A"], &uniform(), &PropagationParams::default()).unwrap();
    let twice = run(&graph, &["A", "A"], &uniform(), &PropagationParams::default()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn partial_shock_level_is_kept_by_seeds() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let outcome = run(&graph, &["A"], &uniform(), &PropagationParams::with_level(0.4)).unwrap();

    assert!(close(outcome.baseline, 0.2));
    assert!(close(outcome.distress_of("A").unwrap().level, 0.4));
    assert!(close(outcome.distress_of("B").unwrap().level, 0.4));
    assert!(close(outcome.impact, 0.2));
}

#[test]
fn self_loop_feeds_back_once() {
    let graph = graph_of(&["A"], &[("A", "A", 0.5)]);
    let outcome = run(&graph, &["A"], &uniform(), &PropagationParams::with_level(0.4)).unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.rounds, 1);
    let a = outcome.distress_of("A").unwrap();
    assert_eq!(a.status, DistressStatus::Inactive);
    assert!(close(a.level, 0.6));
    assert!(close(outcome.impact, 0.2));
}

#[test]
fn inactive_nodes_absorb_but_never_retransmit() {
    let graph = graph_of(&["A", "B"], &[("A", "B", 1.0), ("B", "A", 0.5)]);
    let outcome = run(&graph, &["A"], &uniform(), &PropagationParams::with_level(0.5)).unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.rounds, 2);
    let a = outcome.distress_of("A").unwrap();
    assert_eq!(a.status, DistressStatus::Inactive);
    assert!(close(a.level, 0.75));
    // A's feedback arrives after it went inactive, so B is not hit again
    let b = outcome.distress_of("B").unwrap();
    assert_eq!(b.status, DistressStatus::Inactive);
    assert!(close(b.level, 0.5));
    assert!(close(outcome.baseline, 0.25));
    assert!(close(outcome.impact, 0.375));
}

#[test]
fn huge_equal_relevance_behaves_like_uniform() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let huge = BTreeMap::from([("A".to_string(), 1e308), ("B".to_string(), 1e308)]);

    let weighted = run(&graph, &["A"], &huge, &PropagationParams::default()).unwrap();
    let fallback = run(&graph, &["A"], &uniform(), &PropagationParams::default()).unwrap();
    assert!(close(weighted.baseline, 0.5));
    assert!(close(weighted.impact, 0.5));
    assert_eq!(weighted, fallback);
}

#[test]
fn overflowing_relevance_keeps_its_ratios() {
    let graph = gen_chain(&["A", "B", "C"], 1.0).unwrap();
    let huge = BTreeMap::from([
        ("A".to_string(), 1e308),
        ("B".to_string(), 5e307),
        ("C".to_string(), 1e308),
    ]);
    let propagator = Propagator::new(&graph, &huge).unwrap();
    assert!(propagator.relevance().total().is_finite());

    // same ratios as {A: 2, B: 1, C: 2}
    let outcome = propagator.run(&["B"], &PropagationParams::default()).unwrap();
    assert!(close(outcome.baseline, 0.2));
    assert!(close(outcome.impact, 0.4));
}

#[test]
fn zero_relevance_is_degenerate() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let relevance = BTreeMap::from([("A".to_string(), 0.0), ("B".to_string(), 0.0)]);
    let err = run(&graph, &["A"], &relevance, &PropagationParams::default()).unwrap_err();
    assert!(matches!(err, FnetError::DegenerateRelevance(_)));
}

#[test]
fn negative_relevance_is_rejected() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let relevance = BTreeMap::from([("A".to_string(), 2.0), ("B".to_string(), -1.0)]);
    let err = run(&graph, &["A"], &relevance, &PropagationParams::default()).unwrap_err();
    assert!(matches!(&err, FnetError::InvalidParameter(info) if info.code == "negative-relevance"));
}

#[test]
fn empty_relevance_equals_explicit_ones() {
    let mut rng = RngHandle::from_seed(17);
    let graph = gen_complete(8, 0.0, 0.2, &mut rng).unwrap();
    let ones: BTreeMap<String, f64> = graph.nodes().map(|key| (key.to_string(), 1.0)).collect();
    let mut with_extra = ones.clone();
    with_extra.insert("NOT-IN-GRAPH".into(), 50.0);

    let params = PropagationParams::default();
    let fallback = run(&graph, &["N0001"], &uniform(), &params).unwrap();
    let explicit = run(&graph, &["N0001"], &ones, &params).unwrap();
    let extra = run(&graph, &["N0001"], &with_extra, &params).unwrap();
    assert_eq!(fallback, explicit);
    assert_eq!(fallback, extra);
}

#[test]
fn missing_relevance_keys_weigh_nothing() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let relevance = BTreeMap::from([("B".to_string(), 3.0)]);
    let outcome = run(&graph, &["A"], &relevance, &PropagationParams::default()).unwrap();
    assert!(close(outcome.baseline, 0.0));
    assert!(close(outcome.impact, 1.0));
}

#[test]
fn parameters_are_checked_before_the_shock_set() {
    let graph = gen_chain(&["A", "B"], 1.0).unwrap();
    let empty: [&str; 0] = [];

    for level in [0.0, -0.5, 1.5, f64::NAN] {
        let err = run(&graph, &empty, &uniform(), &PropagationParams::with_level(level))
            .unwrap_err();
        assert!(matches!(&err, FnetError::InvalidParameter(info) if info.code == "initial-level"));
    }

    let no_rounds = PropagationParams {
        max_iterations: 0,
        ..PropagationParams::default()
    };
    let err = run(&graph, &["A"], &uniform(), &no_rounds).unwrap_err();
    assert!(matches!(&err, FnetError::InvalidParameter(info) if info.code == "max-iterations"));

    let err = run(&graph, &empty, &uniform(), &PropagationParams::default()).unwrap_err();
    assert!(matches!(&err, FnetError::InvalidParameter(info) if info.code == "empty-shock"));

    let err = run(&graph, &["Z"], &uniform(), &PropagationParams::default()).unwrap_err();
    assert!(matches!(err, FnetError::UnknownNode(_)));
}

#[test]
fn iteration_cap_is_reported_not_raised() {
    let graph = gen_chain(&["A", "B", "C", "D"], 1.0).unwrap();
    let params = PropagationParams {
        max_iterations: 2,
        ..PropagationParams::default()
    };
    let outcome = run(&graph, &["A"], &uniform(), &params).unwrap();
    assert_eq!(outcome.termination, Termination::IterationCap);
    assert_eq!(outcome.rounds, 2);
    assert!(!outcome.converged());
}

#[test]
fn cancelled_token_stops_before_the_first_round() {
    let graph = gen_chain(&["A", "B", "C"], 1.0).unwrap();
    let token = CancelToken::new();
    token.cancel();

    let outcome = run_cancellable(
        &graph,
        &["A"],
        &uniform(),
        &PropagationParams::default(),
        &token,
    )
    .unwrap();
    assert_eq!(outcome.termination, Termination::Cancelled);
    assert_eq!(outcome.rounds, 0);
    assert!(close(outcome.impact, 0.0));
    assert_eq!(
        outcome.distress_of("A").unwrap().status,
        DistressStatus::Distressed
    );

    token.reset();
    let resumed = run_cancellable(
        &graph,
        &["A"],
        &uniform(),
        &PropagationParams::default(),
        &token,
    )
    .unwrap();
    let plain = run(&graph, &["A"], &uniform(), &PropagationParams::default()).unwrap();
    assert_eq!(resumed, plain);
}

#[test]
fn propagator_reuses_resolved_relevance() {
    let mut graph = gen_chain(&["A", "B", "C"], 0.5).unwrap();
    graph
        .set_attribute_map(
            fnet_graph::NodeAttribute::Relevance,
            [
                ("A", fnet_graph::AttributeValue::Number(2.0)),
                ("B", fnet_graph::AttributeValue::Number(1.0)),
                ("C", fnet_graph::AttributeValue::Number(1.0)),
            ],
        )
        .unwrap();
    let before = canonical_hash(&graph);

    let propagator = Propagator::from_attributes(&graph).unwrap();
    assert!(close(propagator.relevance().total(), 4.0));
    let from_a = propagator.run(&["A"], &PropagationParams::default()).unwrap();
    let from_b = propagator.run(&["B"], &PropagationParams::default()).unwrap();

    assert!(close(from_a.baseline, 0.5));
    assert!(close(from_a.impact, (0.5 + 0.25) / 4.0));
    assert!(close(from_b.impact, 0.5 / 4.0));
    assert_eq!(canonical_hash(propagator.graph()), before);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn complete_graphs_settle_within_node_count_rounds(seed in any::<u64>(), shocked in 0usize..10) {
        let mut rng = RngHandle::from_seed(seed);
        let graph = gen_complete(10, 0.01, 1.0, &mut rng).unwrap();
        let key = format!("N{shocked:04}");
        let outcome = run(&graph, &[key], &uniform(), &PropagationParams::default()).unwrap();

        prop_assert!(outcome.converged());
        prop_assert!(outcome.rounds <= graph.node_count());
        prop_assert!(outcome.impact >= -1e-12);
        for node in outcome.final_state.values() {
            prop_assert!((0.0..=1.0).contains(&node.level));
            prop_assert_ne!(node.status, DistressStatus::Distressed);
        }
    }
}
