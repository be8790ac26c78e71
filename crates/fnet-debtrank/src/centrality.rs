use std::collections::BTreeMap;

use fnet_core::{FnetError, NodeId};
use fnet_graph::{AttributeValue, NodeAttribute, WeightedDirectedGraph};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::propagate::{
    PropagationParams, Propagator, Termination, DEFAULT_MAX_ITERATIONS,
    DEFAULT_PARALLEL_THRESHOLD,
};

/// Options governing a centrality pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityOpts {
    /// Round cap of every single-node run.
    pub max_iterations: usize,
    /// Worker threads for the per-node runs; `0` lets rayon decide.
    pub concurrency: usize,
    /// Node count from which a single round updates nodes in parallel.
    pub parallel_threshold: usize,
}

impl Default for CentralityOpts {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            concurrency: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl CentralityOpts {
    fn params(&self) -> PropagationParams {
        PropagationParams {
            initial_level: 1.0,
            max_iterations: self.max_iterations,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

/// DebtRank centrality of every node, without touching the graph.
///
/// Each node is shocked alone at level 1 and its score is the impact of that
/// run. The runs are independent and share the read-only graph, so they are
/// spread over a rayon pool; the result keeps graph insertion order. A full
/// pass costs one propagation per node, roughly `O(N · rounds · E)`.
pub fn centrality_scores(
    graph: &WeightedDirectedGraph,
    relevance: &BTreeMap<String, f64>,
    opts: &CentralityOpts,
) -> Result<IndexMap<String, f64>, FnetError> {
    let params = opts.params();
    params.validate()?;
    if graph.node_count() == 0 {
        return Ok(IndexMap::new());
    }
    let propagator = Propagator::new(graph, relevance)?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if opts.concurrency > 0 {
        builder = builder.num_threads(opts.concurrency);
    }
    let pool = builder
        .build()
        .map_err(|err| FnetError::parameter("thread-pool", err.to_string()))?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        threads = pool.current_num_threads(),
        "computing debtrank centrality"
    );
    let ids: Vec<NodeId> = graph.node_ids().collect();
    let scores: Vec<(NodeId, f64, Termination)> = pool.install(|| {
        ids.par_iter()
            .map(|&id| {
                let trace = propagator.run_resolved(&[id], &params, None);
                (id, trace.impact, trace.termination)
            })
            .collect()
    });

    let capped = scores
        .iter()
        .filter(|(_, _, termination)| *termination == Termination::IterationCap)
        .count();
    if capped > 0 {
        debug!(capped, "some centrality runs stopped at the iteration cap");
    }

    scores
        .into_iter()
        .map(|(id, score, _)| -> Result<(String, f64), FnetError> {
            Ok((graph.key_of(id)?.to_string(), score))
        })
        .collect()
}

/// Computes centrality for every node and stores it as the `centrality` attribute.
///
/// Topology and every other attribute are left as they were. Running the pass
/// twice with the same inputs writes the same scores.
pub fn compute_centrality(
    graph: &mut WeightedDirectedGraph,
    relevance: &BTreeMap<String, f64>,
    opts: &CentralityOpts,
) -> Result<IndexMap<String, f64>, FnetError> {
    let scores = centrality_scores(graph, relevance, opts)?;
    for (index, score) in scores.values().enumerate() {
        graph.set_node_attribute_by_id(
            NodeId::from_raw(index as u32),
            NodeAttribute::Centrality,
            AttributeValue::Number(*score),
        )?;
    }
    info!(nodes = scores.len(), "stored debtrank centrality");
    Ok(scores)
}

/// Same as [`compute_centrality`], reading relevance from the node attributes.
pub fn compute_centrality_from_attributes(
    graph: &mut WeightedDirectedGraph,
    opts: &CentralityOpts,
) -> Result<IndexMap<String, f64>, FnetError> {
    let relevance = graph.relevance_map();
    compute_centrality(graph, &relevance, opts)
}
