use std::collections::BTreeMap;

use fnet_core::{FnetError, NodeId};
use fnet_graph::WeightedDirectedGraph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::relevance::RelevanceWeights;
use crate::state::{DistressState, NodeDistress};

/// Round cap applied when the caller does not pick one.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Node count from which a single round updates nodes in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Parameters of a single propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropagationParams {
    /// Distress level assigned to every shocked node, in `(0, 1]`.
    pub initial_level: f64,
    /// Maximum number of rounds, at least 1.
    pub max_iterations: usize,
    /// Graphs with at least this many nodes update a round in parallel.
    pub parallel_threshold: usize,
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            initial_level: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl PropagationParams {
    /// Returns default parameters with the given initial distress level.
    pub fn with_level(initial_level: f64) -> Self {
        Self {
            initial_level,
            ..Self::default()
        }
    }

    /// Checks the initial level and the iteration cap.
    pub fn validate(&self) -> Result<(), FnetError> {
        let level = self.initial_level;
        if level.is_nan() || level <= 0.0 || level > 1.0 {
            return Err(FnetError::parameter(
                "initial-level",
                "initial distress level must lie in (0, 1]",
            )
            .with_context("value", level));
        }
        if self.max_iterations == 0 {
            return Err(FnetError::parameter(
                "max-iterations",
                "at least one propagation round is required",
            ));
        }
        Ok(())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// No node was distressed any more.
    Converged,
    /// The round cap was reached first.
    IterationCap,
    /// The cancel token was set.
    Cancelled,
}

/// Result of a propagation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationOutcome {
    /// Final status and level of every node, in graph insertion order.
    pub final_state: IndexMap<String, NodeDistress>,
    /// Net increase of the relevance-weighted system distress.
    pub impact: f64,
    /// Relevance-weighted system distress right after the shock.
    pub baseline: f64,
    /// Number of rounds executed.
    pub rounds: usize,
    /// Why the run stopped.
    pub termination: Termination,
}

impl PropagationOutcome {
    /// Returns whether the run ended with an empty distressed set.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// Final status and level of a node.
    pub fn distress_of(&self, key: &str) -> Option<&NodeDistress> {
        self.final_state.get(key)
    }
}

/// Key-free result used by the batch centrality pass.
#[derive(Debug, Clone)]
pub(crate) struct RunTrace {
    pub(crate) nodes: Vec<NodeDistress>,
    pub(crate) impact: f64,
    pub(crate) baseline: f64,
    pub(crate) rounds: usize,
    pub(crate) termination: Termination,
}

/// DebtRank propagation bound to a graph and a validated relevance assignment.
///
/// The propagator only reads the graph, so one instance can serve many runs,
/// including concurrent ones.
#[derive(Debug, Clone)]
pub struct Propagator<'g> {
    graph: &'g WeightedDirectedGraph,
    relevance: RelevanceWeights,
}

impl<'g> Propagator<'g> {
    /// Binds `graph` and resolves `relevance` against it.
    pub fn new(
        graph: &'g WeightedDirectedGraph,
        relevance: &BTreeMap<String, f64>,
    ) -> Result<Self, FnetError> {
        Ok(Self {
            graph,
            relevance: RelevanceWeights::resolve(graph, relevance)?,
        })
    }

    /// Binds `graph` using the `relevance` attribute stored on its nodes.
    pub fn from_attributes(graph: &'g WeightedDirectedGraph) -> Result<Self, FnetError> {
        Self::new(graph, &graph.relevance_map())
    }

    /// The graph this propagator reads.
    pub fn graph(&self) -> &'g WeightedDirectedGraph {
        self.graph
    }

    /// The resolved relevance assignment.
    pub fn relevance(&self) -> &RelevanceWeights {
        &self.relevance
    }

    /// Propagates a shock of `params.initial_level` applied to every node of `shock`.
    pub fn run<S: AsRef<str>>(
        &self,
        shock: &[S],
        params: &PropagationParams,
    ) -> Result<PropagationOutcome, FnetError> {
        params.validate()?;
        let seeds = resolve_shock(self.graph, shock)?;
        Ok(self.finish(self.run_resolved(&seeds, params, None)))
    }

    /// Same as [`Propagator::run`], stopping early once `cancel` is set.
    pub fn run_cancellable<S: AsRef<str>>(
        &self,
        shock: &[S],
        params: &PropagationParams,
        cancel: &CancelToken,
    ) -> Result<PropagationOutcome, FnetError> {
        params.validate()?;
        let seeds = resolve_shock(self.graph, shock)?;
        Ok(self.finish(self.run_resolved(&seeds, params, Some(cancel))))
    }

    /// Runs on validated seeds and parameters.
    pub(crate) fn run_resolved(
        &self,
        seeds: &[NodeId],
        params: &PropagationParams,
        cancel: Option<&CancelToken>,
    ) -> RunTrace {
        let graph = self.graph;
        let parallel = graph.node_count() >= params.parallel_threshold;
        let mut state = DistressState::seeded(graph.node_count(), seeds, params.initial_level);
        let baseline = self.relevance.system_distress(state.nodes());

        let mut rounds = 0;
        let termination = loop {
            if state.distressed() == 0 {
                break Termination::Converged;
            }
            if rounds >= params.max_iterations {
                break Termination::IterationCap;
            }
            if cancel.is_some_and(CancelToken::is_cancelled) {
                break Termination::Cancelled;
            }
            state.step(graph, parallel);
            rounds += 1;
            trace!(round = rounds, distressed = state.distressed(), "propagation round");
        };
        if termination == Termination::IterationCap {
            warn!(
                rounds,
                distressed = state.distressed(),
                "propagation stopped at the iteration cap"
            );
        }

        let impact = self.relevance.system_distress(state.nodes()) - baseline;
        debug!(rounds, ?termination, impact, "propagation finished");
        RunTrace {
            nodes: state.into_nodes(),
            impact,
            baseline,
            rounds,
            termination,
        }
    }

    fn finish(&self, trace: RunTrace) -> PropagationOutcome {
        let final_state = self
            .graph
            .nodes()
            .map(str::to_string)
            .zip(trace.nodes)
            .collect();
        PropagationOutcome {
            final_state,
            impact: trace.impact,
            baseline: trace.baseline,
            rounds: trace.rounds,
            termination: trace.termination,
        }
    }
}

/// Runs DebtRank once for the shock set `shock` over `graph`.
///
/// Validation happens before any computation: the initial level and the
/// iteration cap, then the shock set, then the relevance assignment. An
/// empty `relevance` gives every node relevance 1. The graph is not modified.
pub fn run<S: AsRef<str>>(
    graph: &WeightedDirectedGraph,
    shock: &[S],
    relevance: &BTreeMap<String, f64>,
    params: &PropagationParams,
) -> Result<PropagationOutcome, FnetError> {
    params.validate()?;
    let seeds = resolve_shock(graph, shock)?;
    let propagator = Propagator::new(graph, relevance)?;
    Ok(propagator.finish(propagator.run_resolved(&seeds, params, None)))
}

/// Same as [`run`], checking `cancel` once per round.
pub fn run_cancellable<S: AsRef<str>>(
    graph: &WeightedDirectedGraph,
    shock: &[S],
    relevance: &BTreeMap<String, f64>,
    params: &PropagationParams,
    cancel: &CancelToken,
) -> Result<PropagationOutcome, FnetError> {
    params.validate()?;
    let seeds = resolve_shock(graph, shock)?;
    let propagator = Propagator::new(graph, relevance)?;
    Ok(propagator.finish(propagator.run_resolved(&seeds, params, Some(cancel))))
}

fn resolve_shock<S: AsRef<str>>(
    graph: &WeightedDirectedGraph,
    shock: &[S],
) -> Result<Vec<NodeId>, FnetError> {
    if shock.is_empty() {
        return Err(FnetError::parameter(
            "empty-shock",
            "at least one node must be shocked",
        ));
    }
    let mut seeds = shock
        .iter()
        .map(|key| graph.node_id(key.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    seeds.sort_unstable();
    seeds.dedup();
    Ok(seeds)
}
