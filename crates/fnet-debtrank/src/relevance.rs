use std::collections::BTreeMap;

use fnet_core::FnetError;
use fnet_graph::WeightedDirectedGraph;

use crate::state::NodeDistress;

/// Relevance of every node resolved against one graph, with its total.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceWeights {
    values: Vec<f64>,
    total: f64,
}

impl RelevanceWeights {
    /// Resolves a key to relevance mapping against `graph`.
    ///
    /// An empty mapping gives every node relevance 1. Otherwise nodes absent
    /// from the mapping get 0 and keys that are not in the graph are ignored.
    pub fn resolve(
        graph: &WeightedDirectedGraph,
        relevance: &BTreeMap<String, f64>,
    ) -> Result<Self, FnetError> {
        if relevance.is_empty() {
            return Self::from_values(vec![1.0; graph.node_count()]);
        }
        let mut values = Vec::with_capacity(graph.node_count());
        for key in graph.nodes() {
            let value = relevance.get(key).copied().unwrap_or(0.0);
            if !value.is_finite() || value < 0.0 {
                return Err(FnetError::parameter(
                    "negative-relevance",
                    "relevance must be a finite non-negative number",
                )
                .with_context("node", key)
                .with_context("value", value));
            }
            values.push(value);
        }
        Self::from_values(values)
    }

    fn from_values(mut values: Vec<f64>) -> Result<Self, FnetError> {
        let mut total: f64 = values.iter().sum();
        if total.is_infinite() {
            // finite values whose sum overflows; only their ratios matter
            let max = values.iter().copied().fold(0.0, f64::max);
            for value in &mut values {
                *value /= max;
            }
            total = values.iter().sum();
        }
        if total.is_nan() || total <= 0.0 {
            return Err(FnetError::degenerate_relevance(total)
                .with_hint("supply at least one node with positive relevance"));
        }
        Ok(Self { values, total })
    }

    /// Sum of the relevance of all nodes, after rescaling when the raw sum overflows.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Relevance-weighted share of system distress, `Σ level · relevance / total`.
    pub(crate) fn system_distress(&self, nodes: &[NodeDistress]) -> f64 {
        nodes
            .iter()
            .zip(&self.values)
            .map(|(node, relevance)| node.level * relevance / self.total)
            .sum()
    }
}
