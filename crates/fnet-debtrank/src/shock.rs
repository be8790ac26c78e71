use std::collections::BTreeMap;

use fnet_core::FnetError;
use fnet_graph::{AttributeValue, NodeAttribute, WeightedDirectedGraph};
use tracing::info;

use crate::propagate::{run, PropagationOutcome, PropagationParams};

/// Shocks `shock` at `level` and records every node's final level as `induced_stress`.
///
/// Only networks whose kind supports propagation are accepted. `level`
/// replaces `params.initial_level`. Nothing is written when validation fails.
pub fn apply_shock<S: AsRef<str>>(
    graph: &mut WeightedDirectedGraph,
    shock: &[S],
    level: f64,
    relevance: &BTreeMap<String, f64>,
    params: &PropagationParams,
) -> Result<PropagationOutcome, FnetError> {
    let kind = graph.kind();
    if !kind.supports_propagation() {
        return Err(FnetError::parameter(
            "network-kind",
            "network type unsuitable for distress propagation",
        )
        .with_context("kind", kind));
    }
    let params = PropagationParams {
        initial_level: level,
        ..*params
    };
    let outcome = run(graph, shock, relevance, &params)?;
    graph.set_attribute_map(
        NodeAttribute::InducedStress,
        outcome
            .final_state
            .iter()
            .map(|(key, node)| (key.as_str(), AttributeValue::Number(node.level))),
    )?;
    info!(
        shocked = shock.len(),
        level,
        impact = outcome.impact,
        "stored induced stress"
    );
    Ok(outcome)
}

/// Removes `induced_stress` from every node.
pub fn clear_induced_stress(graph: &mut WeightedDirectedGraph) -> Result<(), FnetError> {
    let ids: Vec<_> = graph.node_ids().collect();
    for id in ids {
        graph.set_node_attribute_by_id(id, NodeAttribute::InducedStress, AttributeValue::Absent)?;
    }
    Ok(())
}
