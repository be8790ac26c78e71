use fnet_core::FnetError;

use crate::network::{GraphParts, WeightedDirectedGraph};

/// Serializes the graph parts to a JSON string.
///
/// `induced_stress` is never written; centrality is written when present.
pub fn graph_to_json(graph: &WeightedDirectedGraph) -> Result<String, FnetError> {
    serde_json::to_string_pretty(&graph.to_parts())
        .map_err(|err| FnetError::serde("serialize-json", err))
}

/// Restores a graph from a JSON string produced by [`graph_to_json`].
pub fn graph_from_json(json: &str) -> Result<WeightedDirectedGraph, FnetError> {
    let parts: GraphParts =
        serde_json::from_str(json).map_err(|err| FnetError::serde("deserialize-json", err))?;
    WeightedDirectedGraph::from_parts(parts)
}
