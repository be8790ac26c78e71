use sha2::{Digest, Sha256};

use crate::flags::NetworkConfig;
use crate::network::WeightedDirectedGraph;

/// Computes the canonical structural hash for the provided graph.
///
/// The hash covers the configuration, the key set and every edge with the
/// exact bits of its weight. It is independent of insertion order and of node
/// attributes, so centrality passes and what-if runs leave it unchanged.
pub fn canonical_hash(graph: &WeightedDirectedGraph) -> String {
    let mut hasher = Sha256::new();
    encode_config(graph.config(), &mut hasher);

    let mut keys: Vec<&str> = graph.nodes().collect();
    keys.sort_unstable();
    hasher.update((keys.len() as u64).to_le_bytes());
    for key in keys {
        update_str(key, &mut hasher);
    }

    let mut edges: Vec<(&str, &str, u64)> = graph
        .edges()
        .map(|edge| (edge.source, edge.target, edge.weight.to_bits()))
        .collect();
    edges.sort_unstable();
    hasher.update((edges.len() as u64).to_le_bytes());
    for (source, target, bits) in edges {
        update_str(source, &mut hasher);
        update_str(target, &mut hasher);
        hasher.update(bits.to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}

fn encode_config(config: &NetworkConfig, hasher: &mut Sha256) {
    hasher.update(b"kind:");
    hasher.update(config.kind.as_str().as_bytes());
    encode_flag("zero-self-loops", config.zero_self_loops, hasher);
    encode_flag("keep-zero-weights", config.keep_zero_weights, hasher);
}

fn encode_flag(label: &str, value: bool, hasher: &mut Sha256) {
    hasher.update(label.as_bytes());
    if value {
        hasher.update(b":on");
    } else {
        hasher.update(b":off");
    }
}

fn update_str(value: &str, hasher: &mut Sha256) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
