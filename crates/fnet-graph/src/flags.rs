use fnet_core::NetworkKind;
use serde::{Deserialize, Serialize};

/// Configuration options that control how a [`WeightedDirectedGraph`](crate::WeightedDirectedGraph)
/// is built from an exposure matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Semantics of the edge weights.
    #[serde(default)]
    pub kind: NetworkKind,
    /// Whether diagonal matrix entries are forced to zero at construction.
    #[serde(default)]
    pub zero_self_loops: bool,
    /// Whether zero matrix entries are kept as explicit edges.
    #[serde(default = "default_keep_zero_weights")]
    pub keep_zero_weights: bool,
}

fn default_keep_zero_weights() -> bool {
    true
}

impl NetworkConfig {
    /// Returns a default configuration for the provided network kind.
    pub fn for_kind(kind: NetworkKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            kind: NetworkKind::Ownership,
            zero_self_loops: false,
            keep_zero_weights: default_keep_zero_weights(),
        }
    }
}
