#![deny(missing_docs)]
#![doc = "Core identifiers and error types for the FNet financial contagion engine."]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod rng;

pub use errors::{ErrorInfo, FnetError};
pub use rng::RngHandle;

/// Dense identifier for a node within a single weighted graph.
///
/// Identifiers are issued in insertion order by the graph that owns the node
/// and are meaningless for any other graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the identifier as an index into per-node arrays.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Semantics of the edge weights of a network.
///
/// Only exposure-derived weights describe how distress travels from one
/// institution to another. The engine records the kind but leaves the
/// decision of whether to propagate over it to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkKind {
    /// Weights are equity-ownership exposures.
    #[default]
    Ownership,
    /// Weights are derived from return correlations.
    Correlation,
}

impl NetworkKind {
    /// Returns whether distress propagation is meaningful for this kind of network.
    pub fn supports_propagation(&self) -> bool {
        matches!(self, NetworkKind::Ownership)
    }

    /// Returns the stable label of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::Ownership => "ownership",
            NetworkKind::Correlation => "correlation",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkKind {
    type Err = FnetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ownership" | "equityOwnership" => Ok(NetworkKind::Ownership),
            "correlation" => Ok(NetworkKind::Correlation),
            other => Err(
                FnetError::parameter("unknown-network-kind", "unrecognised network kind")
                    .with_context("kind", other),
            ),
        }
    }
}
