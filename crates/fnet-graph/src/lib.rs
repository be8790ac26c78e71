#![deny(missing_docs)]

//! Weighted directed exposure networks for the FNet contagion engine.
//!
//! A [`WeightedDirectedGraph`] is built once per analysis run, either from a
//! node attribute table and a square exposure matrix or from previously
//! materialized [`GraphParts`]. Its topology stays fixed during propagation;
//! only node attributes such as `centrality` are written back.

mod attributes;
mod flags;
mod generators;
mod hash;
mod matrix;
mod network;
mod serialization;

pub use attributes::{AttributeValue, NodeAttribute, NodeAttributes};
pub use flags::NetworkConfig;
pub use generators::{gen_chain, gen_complete, gen_random_exposures};
pub use hash::canonical_hash;
pub use matrix::{ExposureMatrix, NodeTable};
pub use network::{EdgePart, EdgeView, GraphParts, InEdge, NodePart, WeightedDirectedGraph};

/// Re-export serialization helpers for the persistence handoff.
pub use serialization::{graph_from_json, graph_to_json};
