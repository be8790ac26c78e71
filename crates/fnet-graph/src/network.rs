use std::collections::BTreeMap;

use fnet_core::{FnetError, NetworkKind, NodeId};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeValue, NodeAttribute, NodeAttributes};
use crate::flags::NetworkConfig;
use crate::matrix::{ExposureMatrix, NodeTable};

/// Incoming edge as stored in the per-node adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InEdge {
    /// Node whose distress is transmitted.
    pub source: NodeId,
    /// Fraction of the source distress transmitted along the edge.
    pub weight: f64,
}

/// Borrowed view of a single edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView<'a> {
    /// Key of the influencing node.
    pub source: &'a str,
    /// Key of the impacted node.
    pub target: &'a str,
    /// Edge weight.
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EdgeRecord {
    source: NodeId,
    target: NodeId,
    weight: f64,
}

#[derive(Debug, Clone)]
struct NodeRecord {
    attributes: NodeAttributes,
    incoming: Vec<InEdge>,
}

/// Materialized node of a [`GraphParts`] collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePart {
    /// Unique node key.
    pub key: String,
    /// Attribute record of the node.
    pub attributes: NodeAttributes,
}

/// Materialized edge of a [`GraphParts`] collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePart {
    /// Key of the influencing node.
    pub source: String,
    /// Key of the impacted node.
    pub target: String,
    /// Edge weight.
    pub weight: f64,
}

/// Node and edge collections of a graph, as handed to and from persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphParts {
    /// Construction configuration of the graph.
    #[serde(default)]
    pub config: NetworkConfig,
    /// Nodes in insertion order.
    pub nodes: Vec<NodePart>,
    /// Directed weighted edges.
    pub edges: Vec<EdgePart>,
}

/// Directed exposure network with a fixed attribute record per node.
///
/// Nodes are never removed, so the [`NodeId`] handed out for a key stays valid
/// for the lifetime of the graph. Every node keeps its incoming adjacency list,
/// which makes [`WeightedDirectedGraph::incoming`] O(in-degree).
#[derive(Debug, Clone)]
pub struct WeightedDirectedGraph {
    config: NetworkConfig,
    nodes: IndexMap<String, NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl WeightedDirectedGraph {
    /// Creates an empty graph with the provided configuration.
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    /// Builds a graph from a node attribute table and an exposure matrix.
    ///
    /// `table` maps every node key to values whose positions match
    /// `attribute_names`. Matrix entry `(i, j)` becomes the edge `j -> i`.
    pub fn from_exposures(
        table: &NodeTable,
        weights: &ExposureMatrix,
        attribute_names: &[NodeAttribute],
        config: NetworkConfig,
    ) -> Result<Self, FnetError> {
        weights.validate_against(table)?;
        let mut graph = Self::new(config);
        for (key, values) in table {
            if values.len() != attribute_names.len() {
                return Err(FnetError::topology(
                    "attribute-count-mismatch",
                    "attribute row does not match the attribute names",
                )
                .with_context("node", key)
                .with_context("expected", attribute_names.len())
                .with_context("actual", values.len()));
            }
            let mut attributes = NodeAttributes::named(key.as_str());
            for (attribute, value) in attribute_names.iter().zip(values) {
                if *attribute == NodeAttribute::Name && *value == AttributeValue::Absent {
                    continue;
                }
                attributes
                    .set(*attribute, value.clone())
                    .map_err(|err| err.with_context("node", key))?;
            }
            graph.insert_node(key.clone(), attributes)?;
        }

        let sources: Vec<NodeId> = weights
            .column_keys()
            .iter()
            .map(|key| graph.node_id(key))
            .collect::<Result<_, _>>()?;
        for (row_key, row) in weights.rows() {
            let target = graph.node_id(row_key)?;
            for (&source, &weight) in sources.iter().zip(row) {
                let weight = if source == target && graph.config.zero_self_loops {
                    0.0
                } else {
                    weight
                };
                if weight == 0.0 && !graph.config.keep_zero_weights {
                    continue;
                }
                graph.push_edge(source, target, weight);
            }
        }
        Ok(graph)
    }

    /// Rebuilds a graph from previously materialized parts.
    ///
    /// Only key uniqueness and edge endpoints are checked.
    pub fn from_parts(parts: GraphParts) -> Result<Self, FnetError> {
        let mut graph = Self::new(parts.config);
        for node in parts.nodes {
            graph.insert_node(node.key, node.attributes)?;
        }
        for edge in parts.edges {
            let source = graph.node_id(&edge.source)?;
            let target = graph.node_id(&edge.target)?;
            graph.push_edge(source, target, edge.weight);
        }
        Ok(graph)
    }

    /// Materializes the graph into node and edge collections.
    pub fn to_parts(&self) -> GraphParts {
        GraphParts {
            config: self.config,
            nodes: self
                .nodes
                .iter()
                .map(|(key, record)| NodePart {
                    key: key.clone(),
                    attributes: record.attributes.clone(),
                })
                .collect(),
            edges: self
                .edges()
                .map(|edge| EdgePart {
                    source: edge.source.to_string(),
                    target: edge.target.to_string(),
                    weight: edge.weight,
                })
                .collect(),
        }
    }

    /// Returns the configuration used to build this graph.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Returns the semantics of the edge weights.
    pub fn kind(&self) -> NetworkKind {
        self.config.kind
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether a node with the given key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterates over node keys in insertion order. Call again to restart.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.nodes.keys().map(String::as_str)
    }

    /// Iterates over node identifiers in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + Clone {
        (0..self.nodes.len()).map(make_node)
    }

    /// Resolves a node key to its identifier.
    pub fn node_id(&self, key: &str) -> Result<NodeId, FnetError> {
        self.nodes
            .get_index_of(key)
            .map(make_node)
            .ok_or_else(|| FnetError::unknown_node(key))
    }

    /// Resolves an identifier back to its node key.
    pub fn key_of(&self, id: NodeId) -> Result<&str, FnetError> {
        self.nodes
            .get_index(node_index(id))
            .map(|(key, _)| key.as_str())
            .ok_or_else(|| FnetError::unknown_node(id.as_raw()))
    }

    /// Iterates over every edge.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.edges.iter().map(move |edge| EdgeView {
            source: self.key_at(edge.source),
            target: self.key_at(edge.target),
            weight: edge.weight,
        })
    }

    /// Returns the `(source key, weight)` pairs of the edges ending at `key`.
    pub fn edges_into(
        &self,
        key: &str,
    ) -> Result<impl Iterator<Item = (&str, f64)> + '_, FnetError> {
        let record = self
            .nodes
            .get(key)
            .ok_or_else(|| FnetError::unknown_node(key))?;
        Ok(record
            .incoming
            .iter()
            .map(move |edge| (self.key_at(edge.source), edge.weight)))
    }

    /// Incoming adjacency of a node. Identifiers from another graph yield no edges.
    pub fn incoming(&self, id: NodeId) -> &[InEdge] {
        self.nodes
            .get_index(node_index(id))
            .map(|(_, record)| record.incoming.as_slice())
            .unwrap_or(&[])
    }

    /// Number of edges ending at `key`.
    pub fn in_degree(&self, key: &str) -> Result<usize, FnetError> {
        Ok(self.record(key)?.incoming.len())
    }

    /// Returns the attribute record of a node.
    pub fn attributes(&self, key: &str) -> Result<&NodeAttributes, FnetError> {
        Ok(&self.record(key)?.attributes)
    }

    /// Reads a named attribute of a node.
    pub fn get_node_attribute(
        &self,
        key: &str,
        attribute: NodeAttribute,
    ) -> Result<AttributeValue, FnetError> {
        Ok(self.record(key)?.attributes.get(attribute))
    }

    /// Writes a named attribute of a node in place.
    pub fn set_node_attribute(
        &mut self,
        key: &str,
        attribute: NodeAttribute,
        value: AttributeValue,
    ) -> Result<(), FnetError> {
        let record = self
            .nodes
            .get_mut(key)
            .ok_or_else(|| FnetError::unknown_node(key))?;
        record
            .attributes
            .set(attribute, value)
            .map_err(|err| err.with_context("node", key))
    }

    /// Writes a named attribute on the node with the given identifier.
    pub fn set_node_attribute_by_id(
        &mut self,
        id: NodeId,
        attribute: NodeAttribute,
        value: AttributeValue,
    ) -> Result<(), FnetError> {
        let (_, record) = self
            .nodes
            .get_index_mut(node_index(id))
            .ok_or_else(|| FnetError::unknown_node(id.as_raw()))?;
        record.attributes.set(attribute, value)
    }

    /// Writes one attribute on many nodes.
    ///
    /// Every key and value is checked before the first write, so a failure
    /// leaves the graph untouched.
    pub fn set_attribute_map<K, I>(&mut self, attribute: NodeAttribute, values: I) -> Result<(), FnetError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, AttributeValue)>,
    {
        let mut resolved = Vec::new();
        for (key, value) in values {
            let id = self.node_id(key.as_ref())?;
            attribute
                .check(&value)
                .map_err(|err| err.with_context("node", key.as_ref()))?;
            resolved.push((id, value));
        }
        for (id, value) in resolved {
            self.set_node_attribute_by_id(id, attribute, value)?;
        }
        Ok(())
    }

    /// Collects the `relevance` attribute of every node that carries one.
    pub fn relevance_map(&self) -> BTreeMap<String, f64> {
        self.nodes
            .iter()
            .filter_map(|(key, record)| record.attributes.relevance.map(|r| (key.clone(), r)))
            .collect()
    }

    /// Removes every edge matching `predicate` and returns how many were removed.
    pub fn remove_edges_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(EdgeView<'_>) -> bool,
    {
        let before = self.edges.len();
        let mut kept = Vec::with_capacity(before);
        for edge in &self.edges {
            let view = EdgeView {
                source: self.key_at(edge.source),
                target: self.key_at(edge.target),
                weight: edge.weight,
            };
            if !predicate(view) {
                kept.push(*edge);
            }
        }
        self.edges = kept;
        self.rebuild_adjacency();
        before - self.edges.len()
    }

    fn insert_node(&mut self, key: String, attributes: NodeAttributes) -> Result<NodeId, FnetError> {
        let index = self.nodes.len();
        match self.nodes.entry(key) {
            Entry::Occupied(entry) => Err(FnetError::topology(
                "duplicate-node",
                "node keys must be unique",
            )
            .with_context("node", entry.key())),
            Entry::Vacant(entry) => {
                entry.insert(NodeRecord {
                    attributes,
                    incoming: Vec::new(),
                });
                Ok(make_node(index))
            }
        }
    }

    fn push_edge(&mut self, source: NodeId, target: NodeId, weight: f64) {
        if let Some((_, record)) = self.nodes.get_index_mut(node_index(target)) {
            record.incoming.push(InEdge { source, weight });
        }
        self.edges.push(EdgeRecord {
            source,
            target,
            weight,
        });
    }

    fn rebuild_adjacency(&mut self) {
        for record in self.nodes.values_mut() {
            record.incoming.clear();
        }
        for edge in &self.edges {
            if let Some((_, record)) = self.nodes.get_index_mut(node_index(edge.target)) {
                record.incoming.push(InEdge {
                    source: edge.source,
                    weight: edge.weight,
                });
            }
        }
    }

    fn record(&self, key: &str) -> Result<&NodeRecord, FnetError> {
        self.nodes
            .get(key)
            .ok_or_else(|| FnetError::unknown_node(key))
    }

    fn key_at(&self, id: NodeId) -> &str {
        self.nodes
            .get_index(node_index(id))
            .map(|(key, _)| key.as_str())
            .unwrap_or_default()
    }
}

impl Default for WeightedDirectedGraph {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

fn make_node(index: usize) -> NodeId {
    NodeId::from_raw(index as u32)
}

fn node_index(id: NodeId) -> usize {
    id.index()
}
