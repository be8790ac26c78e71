use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use fnet_core::NetworkKind;
use fnet_graph::{
    AttributeValue, ExposureMatrix, NetworkConfig, NodeAttribute, NodeTable, WeightedDirectedGraph,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Exposure matrix as it appears in a bundle; cells may be numbers or numeric strings.
#[derive(Debug, Deserialize)]
pub struct WeightsFile {
    pub keys: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Network bundle handed over by the data-loading side.
#[derive(Debug, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub zero_self_loops: bool,
    pub attribute_names: Vec<String>,
    pub nodes: NodeTable,
    pub weights: WeightsFile,
    #[serde(default)]
    pub relevance: BTreeMap<String, f64>,
}

impl Bundle {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Builds the graph and stores the bundle's relevance on its nodes.
    pub fn into_graph(self) -> Result<WeightedDirectedGraph, Box<dyn Error>> {
        let kind = match &self.kind {
            Some(kind) => kind.parse::<NetworkKind>()?,
            None => NetworkKind::default(),
        };
        let config = NetworkConfig {
            zero_self_loops: self.zero_self_loops,
            ..NetworkConfig::for_kind(kind)
        };
        let attribute_names = self
            .attribute_names
            .iter()
            .map(|name| name.parse::<NodeAttribute>())
            .collect::<Result<Vec<_>, _>>()?;
        let weights = ExposureMatrix::from_json_rows(self.weights.keys, &self.weights.rows)?;

        let mut graph =
            WeightedDirectedGraph::from_exposures(&self.nodes, &weights, &attribute_names, config)?;
        // keys outside the network carry no weight in a run
        let relevance: Vec<_> = self
            .relevance
            .iter()
            .filter(|(key, _)| graph.contains(key))
            .map(|(key, value)| (key.as_str(), AttributeValue::Number(*value)))
            .collect();
        graph.set_attribute_map(NodeAttribute::Relevance, relevance)?;
        info!(
            kind = %graph.kind(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded network bundle"
        );
        Ok(graph)
    }
}
