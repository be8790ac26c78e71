use fnet_core::NodeId;
use fnet_graph::WeightedDirectedGraph;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-node status of a propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistressStatus {
    /// Not (yet) reached by the shock.
    Undistressed,
    /// Transmits its distress to its neighbours during the next round.
    Distressed,
    /// Has transmitted once; never transmits again.
    Inactive,
}

impl DistressStatus {
    /// Status for the next round given the level just computed for the node.
    pub fn advance(self, level: f64) -> Self {
        match self {
            DistressStatus::Distressed | DistressStatus::Inactive => DistressStatus::Inactive,
            DistressStatus::Undistressed if level > 0.0 => DistressStatus::Distressed,
            DistressStatus::Undistressed => DistressStatus::Undistressed,
        }
    }
}

/// Status and distress level of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDistress {
    /// Current status.
    pub status: DistressStatus,
    /// Distress level in `[0, 1]`.
    pub level: f64,
}

impl NodeDistress {
    pub(crate) const CALM: NodeDistress = NodeDistress {
        status: DistressStatus::Undistressed,
        level: 0.0,
    };
}

/// Scratch state of a single run, double buffered.
///
/// `current` is the frozen snapshot of the previous round; `next` is written
/// slot by slot and the two are swapped once every slot has been written.
#[derive(Debug, Clone)]
pub(crate) struct DistressState {
    current: Vec<NodeDistress>,
    next: Vec<NodeDistress>,
    distressed: usize,
}

impl DistressState {
    pub(crate) fn seeded(node_count: usize, seeds: &[NodeId], level: f64) -> Self {
        let mut current = vec![NodeDistress::CALM; node_count];
        for seed in seeds {
            current[seed.index()] = NodeDistress {
                status: DistressStatus::Distressed,
                level,
            };
        }
        let distressed = count_distressed(&current);
        Self {
            next: current.clone(),
            current,
            distressed,
        }
    }

    pub(crate) fn distressed(&self) -> usize {
        self.distressed
    }

    pub(crate) fn nodes(&self) -> &[NodeDistress] {
        &self.current
    }

    pub(crate) fn into_nodes(self) -> Vec<NodeDistress> {
        self.current
    }

    /// Advances one synchronous round.
    pub(crate) fn step(&mut self, graph: &WeightedDirectedGraph, parallel: bool) {
        let current = &self.current;
        let update = |(idx, slot): (usize, &mut NodeDistress)| {
            let previous = current[idx];
            let inflow: f64 = graph
                .incoming(NodeId::from_raw(idx as u32))
                .iter()
                .filter_map(|edge| {
                    let source = current[edge.source.index()];
                    (source.status == DistressStatus::Distressed)
                        .then(|| source.level * edge.weight)
                })
                .sum();
            let level = (previous.level + inflow).clamp(0.0, 1.0);
            *slot = NodeDistress {
                status: previous.status.advance(level),
                level,
            };
        };
        if parallel {
            self.next.par_iter_mut().enumerate().for_each(update);
        } else {
            self.next.iter_mut().enumerate().for_each(update);
        }
        std::mem::swap(&mut self.current, &mut self.next);
        self.distressed = count_distressed(&self.current);
    }
}

fn count_distressed(nodes: &[NodeDistress]) -> usize {
    nodes
        .iter()
        .filter(|node| node.status == DistressStatus::Distressed)
        .count()
}
