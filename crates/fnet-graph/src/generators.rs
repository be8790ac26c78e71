use fnet_core::rng::RngHandle;
use fnet_core::FnetError;

use crate::attributes::{AttributeValue, NodeAttribute};
use crate::flags::NetworkConfig;
use crate::matrix::{ExposureMatrix, NodeTable};
use crate::network::WeightedDirectedGraph;

/// Generates a fully connected exposure network with weights drawn from `[low, high)`.
///
/// The diagonal is zero, matching what the data-loading side hands over.
pub fn gen_complete(
    n_nodes: usize,
    low: f64,
    high: f64,
    rng: &mut RngHandle,
) -> Result<WeightedDirectedGraph, FnetError> {
    check_range(low, high)?;
    gen_with(n_nodes, rng, |rng, i, j| {
        if i == j {
            0.0
        } else {
            rng.exposure_weight(low, high)
        }
    })
}

/// Generates a sparse exposure network where each off-diagonal entry is present
/// with probability `density` and weighted uniformly in `(0, max_weight)`.
pub fn gen_random_exposures(
    n_nodes: usize,
    density: f64,
    max_weight: f64,
    rng: &mut RngHandle,
) -> Result<WeightedDirectedGraph, FnetError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(
            FnetError::parameter("density-range", "density must lie in [0, 1]")
                .with_context("density", density),
        );
    }
    // weights are drawn from (0, max_weight), which must hold a positive float
    check_range(f64::EPSILON, max_weight)?;
    let config = NetworkConfig {
        keep_zero_weights: false,
        ..NetworkConfig::default()
    };
    let table = key_table(n_nodes)?;
    let keys: Vec<String> = table.keys().cloned().collect();
    let values: Vec<Vec<f64>> = (0..n_nodes)
        .map(|i| {
            (0..n_nodes)
                .map(|j| {
                    if i != j && rng.link_present(density) {
                        rng.exposure_weight(f64::EPSILON, max_weight)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();
    WeightedDirectedGraph::from_exposures(
        &table,
        &ExposureMatrix::square(keys, values),
        &[NodeAttribute::Name],
        config,
    )
}

/// Builds a chain `keys[0] -> keys[1] -> ...` where every link has `weight`.
pub fn gen_chain(keys: &[&str], weight: f64) -> Result<WeightedDirectedGraph, FnetError> {
    let mut table = NodeTable::new();
    for key in keys {
        table.insert(key.to_string(), vec![AttributeValue::from(*key)]);
    }
    let n = keys.len();
    let values: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j + 1 { weight } else { 0.0 })
                .collect()
        })
        .collect();
    let config = NetworkConfig {
        keep_zero_weights: false,
        ..NetworkConfig::default()
    };
    WeightedDirectedGraph::from_exposures(
        &table,
        &ExposureMatrix::square(keys.iter().map(|k| k.to_string()).collect(), values),
        &[NodeAttribute::Name],
        config,
    )
}

fn gen_with<F>(
    n_nodes: usize,
    rng: &mut RngHandle,
    mut weight: F,
) -> Result<WeightedDirectedGraph, FnetError>
where
    F: FnMut(&mut RngHandle, usize, usize) -> f64,
{
    let table = key_table(n_nodes)?;
    let keys: Vec<String> = table.keys().cloned().collect();
    let values: Vec<Vec<f64>> = (0..n_nodes)
        .map(|i| (0..n_nodes).map(|j| weight(rng, i, j)).collect())
        .collect();
    WeightedDirectedGraph::from_exposures(
        &table,
        &ExposureMatrix::square(keys, values),
        &[NodeAttribute::Name],
        NetworkConfig::default(),
    )
}

fn key_table(n_nodes: usize) -> Result<NodeTable, FnetError> {
    if n_nodes == 0 {
        return Err(FnetError::parameter(
            "empty-graph",
            "generator requires at least one node",
        ));
    }
    Ok((0..n_nodes)
        .map(|idx| {
            let key = format!("N{idx:04}");
            let name = AttributeValue::Text(format!("Node {idx}"));
            (key, vec![name])
        })
        .collect())
}

fn check_range(low: f64, high: f64) -> Result<(), FnetError> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(
            FnetError::parameter("weight-range", "weight range must be finite and non-empty")
                .with_context("low", low)
                .with_context("high", high),
        );
    }
    Ok(())
}
