use std::fs;
use std::path::Path;

use fnet_core::FnetError;
use serde::{Deserialize, Serialize};

use crate::centrality::CentralityOpts;
use crate::propagate::{PropagationParams, DEFAULT_MAX_ITERATIONS, DEFAULT_PARALLEL_THRESHOLD};

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_initial_level() -> f64 {
    1.0
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

/// Run configuration read from YAML; every field may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Round cap of every propagation run.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Initial distress level of shocked nodes.
    #[serde(default = "default_initial_level")]
    pub initial_level: f64,
    /// Worker threads of the centrality pass; `0` lets rayon decide.
    #[serde(default)]
    pub concurrency: usize,
    /// Node count from which a round updates nodes in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            initial_level: default_initial_level(),
            concurrency: 0,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl RunConfig {
    /// Reads and validates a YAML run configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FnetError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            FnetError::serde("config-read", err).with_context("path", path.display())
        })?;
        Self::from_yaml_str(&contents).map_err(|err| err.with_context("path", path.display()))
    }

    /// Parses and validates a YAML run configuration.
    pub fn from_yaml_str(contents: &str) -> Result<Self, FnetError> {
        let config: RunConfig =
            serde_yaml::from_str(contents).map_err(|err| FnetError::serde("config-parse", err))?;
        config.propagation_params().validate()?;
        Ok(config)
    }

    /// Propagation parameters described by this configuration.
    pub fn propagation_params(&self) -> PropagationParams {
        PropagationParams {
            initial_level: self.initial_level,
            max_iterations: self.max_iterations,
            parallel_threshold: self.parallel_threshold,
        }
    }

    /// Centrality options described by this configuration.
    pub fn centrality_opts(&self) -> CentralityOpts {
        CentralityOpts {
            max_iterations: self.max_iterations,
            concurrency: self.concurrency,
            parallel_threshold: self.parallel_threshold,
        }
    }
}
