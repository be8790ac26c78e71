#![deny(missing_docs)]

//! DebtRank distress propagation over weighted exposure networks.
//!
//! A run shocks a set of nodes and lets distress flow along incoming
//! exposures in synchronous rounds. Every node transmits its distress once:
//! it moves from undistressed to distressed when first reached and becomes
//! inactive the round after. The run reports the relevance-weighted increase
//! of system distress over the initial shock.
//!
//! Centrality repeats the run once per node and stores the impact on the
//! graph. A shock what-if stores every node's final level instead.

mod cancel;
mod centrality;
mod config;
mod propagate;
mod relevance;
mod shock;
mod state;

pub use cancel::CancelToken;
pub use centrality::{
    centrality_scores, compute_centrality, compute_centrality_from_attributes, CentralityOpts,
};
pub use config::RunConfig;
pub use propagate::{
    run, run_cancellable, PropagationOutcome, PropagationParams, Propagator, Termination,
    DEFAULT_MAX_ITERATIONS, DEFAULT_PARALLEL_THRESHOLD,
};
pub use relevance::RelevanceWeights;
pub use shock::{apply_shock, clear_induced_stress};
pub use state::{DistressStatus, NodeDistress};
