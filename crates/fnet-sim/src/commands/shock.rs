use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use fnet_debtrank::apply_shock;
use serde_json::json;
use tracing::warn;

use super::load_run_config;
use crate::bundle::Bundle;
use crate::write_json;

#[derive(Args, Debug)]
pub struct ShockArgs {
    /// JSON network bundle (node table, exposure matrix, optional relevance).
    #[arg(long)]
    pub input: PathBuf,
    /// Node to shock; repeat for several nodes.
    #[arg(long = "node", value_name = "KEY", required = true)]
    pub nodes: Vec<String>,
    /// Initial distress level of the shocked nodes, in (0, 1].
    #[arg(long, default_value_t = 1.0)]
    pub level: f64,
    /// Output directory for `shock.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &ShockArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let config = load_run_config(args.config.as_deref())?;
    let mut graph = Bundle::load(&args.input)?.into_graph()?;
    let relevance = graph.relevance_map();

    let outcome = apply_shock(
        &mut graph,
        args.nodes.as_slice(),
        args.level,
        &relevance,
        &config.propagation_params(),
    )?;
    if !outcome.converged() {
        warn!(termination = ?outcome.termination, "shock run did not converge");
    }

    let report = json!({
        "input": args.input.display().to_string(),
        "shocked": args.nodes,
        "level": args.level,
        "impact": outcome.impact,
        "baseline": outcome.baseline,
        "rounds": outcome.rounds,
        "termination": outcome.termination,
        "nodes": outcome.final_state,
    });
    write_json(args.out.join("shock.json"), &report)?;
    Ok(())
}
