use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use fnet_debtrank::compute_centrality_from_attributes;
use fnet_graph::{canonical_hash, graph_to_json};
use serde_json::json;

use super::load_run_config;
use crate::bundle::Bundle;
use crate::write_json;

#[derive(Args, Debug)]
pub struct CentralityArgs {
    /// JSON network bundle (node table, exposure matrix, optional relevance).
    #[arg(long)]
    pub input: PathBuf,
    /// Output directory for `network.json` and `summary.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of highest ranked nodes listed in the summary.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

pub fn run(args: &CentralityArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let config = load_run_config(args.config.as_deref())?;
    let mut graph = Bundle::load(&args.input)?.into_graph()?;

    let scores = compute_centrality_from_attributes(&mut graph, &config.centrality_opts())?;
    fs::write(args.out.join("network.json"), graph_to_json(&graph)?)?;

    let mut ranked: Vec<(&String, &f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let top: Vec<_> = ranked
        .into_iter()
        .take(args.top)
        .map(|(key, score)| json!({ "node": key, "centrality": score }))
        .collect();

    let summary = json!({
        "input": args.input.display().to_string(),
        "kind": graph.kind().as_str(),
        "nodes": graph.node_count(),
        "edges": graph.edge_count(),
        "graph_hash": canonical_hash(&graph),
        "max_iterations": config.max_iterations,
        "top": top,
    });
    write_json(args.out.join("summary.json"), &summary)?;
    Ok(())
}
