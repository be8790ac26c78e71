pub mod centrality;
pub mod shock;

use std::error::Error;
use std::path::Path;

use fnet_debtrank::RunConfig;

fn load_run_config(path: Option<&Path>) -> Result<RunConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(RunConfig::load(path)?),
        None => Ok(RunConfig::default()),
    }
}
