use std::path::PathBuf;

use crate::BenchResult;
use crate::bench::load_sweep_config;
use crate::engine::{BackendLoader, preflight};
use crate::sweep_cmd::print_plan;

/// Validate a sweep configuration without measuring or writing anything.
pub fn run(config: PathBuf) -> BenchResult<()> {
    let cfg = load_sweep_config(&config)?;
    let mut loader = BackendLoader::new(cfg.search_path.clone());
    let report = preflight(&cfg.plan, &mut loader)?;
    print_plan(&cfg, &report);
    println!("OK");
    Ok(())
}
