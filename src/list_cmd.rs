use std::path::PathBuf;

use crate::BenchResult;
use crate::bench::{list_cells, load_sweep_config};

/// Print the planned cells in sweep order.
pub fn run(config: PathBuf) -> BenchResult<()> {
    let cfg = load_sweep_config(&config)?;
    for label in list_cells(&cfg) {
        println!("{label}");
    }
    Ok(())
}
