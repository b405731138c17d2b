//! Sweep configuration files.

pub mod config;

pub use config::{SweepConfig, list_cells, load_sweep_config, parse_sweep_config};
