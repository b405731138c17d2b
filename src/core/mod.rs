//! Core types for regex-hw-bench.
//!
//! Sweep descriptors, the report row schema and the statistics reducer.

pub mod env;
pub mod schema;
pub mod stats;

// Re-export key types for convenience
pub use env::EnvironmentInfo;
pub use schema::{
    BackendDescriptor, BackendDriver, BenchmarkDescriptor, CommandDriver, OptimizationMode,
    ReportRow, read_patterns,
};
pub use stats::{StatSummary, quartiles};
