//! Engine module: the sweep-and-measurement harness.
//!
//! # Architecture
//!
//! - **Loader** (`loader`): binds one backend at a time and guarantees it is
//!   released, restoring the search path.
//! - **Preflight** (`preflight`): confirms all benchmarks and backends before
//!   anything is timed.
//! - **Measurement** (`measure`): compiles each regex of a benchmark and
//!   records time and artifact size.
//! - **Sweep** (`sweep`): walks backend x benchmark x optimization and reduces
//!   each cell to a `ReportRow`.
//! - **Confirmation** (`confirm`): the cancellable delay before the sweep.
//!
//! Everything runs on one thread. Compile latency is the measured quantity,
//! so cells are never overlapped.

pub mod confirm;
pub mod loader;
pub mod measure;
pub mod preflight;
pub mod sweep;

// Re-export key types for convenience
pub use confirm::SweepGuard;
pub use loader::{BackendLoader, LoadedBackend};
pub use measure::{CompileFailure, MeasurementSeries, measure};
pub use preflight::{PROBE_PATTERN, PreflightReport, preflight};
pub use sweep::{SweepCell, SweepOptions, SweepPlan, SweepSummary, run_sweep};
