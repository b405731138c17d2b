//! Validation of every benchmark and backend before timed work starts.

use tracing::{debug, info};

use crate::core::read_patterns;
use crate::{BenchError, BenchResult};

use super::loader::BackendLoader;
use super::sweep::SweepPlan;

/// Pattern every backend must compile, with optimization on, to pass.
pub const PROBE_PATTERN: &str = "this|that";

/// What preflight confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    /// (benchmark name, regex count) in declaration order
    pub benchmarks: Vec<(String, usize)>,
    /// Backend names that loaded and compiled the probe
    pub backends: Vec<String>,
}

/// Check the whole plan. All-or-nothing: the first problem is returned and
/// nothing is written anywhere.
///
/// Benchmarks are checked first: each file must exist and hold at least one
/// regex. Then each backend is bound in turn and must compile
/// [`PROBE_PATTERN`].
pub fn preflight(plan: &SweepPlan, loader: &mut BackendLoader) -> BenchResult<PreflightReport> {
    let mut benchmarks = Vec::with_capacity(plan.benchmarks().len());
    for b in plan.benchmarks() {
        if !b.path.is_file() {
            return Err(BenchError::MissingBenchmark {
                name: b.name.clone(),
                path: b.path.clone(),
            });
        }
        let count = read_patterns(&b.path)?.len();
        if count == 0 {
            return Err(BenchError::EmptyBenchmark {
                name: b.name.clone(),
                path: b.path.clone(),
            });
        }
        debug!(benchmark = %b.name, regexes = count, "benchmark ok");
        benchmarks.push((b.name.clone(), count));
    }

    let mut backends = Vec::with_capacity(plan.backends().len());
    for d in plan.backends().iter() {
        let bound = loader.load(d)?;
        bound
            .compile(PROBE_PATTERN, true)
            .map_err(|e| BenchError::BackendUnavailable {
                backend: d.name.clone(),
                reason: format!("probe compilation of '{PROBE_PATTERN}' failed: {e}"),
            })?;
        bound.unload();
        debug!(backend = %d.name, "backend ok");
        backends.push(d.name.clone());
    }

    info!(
        backends = backends.len(),
        benchmarks = benchmarks.len(),
        "preflight passed"
    );
    Ok(PreflightReport {
        benchmarks,
        backends,
    })
}
