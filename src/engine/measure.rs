//! Per-regex timing and size instrumentation.

use std::time::Instant;

use indicatif::ProgressBar;

use crate::BenchError;
use crate::backend::{Compiler, artifact_lines};

/// Compile time and artifact size for every regex of one benchmark, in
/// benchmark order. Both series always have one entry per regex.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSeries {
    times: Vec<f64>,
    sizes: Vec<f64>,
}

impl MeasurementSeries {
    /// Seconds spent in `compile`, per regex.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Artifact line count, per regex.
    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// The regex that stopped a measurement run.
#[derive(Debug)]
pub struct CompileFailure {
    pub index: usize,
    pub pattern: String,
    pub cause: BenchError,
}

/// Compile each pattern in order and record elapsed time and artifact size.
///
/// Stops at the first failing pattern; no partial series is returned. The
/// progress bar is advanced outside the timed region.
pub fn measure(
    compiler: &dyn Compiler,
    patterns: &[String],
    optimize: bool,
    progress: &ProgressBar,
) -> Result<MeasurementSeries, CompileFailure> {
    let mut times = Vec::with_capacity(patterns.len());
    let mut sizes = Vec::with_capacity(patterns.len());

    for (index, pattern) in patterns.iter().enumerate() {
        let start = Instant::now();
        let compiled = compiler.compile(pattern, optimize);
        let elapsed = start.elapsed().as_secs_f64();

        let artifact = compiled.map_err(|cause| CompileFailure {
            index,
            pattern: pattern.clone(),
            cause,
        })?;
        times.push(elapsed);
        sizes.push(artifact_lines(&artifact) as f64);
        progress.inc(1);
    }

    Ok(MeasurementSeries { times, sizes })
}
