//! The backend x benchmark x optimization sweep.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::backend::BackendRegistry;
use crate::core::{BackendDescriptor, BenchmarkDescriptor, OptimizationMode, ReportRow, StatSummary};
use crate::{BenchError, BenchResult};

use super::loader::BackendLoader;
use super::measure::measure;

/// The full measurement matrix, in declaration order.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    backends: BackendRegistry,
    benchmarks: Vec<BenchmarkDescriptor>,
    optimizations: Vec<OptimizationMode>,
}

impl SweepPlan {
    pub fn new(
        backends: BackendRegistry,
        benchmarks: Vec<BenchmarkDescriptor>,
        optimizations: Vec<OptimizationMode>,
    ) -> BenchResult<Self> {
        if backends.is_empty() {
            return Err(BenchError::Config("no backends declared".into()));
        }
        if benchmarks.is_empty() {
            return Err(BenchError::Config("no benchmarks declared".into()));
        }
        if optimizations.is_empty() {
            return Err(BenchError::Config("no optimization modes declared".into()));
        }
        ensure_unique("benchmark", benchmarks.iter().map(|b| b.name.as_str()))?;
        ensure_unique("optimization", optimizations.iter().map(|o| o.name.as_str()))?;
        Ok(SweepPlan {
            backends,
            benchmarks,
            optimizations,
        })
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    pub fn benchmarks(&self) -> &[BenchmarkDescriptor] {
        &self.benchmarks
    }

    pub fn optimizations(&self) -> &[OptimizationMode] {
        &self.optimizations
    }

    /// Number of rows a successful sweep produces.
    pub fn cell_count(&self) -> usize {
        self.backends.len() * self.benchmarks.len() * self.optimizations.len()
    }

    /// Cells in sweep order: backend outermost, optimization innermost.
    pub fn cells(&self) -> impl Iterator<Item = SweepCell<'_>> {
        self.backends.iter().flat_map(move |backend| {
            self.benchmarks.iter().flat_map(move |benchmark| {
                self.optimizations.iter().map(move |optimization| SweepCell {
                    backend,
                    benchmark,
                    optimization,
                })
            })
        })
    }
}

fn ensure_unique<'a>(kind: &'static str, names: impl Iterator<Item = &'a str>) -> BenchResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(BenchError::DuplicateIdentifier {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// One unit of measurement work.
#[derive(Debug, Clone, Copy)]
pub struct SweepCell<'a> {
    pub backend: &'a BackendDescriptor,
    pub benchmark: &'a BenchmarkDescriptor,
    pub optimization: &'a OptimizationMode,
}

impl SweepCell<'_> {
    /// `backend-benchmark-optimization`
    pub fn label(&self) -> String {
        format!(
            "{}-{}-{}",
            self.backend.name, self.benchmark.name, self.optimization.name
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    pub show_progress: bool,
}

#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub rows: usize,
    pub regexes_compiled: usize,
    pub elapsed: Duration,
}

/// Run every cell of `plan`, handing each finished row to `on_row` before
/// moving on. The first failure of any kind ends the sweep.
pub fn run_sweep<F>(
    plan: &SweepPlan,
    loader: &mut BackendLoader,
    options: SweepOptions,
    mut on_row: F,
) -> BenchResult<SweepSummary>
where
    F: FnMut(&ReportRow) -> BenchResult<()>,
{
    let started = Instant::now();
    let mut rows = 0usize;
    let mut regexes_compiled = 0usize;

    for cell in plan.cells() {
        info!(
            backend = %cell.backend.name,
            benchmark = %cell.benchmark.name,
            optimization = %cell.optimization.name,
            "measuring cell"
        );
        let row = run_cell(&cell, loader, options)?;
        regexes_compiled += row.regex_count;
        on_row(&row)?;
        rows += 1;
    }

    let elapsed = started.elapsed();
    info!(rows, regexes_compiled, elapsed_s = elapsed.as_secs_f64(), "sweep complete");
    Ok(SweepSummary {
        rows,
        regexes_compiled,
        elapsed,
    })
}

fn run_cell(
    cell: &SweepCell<'_>,
    loader: &mut BackendLoader,
    options: SweepOptions,
) -> BenchResult<ReportRow> {
    let patterns = cell.benchmark.load_patterns()?;
    if patterns.is_empty() {
        return Err(BenchError::EmptyBenchmark {
            name: cell.benchmark.name.clone(),
            path: cell.benchmark.path.clone(),
        });
    }
    debug!(
        path = %cell.benchmark.path.display(),
        regexes = patterns.len(),
        "read benchmark"
    );

    let progress = progress_bar(patterns.len(), &cell.label(), options.show_progress);
    let bound = loader.load(cell.backend)?;
    let outcome = measure(bound.compiler(), &patterns, cell.optimization.enabled, &progress);
    bound.unload();
    progress.finish_and_clear();

    let series = outcome.map_err(|f| BenchError::Compile {
        backend: cell.backend.name.clone(),
        benchmark: cell.benchmark.name.clone(),
        optimization: cell.optimization.name.clone(),
        index: f.index,
        pattern: f.pattern,
        cause: Box::new(f.cause),
    })?;

    Ok(ReportRow {
        backend: cell.backend.name.clone(),
        benchmark: cell.benchmark.name.clone(),
        optimization: cell.optimization.name.clone(),
        optimize: cell.optimization.enabled,
        regex_count: series.len(),
        time: StatSummary::from_samples(series.times())?,
        size: StatSummary::from_samples(series.sizes())?,
    })
}

fn progress_bar(len: usize, label: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(label.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendFactory, Compiler, MockCompiler, MockConfig, SearchPath,
    };

    struct MockFactory;

    impl BackendFactory for MockFactory {
        fn create(
            &self,
            descriptor: &BackendDescriptor,
            _search_path: &SearchPath,
        ) -> BenchResult<Box<dyn Compiler>> {
            let lines = if descriptor.name == "A" { 10 } else { 20 };
            Ok(Box::new(MockCompiler::new(
                MockConfig::new(descriptor.name.clone())
                    .with_lines(lines, lines / 2)
                    .fails_on("(unterminated["),
            )))
        }
    }

    fn write_bench(dir: &std::path::Path, name: &str, body: &str) -> BenchmarkDescriptor {
        let path = dir.join(format!("{name}.regex"));
        std::fs::write(&path, body).unwrap();
        BenchmarkDescriptor::new(name, path)
    }

    fn plan(benchmarks: Vec<BenchmarkDescriptor>, modes: Vec<OptimizationMode>) -> SweepPlan {
        let reg = BackendRegistry::new(vec![
            BackendDescriptor::command("A", "/opt/a"),
            BackendDescriptor::command("B", "/opt/b"),
        ])
        .unwrap();
        SweepPlan::new(reg, benchmarks, modes).unwrap()
    }

    #[test]
    fn test_cells_nested_declared_order() {
        let p = plan(
            vec![
                BenchmarkDescriptor::new("z", "z.regex"),
                BenchmarkDescriptor::new("a", "a.regex"),
            ],
            OptimizationMode::defaults(),
        );
        let labels: Vec<String> = p.cells().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "A-z-O0", "A-z-O1", "A-a-O0", "A-a-O1", "B-z-O0", "B-z-O1", "B-a-O0", "B-a-O1",
            ]
        );
        assert_eq!(p.cell_count(), 8);
    }

    #[test]
    fn test_two_backends_one_benchmark() {
        let dir = tempfile::tempdir().unwrap();
        let bench = write_bench(dir.path(), "tiny", "a|b\nc*\n");
        let p = plan(vec![bench], vec![OptimizationMode::new("O1", true)]);
        let mut loader = BackendLoader::with_factory(SearchPath::default(), Box::new(MockFactory));

        let mut rows = Vec::new();
        let summary = run_sweep(&p, &mut loader, SweepOptions::default(), |r| {
            rows.push(r.clone());
            Ok(())
        })
        .unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.regexes_compiled, 4);
        assert_eq!(rows[0].backend, "A");
        assert_eq!(rows[1].backend, "B");
        for row in &rows {
            assert_eq!(row.regex_count, 2);
            assert_eq!(row.optimization, "O1");
        }
        // optimized artifacts: A emits 5 lines, B emits 10
        assert_eq!(rows[0].size.sum, 10.0);
        assert_eq!(rows[1].size.mean, 10.0);
        assert!(loader.search_path().is_empty());
    }

    #[test]
    fn test_malformed_pattern_aborts_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let bench = write_bench(dir.path(), "bad", "(unterminated[\n");
        let p = plan(vec![bench], vec![OptimizationMode::new("O0", false)]);
        let mut loader = BackendLoader::with_factory(SearchPath::default(), Box::new(MockFactory));

        let mut rows = 0;
        let err = run_sweep(&p, &mut loader, SweepOptions::default(), |_| {
            rows += 1;
            Ok(())
        })
        .unwrap_err();

        assert_eq!(rows, 0);
        match err {
            BenchError::Compile { backend, index, pattern, .. } => {
                assert_eq!(backend, "A");
                assert_eq!(index, 0);
                assert_eq!(pattern, "(unterminated[");
            }
            other => panic!("unexpected error: {other}"),
        }
        // the failing cell still released its binding
        assert!(loader.search_path().is_empty());
    }

    #[test]
    fn test_empty_benchmark_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let bench = write_bench(dir.path(), "empty", "");
        let p = plan(vec![bench], vec![OptimizationMode::new("O0", false)]);
        let mut loader = BackendLoader::with_factory(SearchPath::default(), Box::new(MockFactory));
        let err = run_sweep(&p, &mut loader, SweepOptions::default(), |_| Ok(())).unwrap_err();
        assert!(matches!(err, BenchError::EmptyBenchmark { .. }));
    }

    #[test]
    fn test_plan_rejects_duplicate_benchmarks() {
        let reg = BackendRegistry::new(vec![BackendDescriptor::automata("A")]).unwrap();
        let err = SweepPlan::new(
            reg,
            vec![
                BenchmarkDescriptor::new("x", "x.regex"),
                BenchmarkDescriptor::new("x", "y.regex"),
            ],
            OptimizationMode::defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, BenchError::DuplicateIdentifier { kind: "benchmark", .. }));
    }
}
