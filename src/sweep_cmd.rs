use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::bench::{SweepConfig, load_sweep_config};
use crate::core::EnvironmentInfo;
use crate::engine::{BackendLoader, PreflightReport, SweepGuard, SweepOptions, preflight, run_sweep};
use crate::storage::{JsonlWriter, ReportWriter, RunRecord};
use crate::{BenchResult, now_string, sha256_hex};

/// Overrides taken from the command line; `None` keeps the config value.
#[derive(Debug, Clone, Default)]
pub struct SweepArgs {
    pub config: PathBuf,
    pub output: Option<PathBuf>,
    pub jsonl: Option<PathBuf>,
    pub delay_secs: Option<u64>,
    pub yes: bool,
    pub progress: bool,
}

pub fn run(args: SweepArgs, guard: &SweepGuard) -> BenchResult<()> {
    let mut cfg = load_sweep_config(&args.config)?;
    if let Some(o) = args.output {
        cfg.output = o;
    }
    if args.jsonl.is_some() {
        cfg.jsonl = args.jsonl;
    }
    if let Some(d) = args.delay_secs {
        cfg.confirm_delay = Duration::from_secs(d);
    }
    if args.yes {
        cfg.confirm_delay = Duration::ZERO;
    }

    let mut loader = BackendLoader::new(cfg.search_path.clone());
    let report = preflight(&cfg.plan, &mut loader)?;
    print_plan(&cfg, &report);

    if !cfg.confirm_delay.is_zero() {
        println!(
            "Starting in {}s, press Ctrl-C to abort.",
            cfg.confirm_delay.as_secs()
        );
        guard.countdown(cfg.confirm_delay)?;
    }
    guard.begin_sweep()?;

    let mut csv = ReportWriter::create(&cfg.output)?;
    let mut provenance = match &cfg.jsonl {
        Some(path) => Some(Provenance::new(&cfg, JsonlWriter::create(path)?)),
        None => None,
    };

    let summary = run_sweep(
        &cfg.plan,
        &mut loader,
        SweepOptions { show_progress: args.progress },
        |row| {
            csv.write_row(row)?;
            if let Some(p) = provenance.as_mut() {
                p.record(row)?;
            }
            Ok(())
        },
    )?;

    println!(
        "Measured {} cells ({} regexes) in {:.1}s -> {}",
        summary.rows,
        summary.regexes_compiled,
        summary.elapsed.as_secs_f64(),
        cfg.output.display()
    );
    if let Some(p) = provenance {
        info!(path = %p.writer.path().display(), "wrote run records");
    }
    Ok(())
}

pub(crate) fn print_plan(cfg: &SweepConfig, report: &PreflightReport) {
    println!("Benchmarks:");
    for (name, count) in &report.benchmarks {
        println!("  {name} ({count} regexes)");
    }
    println!("Compilers:");
    for name in &report.backends {
        println!("  {name}");
    }
    println!("Optimizations:");
    for o in cfg.plan.optimizations() {
        println!("  {} ({})", o.name, if o.enabled { "on" } else { "off" });
    }
    println!("Cells: {}", cfg.plan.cell_count());
    println!("Output: {}", cfg.output.display());
}

struct Provenance {
    writer: JsonlWriter,
    env: EnvironmentInfo,
    digests: HashMap<String, String>,
}

impl Provenance {
    fn new(cfg: &SweepConfig, writer: JsonlWriter) -> Self {
        let mut digests = HashMap::new();
        for b in cfg.plan.benchmarks() {
            match std::fs::read(&b.path) {
                Ok(bytes) => {
                    digests.insert(b.name.clone(), sha256_hex(&bytes));
                }
                Err(e) => warn!(benchmark = %b.name, "cannot hash benchmark: {e}"),
            }
        }
        Provenance {
            writer,
            env: EnvironmentInfo::detect(),
            digests,
        }
    }

    fn record(&mut self, row: &crate::core::ReportRow) -> BenchResult<()> {
        let record = RunRecord {
            timestamp: now_string(),
            row: row.clone(),
            benchmark_sha256: self.digests.get(&row.benchmark).cloned(),
            env: self.env.clone(),
        };
        self.writer.append(&record)
    }
}
