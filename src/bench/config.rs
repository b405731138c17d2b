use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::backend::{BackendRegistry, SearchPath};
use crate::core::schema::{DEFAULT_OPTIMIZE_ARG, DEFAULT_PROGRAM, PATTERN_PLACEHOLDER};
use crate::core::{BackendDescriptor, BackendDriver, BenchmarkDescriptor, CommandDriver, OptimizationMode};
use crate::engine::SweepPlan;
use crate::{BenchError, BenchResult};

pub const DEFAULT_CONFIG: &str = "regex-bench.toml";
pub const DEFAULT_OUTPUT: &str = "all_compiletime_compilesize.csv";
pub const DEFAULT_CONFIRM_DELAY_SECS: u64 = 10;

/// A parsed sweep configuration file.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub plan: SweepPlan,
    pub output: PathBuf,
    pub jsonl: Option<PathBuf>,
    pub confirm_delay: Duration,
    pub search_path: SearchPath,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DriverKind {
    #[default]
    Command,
    Automata,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBackend {
    name: String,
    #[serde(default)]
    location: Option<PathBuf>,
    #[serde(default)]
    driver: DriverKind,
    #[serde(default)]
    program: Option<String>,
    #[serde(default)]
    args: Option<String>,
    #[serde(default)]
    optimize_arg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBenchmark {
    name: String,
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptimization {
    name: String,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSweepConfig {
    #[serde(default)]
    output: Option<PathBuf>,
    #[serde(default)]
    jsonl: Option<PathBuf>,
    #[serde(default)]
    confirm_delay_secs: Option<u64>,
    #[serde(default)]
    search_path: Vec<PathBuf>,
    #[serde(rename = "backend", default)]
    backends: Vec<RawBackend>,
    #[serde(rename = "benchmark", default)]
    benchmarks: Vec<RawBenchmark>,
    #[serde(rename = "optimization", default)]
    optimizations: Vec<RawOptimization>,
}

/// Load a sweep configuration. `.yaml`/`.yml` files are read as YAML,
/// anything else as TOML.
pub fn load_sweep_config(path: &Path) -> BenchResult<SweepConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| BenchError::Config(format!("{}: {e}", path.display())))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let raw: RawSweepConfig = if is_yaml {
        serde_yaml::from_str(&s).map_err(|e| BenchError::Config(format!("{}: {e}", path.display())))?
    } else {
        toml::from_str(&s).map_err(|e| BenchError::Config(format!("{}: {e}", path.display())))?
    };
    build(raw)
}

/// Parse a TOML sweep configuration from a string.
pub fn parse_sweep_config(toml_src: &str) -> BenchResult<SweepConfig> {
    let raw: RawSweepConfig =
        toml::from_str(toml_src).map_err(|e| BenchError::Config(e.to_string()))?;
    build(raw)
}

fn build(raw: RawSweepConfig) -> BenchResult<SweepConfig> {
    let backends = raw
        .backends
        .into_iter()
        .map(backend_descriptor)
        .collect::<BenchResult<Vec<_>>>()?;
    let benchmarks = raw
        .benchmarks
        .into_iter()
        .map(|b| BenchmarkDescriptor::new(b.name, b.path))
        .collect();
    let optimizations = if raw.optimizations.is_empty() {
        OptimizationMode::defaults()
    } else {
        raw.optimizations
            .into_iter()
            .map(|o| OptimizationMode::new(o.name, o.enabled))
            .collect()
    };

    let plan = SweepPlan::new(BackendRegistry::new(backends)?, benchmarks, optimizations)?;
    Ok(SweepConfig {
        plan,
        output: raw.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        jsonl: raw.jsonl,
        confirm_delay: Duration::from_secs(
            raw.confirm_delay_secs.unwrap_or(DEFAULT_CONFIRM_DELAY_SECS),
        ),
        search_path: SearchPath::new(raw.search_path),
    })
}

fn backend_descriptor(raw: RawBackend) -> BenchResult<BackendDescriptor> {
    let driver = match raw.driver {
        DriverKind::Command => {
            let args = match raw.args {
                Some(template) => shlex::split(&template).ok_or_else(|| {
                    BenchError::Config(format!(
                        "backend '{}': cannot parse args template '{template}'",
                        raw.name
                    ))
                })?,
                None => CommandDriver::default().args,
            };
            if !args.iter().any(|a| a.contains(PATTERN_PLACEHOLDER)) {
                return Err(BenchError::Config(format!(
                    "backend '{}': args template must contain {PATTERN_PLACEHOLDER}",
                    raw.name
                )));
            }
            BackendDriver::Command(CommandDriver {
                program: raw.program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
                args,
                optimize_arg: raw
                    .optimize_arg
                    .unwrap_or_else(|| DEFAULT_OPTIMIZE_ARG.to_string()),
            })
        }
        DriverKind::Automata => {
            if raw.program.is_some() || raw.args.is_some() || raw.optimize_arg.is_some() {
                warn!(backend = %raw.name, "program/args/optimize_arg are ignored by the automata driver");
            }
            BackendDriver::Automata
        }
    };
    Ok(BackendDescriptor {
        name: raw.name,
        location: raw.location,
        driver,
    })
}

/// Describe the planned cells without touching any file.
pub fn list_cells(config: &SweepConfig) -> Vec<String> {
    config.plan.cells().map(|c| c.label()).collect()
}
