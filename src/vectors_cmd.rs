//! Functional test vectors: every (input, regex) pair with the expected match
//! result, plus each regex compiled once by a backend.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::backend::{AutomataCompiler, Compiler};
use crate::bench::load_sweep_config;
use crate::core::read_patterns;
use crate::engine::BackendLoader;
use crate::{BenchError, BenchResult};

pub const COMPILED_DIR: &str = "compiled_regexes";
pub const TEST_DATA_FILE: &str = "test_data.csv";

#[derive(Debug, Clone, Default)]
pub struct VectorsArgs {
    pub inputs: PathBuf,
    pub regexes: PathBuf,
    pub out_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub backend: Option<String>,
    pub optimize: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorSummary {
    pub compiled: usize,
    pub rows: usize,
    pub matches: usize,
}

pub fn run(args: VectorsArgs) -> BenchResult<()> {
    let inputs = read_patterns(&args.inputs)?;
    let regexes = read_patterns(&args.regexes)?;

    let summary = match (&args.config, &args.backend) {
        (Some(config), Some(name)) => {
            let cfg = load_sweep_config(config)?;
            let descriptor = cfg.plan.backends().get(name)?;
            let mut loader = BackendLoader::new(cfg.search_path.clone());
            let bound = loader.load(descriptor)?;
            generate(bound.compiler(), &inputs, &regexes, &args.out_dir, args.optimize)?
        }
        (None, Some(name)) => {
            return Err(BenchError::Config(format!(
                "--backend {name} needs --config to describe it"
            )));
        }
        _ => {
            let compiler = AutomataCompiler::new("automata");
            generate(&compiler, &inputs, &regexes, &args.out_dir, args.optimize)?
        }
    };

    println!(
        "Wrote {} compiled regexes and {} test rows ({} matching) to {}",
        summary.compiled,
        summary.rows,
        summary.matches,
        args.out_dir.display()
    );
    Ok(())
}

/// Compile each regex into `out_dir/compiled_regexes/regex_{i}.txt` and
/// write `out_dir/test_data.csv` in input-major order.
///
/// Every regex is parsed by the reference matcher before anything is written.
pub fn generate(
    compiler: &dyn Compiler,
    inputs: &[String],
    regexes: &[String],
    out_dir: &Path,
    optimize: bool,
) -> BenchResult<VectorSummary> {
    let matchers = regexes
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Regex::new(r).map_err(|e| {
                BenchError::Message(format!("regex #{i} \"{r}\" is not a valid reference pattern: {e}"))
            })
        })
        .collect::<BenchResult<Vec<_>>>()?;

    let compiled_dir = out_dir.join(COMPILED_DIR);
    std::fs::create_dir_all(&compiled_dir)?;
    for (i, r) in regexes.iter().enumerate() {
        let artifact = compiler.compile(r, optimize).map_err(|e| BenchError::Message(format!(
            "backend '{}' failed on regex #{i} \"{r}\": {e}",
            compiler.name()
        )))?;
        std::fs::write(compiled_dir.join(regex_file_name(i)), artifact)?;
        debug!(index = i, "compiled regex");
    }

    let mut writer = csv::Writer::from_path(out_dir.join(TEST_DATA_FILE))?;
    writer.write_record(["input", "regex_file", "output"])?;
    let mut rows = 0usize;
    let mut matches = 0usize;
    for input in inputs {
        for (i, m) in matchers.iter().enumerate() {
            let hit = m.is_match(input);
            matches += usize::from(hit);
            writer.write_record([
                input.as_str(),
                regex_file_name(i).as_str(),
                if hit { "true" } else { "false" },
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    info!(compiled = regexes.len(), rows, matches, "generated test vectors");
    Ok(VectorSummary {
        compiled: regexes.len(),
        rows,
        matches,
    })
}

fn regex_file_name(i: usize) -> String {
    format!("regex_{i}.txt")
}
