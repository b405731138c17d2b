#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use regex_hw_bench::bench::config::DEFAULT_CONFIG;
use regex_hw_bench::engine::SweepGuard;
use regex_hw_bench::sweep_cmd::SweepArgs;
use regex_hw_bench::vectors_cmd::VectorsArgs;
use regex_hw_bench::{BenchResult, check_cmd, list_cmd, sweep_cmd, vectors_cmd};

#[derive(Parser, Debug)]
#[command(name = "regex-hw-bench")]
#[command(about = "Compile-time and compile-size sweep for regex-to-hardware compilers", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set REGEX_HW_BENCH_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Measure every backend x benchmark x optimization cell
    Sweep {
        /// Sweep configuration (TOML, or YAML by extension)
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
        /// CSV report path (overrides the config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write JSONL run records to this file
        #[arg(long)]
        jsonl: Option<PathBuf>,
        /// Confirmation delay in seconds before measuring
        #[arg(long)]
        delay: Option<u64>,
        /// Skip the confirmation delay
        #[arg(long, short = 'y')]
        yes: bool,
        /// Hide per-cell progress bars
        #[arg(long)]
        no_progress: bool,
    },

    /// Validate benchmarks and backends without measuring
    Check {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Print the planned cells in sweep order
    List {
        #[arg(long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Generate functional test vectors for a set of inputs and regexes
    Vectors {
        /// One input string per line
        #[arg(long)]
        inputs: PathBuf,
        /// One regex per line
        #[arg(long)]
        regexes: PathBuf,
        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,
        /// Sweep configuration describing --backend
        #[arg(long, requires = "backend")]
        config: Option<PathBuf>,
        /// Backend name from --config (default: in-process automata)
        #[arg(long)]
        backend: Option<String>,
        /// Compile with optimization enabled
        #[arg(long)]
        optimize: bool,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("REGEX_HW_BENCH_LOG").unwrap_or_else(|_| {
        if verbose { "regex_hw_bench=debug".to_string() } else { "regex_hw_bench=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn dispatch(command: Commands) -> BenchResult<()> {
    match command {
        Commands::Sweep { config, output, jsonl, delay, yes, no_progress } => {
            let guard = SweepGuard::new();
            guard.install_interrupt_handler()?;
            sweep_cmd::run(
                SweepArgs { config, output, jsonl, delay_secs: delay, yes, progress: !no_progress },
                &guard,
            )
        }
        Commands::Check { config } => check_cmd::run(config),
        Commands::List { config } => list_cmd::run(config),
        Commands::Vectors { inputs, regexes, out_dir, config, backend, optimize } => {
            vectors_cmd::run(VectorsArgs { inputs, regexes, out_dir, config, backend, optimize })
        }
    }
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("{:#}", e);
        std::process::exit(e.exit_code());
    }
}
