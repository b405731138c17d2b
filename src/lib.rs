pub mod backend;
pub mod bench;
pub mod core;
pub mod engine;
pub mod storage;

pub mod check_cmd;
pub mod list_cmd;
pub mod sweep_cmd;
pub mod vectors_cmd;

use std::path::PathBuf;

use thiserror::Error;

/// Exit status used when the operator cancels during the confirmation delay.
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("{0}")]
    Message(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("benchmark '{name}': file {} does not exist", path.display())]
    MissingBenchmark { name: String, path: PathBuf },
    #[error("benchmark '{name}': file {} contains no regexes", path.display())]
    EmptyBenchmark { name: String, path: PathBuf },
    #[error("unknown backend '{0}'")]
    UnknownBackend(String),
    #[error("duplicate {kind} identifier '{name}'")]
    DuplicateIdentifier { kind: &'static str, name: String },
    #[error("could not load backend '{backend}': {reason}")]
    BackendUnavailable { backend: String, reason: String },
    #[error(
        "error while compiling regex #{index} \"{pattern}\" \
         (backend={backend} benchmark={benchmark} optimization={optimization}): {cause}"
    )]
    Compile {
        backend: String,
        benchmark: String,
        optimization: String,
        index: usize,
        pattern: String,
        cause: Box<BenchError>,
    },
    #[error("cannot summarize an empty sample series")]
    EmptySeries,
    #[error("cancelled by operator")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::Cancelled => EXIT_CANCELLED,
            _ => 1,
        }
    }
}

pub type BenchResult<T> = Result<T, BenchError>;

pub(crate) fn now_string() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".to_string())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha256::digest;
    digest(bytes)
}
