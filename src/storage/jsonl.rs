//! JSONL (JSON Lines) run provenance: one record per sweep row.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{EnvironmentInfo, ReportRow};
use crate::{BenchError, BenchResult};

/// A report row plus the context needed to reproduce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// ISO 8601 timestamp
    pub timestamp: String,
    #[serde(flatten)]
    pub row: ReportRow,
    /// sha256 of the benchmark file the row was measured on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_sha256: Option<String>,
    pub env: EnvironmentInfo,
}

/// Writer for run records. The file is truncated when the writer is created.
#[derive(Debug)]
pub struct JsonlWriter {
    path: PathBuf,
    file: File,
}

impl JsonlWriter {
    pub fn create(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BenchError::Message(format!("failed to create directory: {e}")))?;
            }
        }
        let file = File::create(&path)
            .map_err(|e| BenchError::Message(format!("failed to open file: {e}")))?;
        Ok(JsonlWriter { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, record: &RunRecord) -> BenchResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Read every record of a JSONL file, skipping blank lines.
pub fn read_records(path: &Path) -> BenchResult<Vec<RunRecord>> {
    let file = File::open(path)
        .map_err(|e| BenchError::Message(format!("failed to open {}: {e}", path.display())))?;
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let rec = serde_json::from_str(&line).map_err(|e| {
            BenchError::Message(format!("failed to parse line {}: {e}", idx + 1))
        })?;
        out.push(rec);
    }
    Ok(out)
}
