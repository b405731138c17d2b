//! CSV sweep report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::ReportRow;
use crate::{BenchError, BenchResult};

/// CSV column headers in deterministic order.
pub const REPORT_HEADERS: [&str; 17] = [
    "Compiler",
    "Benchmark",
    "Optimization",
    "Compile time (avg)",
    "Compile time (min)",
    "Compile time (max)",
    "Compile time (25% quantile)",
    "Compile time (50% quantile)",
    "Compile time (75% quantile)",
    "Compile time (sum)",
    "Compile size (avg)",
    "Compile size (min)",
    "Compile size (max)",
    "Compile size (25% quantile)",
    "Compile size (50% quantile)",
    "Compile size (75% quantile)",
    "Compile size (sum)",
];

/// Writes one row per sweep cell, flushing after each so a failed run still
/// leaves every completed row on disk.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl ReportWriter<File> {
    /// Create (or truncate) the report at `output` and write the header.
    pub fn create(output: &Path) -> BenchResult<Self> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BenchError::Message(format!("failed to create directory: {e}")))?;
            }
        }
        let file = File::create(output).map_err(|e| {
            BenchError::Message(format!("failed to create {}: {e}", output.display()))
        })?;
        Self::from_writer(file)
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn from_writer(writer: W) -> BenchResult<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(REPORT_HEADERS)?;
        writer.flush()?;
        Ok(ReportWriter { writer })
    }

    pub fn write_row(&mut self, row: &ReportRow) -> BenchResult<()> {
        self.writer.write_record(row_to_record(row))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> BenchResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| BenchError::Message(format!("failed to flush CSV writer: {e}")))
    }
}

/// Identifiers, then time statistics, then size statistics.
fn row_to_record(row: &ReportRow) -> Vec<String> {
    let mut record = Vec::with_capacity(REPORT_HEADERS.len());
    record.push(row.backend.clone());
    record.push(row.benchmark.clone());
    record.push(row.optimization.clone());
    record.extend(row.time.columns().iter().map(|v| v.to_string()));
    record.extend(row.size.columns().iter().map(|v| v.to_string()));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StatSummary;

    fn row() -> ReportRow {
        ReportRow {
            backend: "c++".into(),
            benchmark: "brill4".into(),
            optimization: "O1".into(),
            optimize: true,
            regex_count: 4,
            time: StatSummary::from_samples(&[0.5, 0.25, 0.125, 0.125]).unwrap(),
            size: StatSummary::from_samples(&[10.0, 12.0, 14.0, 16.0]).unwrap(),
        }
    }

    #[test]
    fn test_header_names_each_field_once() {
        let mut seen = std::collections::HashSet::new();
        for h in REPORT_HEADERS {
            assert!(seen.insert(h), "duplicate header {h}");
        }
    }

    #[test]
    fn test_header_only_report() {
        let w = ReportWriter::from_writer(Vec::new()).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("Compiler,Benchmark,Optimization,Compile time (avg)"));
    }

    #[test]
    fn test_row_column_order() {
        let mut w = ReportWriter::from_writer(Vec::new()).unwrap();
        w.write_row(&row()).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let line = out.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "c++,brill4,O1,0.25,0.125,0.5,0.125,0.1875,0.4375,1,13,10,16,10.5,13,15.5,52"
        );
    }

    #[test]
    fn test_create_truncates_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.csv");
        {
            let mut w = ReportWriter::create(&path).unwrap();
            w.write_row(&row()).unwrap();
            w.write_row(&row()).unwrap();
        }
        ReportWriter::create(&path).unwrap();
        let s = std::fs::read_to_string(&path).unwrap();
        assert_eq!(s.lines().count(), 1);
    }
}
