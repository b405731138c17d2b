//! Report outputs for sweep rows.
//!
//! The CSV report is the primary artifact; JSONL run records add provenance.

pub mod csv;
pub mod jsonl;

// Re-export key types
pub use self::csv::{REPORT_HEADERS, ReportWriter};
pub use jsonl::{JsonlWriter, RunRecord, read_records};
