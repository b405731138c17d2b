//! Descriptors for the sweep matrix and the report row schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::stats::StatSummary;
use crate::{BenchError, BenchResult};

/// Program name looked up on the search path when a command backend names none.
pub const DEFAULT_PROGRAM: &str = "re2compiler";
/// Argument passed to command backends when optimization is enabled.
pub const DEFAULT_OPTIMIZE_ARG: &str = "--O1";
/// Token replaced by the regex pattern in a command template.
pub const PATTERN_PLACEHOLDER: &str = "{pattern}";
/// Token replaced by the optimize argument, or dropped when optimization is off.
pub const OPTIMIZE_PLACEHOLDER: &str = "{optimize}";

/// How a backend descriptor is turned into a live compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendDriver {
    /// External executable found on the loader search path.
    Command(CommandDriver),
    /// In-process dense DFA compiler.
    Automata,
}

impl BackendDriver {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendDriver::Command(_) => "command",
            BackendDriver::Automata => "automata",
        }
    }
}

/// Invocation details for an external compiler executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDriver {
    pub program: String,
    /// Argument template, already split into argv tokens.
    pub args: Vec<String>,
    pub optimize_arg: String,
}

impl Default for CommandDriver {
    fn default() -> Self {
        CommandDriver {
            program: DEFAULT_PROGRAM.to_string(),
            args: vec![
                OPTIMIZE_PLACEHOLDER.to_string(),
                PATTERN_PLACEHOLDER.to_string(),
            ],
            optimize_arg: DEFAULT_OPTIMIZE_ARG.to_string(),
        }
    }
}

impl CommandDriver {
    /// Expand the template for one compilation. The pattern always stays a
    /// single argv element, whatever it contains.
    pub fn expand_args(&self, pattern: &str, optimize: bool) -> Vec<String> {
        let opt = if optimize { self.optimize_arg.as_str() } else { "" };
        let mut out = Vec::with_capacity(self.args.len());
        for tok in &self.args {
            if tok == OPTIMIZE_PLACEHOLDER {
                if optimize {
                    out.push(self.optimize_arg.clone());
                }
            } else if tok == PATTERN_PLACEHOLDER {
                out.push(pattern.to_string());
            } else {
                out.push(
                    tok.replace(OPTIMIZE_PLACEHOLDER, opt)
                        .replace(PATTERN_PLACEHOLDER, pattern),
                );
            }
        }
        out
    }
}

/// A backend under test: identifier, where it lives, and how to drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub name: String,
    pub location: Option<PathBuf>,
    pub driver: BackendDriver,
}

impl BackendDescriptor {
    pub fn command(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        BackendDescriptor {
            name: name.into(),
            location: Some(location.into()),
            driver: BackendDriver::Command(CommandDriver::default()),
        }
    }

    pub fn automata(name: impl Into<String>) -> Self {
        BackendDescriptor {
            name: name.into(),
            location: None,
            driver: BackendDriver::Automata,
        }
    }
}

/// A benchmark regex set: one pattern per line in `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkDescriptor {
    pub name: String,
    pub path: PathBuf,
}

impl BenchmarkDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        BenchmarkDescriptor {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Read the patterns in file order.
    pub fn load_patterns(&self) -> BenchResult<Vec<String>> {
        read_patterns(&self.path)
    }
}

/// Read a one-pattern-per-line file. Line terminators are stripped; blank
/// lines are kept as empty patterns.
pub fn read_patterns(path: &Path) -> BenchResult<Vec<String>> {
    let s = std::fs::read_to_string(path).map_err(|e| {
        BenchError::Message(format!("failed to read {}: {e}", path.display()))
    })?;
    Ok(s.lines().map(str::to_string).collect())
}

/// Named optimization setting passed through to every compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationMode {
    pub name: String,
    pub enabled: bool,
}

impl OptimizationMode {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        OptimizationMode {
            name: name.into(),
            enabled,
        }
    }

    /// `O0` (off) then `O1` (on).
    pub fn defaults() -> Vec<OptimizationMode> {
        vec![
            OptimizationMode::new("O0", false),
            OptimizationMode::new("O1", true),
        ]
    }
}

/// One line of the sweep report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub backend: String,
    pub benchmark: String,
    pub optimization: String,
    pub optimize: bool,
    pub regex_count: usize,
    /// Seconds per compilation
    pub time: StatSummary,
    /// Artifact lines per compilation
    pub size: StatSummary,
}
