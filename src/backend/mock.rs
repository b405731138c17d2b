//! Mock backend for testing.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::{BenchError, BenchResult};

use super::traits::Compiler;

/// Configuration for mock compiler responses.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Name to report
    pub name: String,
    /// Artifact lines emitted per compilation with optimization off
    pub lines: usize,
    /// Artifact lines emitted per compilation with optimization on
    pub optimized_lines: usize,
    /// Patterns that fail to compile
    pub failing_patterns: HashSet<String>,
    /// Whether every compilation should fail
    pub always_fails: bool,
}

impl MockConfig {
    /// Create a new mock config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        MockConfig {
            name: name.into(),
            lines: 8,
            optimized_lines: 5,
            failing_patterns: HashSet::new(),
            always_fails: false,
        }
    }

    /// Set line counts for unoptimized and optimized artifacts.
    pub fn with_lines(mut self, lines: usize, optimized_lines: usize) -> Self {
        self.lines = lines;
        self.optimized_lines = optimized_lines;
        self
    }

    /// Make one pattern fail.
    pub fn fails_on(mut self, pattern: impl Into<String>) -> Self {
        self.failing_patterns.insert(pattern.into());
        self
    }

    /// Make every compilation fail.
    pub fn always_fails(mut self) -> Self {
        self.always_fails = true;
        self
    }
}

/// Mock compiler for unit testing.
///
/// Emits a fixed number of artifact lines and records every call, without
/// compiling anything.
pub struct MockCompiler {
    config: MockConfig,
    calls: Mutex<Vec<(String, bool)>>,
}

impl MockCompiler {
    pub fn new(config: MockConfig) -> Self {
        MockCompiler {
            config,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn default_mock() -> Self {
        Self::new(MockConfig::new("mock"))
    }

    /// (pattern, optimize) pairs seen so far, in call order.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Compiler for MockCompiler {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn compile(&self, pattern: &str, optimize: bool) -> BenchResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((pattern.to_string(), optimize));
        }
        if self.config.always_fails || self.config.failing_patterns.contains(pattern) {
            return Err(BenchError::Message(format!(
                "mock compile failed for '{pattern}'"
            )));
        }
        let n = if optimize {
            self.config.optimized_lines
        } else {
            self.config.lines
        };
        Ok("state\n".repeat(n))
    }
}
