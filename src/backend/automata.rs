//! In-process backend built on `regex-automata` dense DFAs.
//!
//! Useful as a reference point next to external compilers and as a backend
//! that needs nothing installed. Optimization maps to DFA minimization.

use regex_automata::dfa::dense;

use crate::{BenchError, BenchResult};

use super::traits::Compiler;

const DEFAULT_SIZE_LIMIT: usize = 64 * (1 << 20);

pub struct AutomataCompiler {
    name: String,
    size_limit: Option<usize>,
}

impl AutomataCompiler {
    pub fn new(name: impl Into<String>) -> Self {
        AutomataCompiler {
            name: name.into(),
            size_limit: Some(DEFAULT_SIZE_LIMIT),
        }
    }

    /// Cap on the DFA's heap size; exceeding it fails the compilation.
    pub fn with_size_limit(mut self, limit: Option<usize>) -> Self {
        self.size_limit = limit;
        self
    }
}

impl Compiler for AutomataCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, pattern: &str, optimize: bool) -> BenchResult<String> {
        let config = dense::Config::new()
            .minimize(optimize)
            .dfa_size_limit(self.size_limit);
        let dfa = dense::Builder::new()
            .configure(config)
            .build(pattern)
            .map_err(|e| BenchError::Message(e.to_string()))?;
        // One state per line
        Ok(format!("{dfa:?}\n"))
    }
}
