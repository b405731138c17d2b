//! Ordered directory list used to resolve backend programs.

use std::path::{Path, PathBuf};

/// Directories (or direct executable paths) searched for a backend program.
///
/// Later entries shadow earlier ones: the entry pushed by the backend
/// currently bound is looked at first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        SearchPath { entries }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: impl Into<PathBuf>) {
        self.entries.push(entry.into());
    }

    /// Drop every entry past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Find `program`, newest entry first. An entry matches when it is a
    /// file whose name is `program`, or a directory containing `program`.
    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.entries.iter().rev().find_map(|entry| resolve_in(entry, program))
    }
}

fn resolve_in(entry: &Path, program: &str) -> Option<PathBuf> {
    if entry.is_file() {
        return (entry.file_name()? == program).then(|| entry.to_path_buf());
    }
    let candidate = entry.join(program);
    candidate.is_file().then_some(candidate)
}
