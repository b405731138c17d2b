//! The compile capability every backend under test provides.

use crate::BenchResult;

/// A regex-to-automaton compiler.
///
/// Implementations are interchangeable: the harness only ever calls
/// `compile` and looks at the returned artifact text. Any error is treated
/// as a compilation failure for that pattern.
pub trait Compiler: Send + Sync {
    /// Returns the backend name as declared in the sweep configuration.
    fn name(&self) -> &str;

    /// Compile `pattern`, with the backend's optimizations on or off.
    ///
    /// # Returns
    /// The compiled artifact as text. Its newline count is the size metric.
    fn compile(&self, pattern: &str, optimize: bool) -> BenchResult<String>;
}

/// Size proxy for an artifact: the number of newline characters in it.
pub fn artifact_lines(artifact: &str) -> usize {
    artifact.bytes().filter(|b| *b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_lines_counts_newlines() {
        assert_eq!(artifact_lines(""), 0);
        assert_eq!(artifact_lines("jmp 1"), 0);
        assert_eq!(artifact_lines("a\nb\n"), 2);
        assert_eq!(artifact_lines("a\nb\nc"), 2);
    }
}
