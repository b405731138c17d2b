//! Backend that shells out to an external compiler executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::CommandDriver;
use crate::{BenchError, BenchResult};

use super::traits::Compiler;

/// External compiler invoked once per pattern.
///
/// The program prints the artifact on stdout and exits non-zero when the
/// pattern cannot be compiled.
pub struct CommandCompiler {
    name: String,
    program: PathBuf,
    driver: CommandDriver,
}

impl CommandCompiler {
    /// Create a compiler for an already resolved program path.
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, driver: CommandDriver) -> Self {
        CommandCompiler {
            name: name.into(),
            program: program.into(),
            driver,
        }
    }

    /// Path of the executable being run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn build_command(&self, pattern: &str, optimize: bool) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.driver.expand_args(pattern, optimize));
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Compiler for CommandCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, pattern: &str, optimize: bool) -> BenchResult<String> {
        let output = self.build_command(pattern, optimize).output().map_err(|e| {
            BenchError::Message(format!("failed to run {}: {e}", self.program.display()))
        })?;
        if !output.status.success() {
            return Err(BenchError::Message(format!(
                "{} failed: status={} stderr={}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
