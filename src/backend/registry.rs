//! Declared backends and the factory that instantiates them.

use std::collections::HashSet;

use crate::core::{BackendDescriptor, BackendDriver};
use crate::{BenchError, BenchResult};

use super::automata::AutomataCompiler;
use super::command::CommandCompiler;
use super::search_path::SearchPath;
use super::traits::Compiler;

/// Backends in declaration order, keyed by unique name.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<BackendDescriptor>,
}

impl BackendRegistry {
    pub fn new(backends: Vec<BackendDescriptor>) -> BenchResult<Self> {
        let mut seen = HashSet::new();
        for b in &backends {
            if !seen.insert(b.name.as_str()) {
                return Err(BenchError::DuplicateIdentifier {
                    kind: "backend",
                    name: b.name.clone(),
                });
            }
        }
        Ok(BackendRegistry { backends })
    }

    pub fn get(&self, name: &str) -> BenchResult<&BackendDescriptor> {
        self.backends
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| BenchError::UnknownBackend(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BackendDescriptor> {
        self.backends.iter()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// Turns a descriptor into a live compiler, given the current search path.
pub trait BackendFactory {
    fn create(
        &self,
        descriptor: &BackendDescriptor,
        search_path: &SearchPath,
    ) -> BenchResult<Box<dyn Compiler>>;
}

/// Factory for the drivers configurable from a sweep file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverFactory;

impl BackendFactory for DriverFactory {
    fn create(
        &self,
        descriptor: &BackendDescriptor,
        search_path: &SearchPath,
    ) -> BenchResult<Box<dyn Compiler>> {
        match &descriptor.driver {
            BackendDriver::Command(driver) => {
                let program = search_path.resolve(&driver.program).ok_or_else(|| {
                    BenchError::BackendUnavailable {
                        backend: descriptor.name.clone(),
                        reason: format!(
                            "program '{}' not found in {}",
                            driver.program,
                            describe_location(descriptor)
                        ),
                    }
                })?;
                Ok(Box::new(CommandCompiler::new(
                    descriptor.name.clone(),
                    program,
                    driver.clone(),
                )))
            }
            BackendDriver::Automata => Ok(Box::new(AutomataCompiler::new(descriptor.name.clone()))),
        }
    }
}

fn describe_location(descriptor: &BackendDescriptor) -> String {
    match &descriptor.location {
        Some(p) => p.display().to_string(),
        None => "the base search path".to_string(),
    }
}
