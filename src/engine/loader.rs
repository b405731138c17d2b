//! Exclusive binding of one backend at a time.
//!
//! `BackendLoader::load` extends the loader's search path with the backend
//! location and instantiates the compiler. The returned `LoadedBackend`
//! mutably borrows the loader, so a second backend cannot be bound while the
//! first is alive. Dropping the guard drops the compiler and restores the
//! search path, on success and error paths alike.

use std::ops::Deref;

use tracing::debug;

use crate::BenchResult;
use crate::backend::{BackendFactory, Compiler, DriverFactory, SearchPath};
use crate::core::BackendDescriptor;

pub struct BackendLoader {
    search_path: SearchPath,
    factory: Box<dyn BackendFactory>,
}

impl BackendLoader {
    /// Loader using the configurable drivers on top of `base`.
    pub fn new(base: SearchPath) -> Self {
        Self::with_factory(base, Box::new(DriverFactory))
    }

    pub fn with_factory(base: SearchPath, factory: Box<dyn BackendFactory>) -> Self {
        BackendLoader {
            search_path: base,
            factory,
        }
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Bind `descriptor`. The binding lasts as long as the returned guard.
    pub fn load(&mut self, descriptor: &BackendDescriptor) -> BenchResult<LoadedBackend<'_>> {
        let depth = self.search_path.len();
        if let Some(location) = &descriptor.location {
            self.search_path.push(location.clone());
        }

        match self.factory.create(descriptor, &self.search_path) {
            Ok(compiler) => {
                debug!(backend = %descriptor.name, driver = descriptor.driver.kind(), "loaded backend");
                Ok(LoadedBackend {
                    search_path: &mut self.search_path,
                    depth,
                    compiler: Some(compiler),
                })
            }
            Err(e) => {
                self.search_path.truncate(depth);
                Err(e)
            }
        }
    }
}

/// A bound backend. Derefs to the compiler.
pub struct LoadedBackend<'a> {
    search_path: &'a mut SearchPath,
    depth: usize,
    compiler: Option<Box<dyn Compiler>>,
}

impl LoadedBackend<'_> {
    pub fn compiler(&self) -> &dyn Compiler {
        &**self
    }

    /// Release the binding now rather than at end of scope.
    pub fn unload(self) {}
}

impl Deref for LoadedBackend<'_> {
    type Target = dyn Compiler;

    fn deref(&self) -> &Self::Target {
        match &self.compiler {
            Some(c) => c.as_ref(),
            None => unreachable!("compiler is only taken in drop"),
        }
    }
}

impl Drop for LoadedBackend<'_> {
    fn drop(&mut self) {
        if let Some(c) = self.compiler.take() {
            debug!(backend = %c.name(), "unloaded backend");
        }
        self.search_path.truncate(self.depth);
    }
}
