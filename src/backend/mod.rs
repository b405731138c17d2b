//! Backend abstraction for regex compilers under test.
//!
//! Every backend implements the single-method `Compiler` trait. Descriptors
//! declared in the sweep configuration live in the `BackendRegistry`; the
//! `BackendFactory` turns one into a live compiler when the loader binds it.

pub mod automata;
pub mod command;
pub mod mock;
pub mod registry;
pub mod search_path;
pub mod traits;

// Re-export key types
pub use automata::AutomataCompiler;
pub use command::CommandCompiler;
pub use mock::{MockCompiler, MockConfig};
pub use registry::{BackendFactory, BackendRegistry, DriverFactory};
pub use search_path::SearchPath;
pub use traits::{Compiler, artifact_lines};
