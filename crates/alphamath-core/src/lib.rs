//! # alphamath-core
//!
//! Core library for the AlphaMath calculator shell: the static module table,
//! the input-presence policy, the computation provider traits and the
//! built-in providers (number theory, polynomial and trigonometric tools).

pub mod algebra;
pub mod arith;
pub mod constants;
pub mod module;
pub mod progress;
pub mod provider;
pub mod providers;
pub mod registry;

// Re-exports
pub use constants::exit_codes;
pub use module::{requires_argument, ModuleDescriptor, ModuleId, ModuleRegistry};
pub use progress::CancellationToken;
pub use provider::{ComputationError, ComputationProvider, ScriptProvider, Solver};
pub use registry::{DefaultProviders, ProviderFactory};
