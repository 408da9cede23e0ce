//! Computation provider traits and the `ScriptProvider` decorator.
//!
//! `ComputationProvider` is the public trait consumed by the dispatch gateway.
//! `Solver` is the internal trait implemented by single-argument modules.
//! `ScriptProvider` is a decorator that exposes a `Solver` as a provider with
//! a `main` entry point accepting zero or one argument.

use std::sync::Arc;

use crate::progress::CancellationToken;

/// Error type raised by computation providers.
///
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputationError {
    /// The input text could not be interpreted.
    #[error("{0}")]
    InvalidInput(String),

    /// The value is mathematically undefined (division by zero, domain error).
    #[error("{0}")]
    Undefined(String),

    /// The input is well-formed but outside what the provider handles.
    #[error("{0}")]
    Unsupported(String),

    /// Computation was cancelled.
    #[error("computation cancelled")]
    Cancelled,

    /// Computation ran past its deadline.
    #[error("computation timed out")]
    TimedOut,
}

impl ComputationError {
    /// Shorthand for an `InvalidInput` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Public trait for computation providers, consumed by the dispatch gateway.
pub trait ComputationProvider: Send + Sync {
    /// Module id this provider answers to.
    fn name(&self) -> &str;

    /// Whether the provider exposes a `main` entry point.
    fn has_main(&self) -> bool {
        true
    }

    /// Invoke `main` with the given positional arguments.
    fn call_main(&self, args: &[&str], cancel: &CancellationToken)
        -> Result<String, ComputationError>;
}

/// Internal trait for modules taking at most one text argument.
/// Wrapped by `ScriptProvider` which adds arity checks.
pub trait Solver: Send + Sync {
    /// Solve for the given input (`None` when called without arguments).
    fn solve(&self, input: Option<&str>, cancel: &CancellationToken)
        -> Result<String, ComputationError>;

    /// Module id of this solver.
    fn name(&self) -> &'static str;
}

/// Decorator that exposes a `Solver` through the `main` entry point.
pub struct ScriptProvider {
    inner: Arc<dyn Solver>,
}

impl ScriptProvider {
    /// Create a new `ScriptProvider` wrapping the given solver.
    #[must_use]
    pub fn new(inner: Arc<dyn Solver>) -> Self {
        Self { inner }
    }
}

impl ComputationProvider for ScriptProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call_main(
        &self,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        if args.len() > 1 {
            return Err(ComputationError::invalid(format!(
                "main() takes at most 1 argument ({} given)",
                args.len()
            )));
        }
        cancel.check_cancelled()?;
        self.inner.solve(args.first().map(|s| s.trim()), cancel)
    }
}
