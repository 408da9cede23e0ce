//! Dispatch error taxonomy.

use serde::Serialize;

/// Every way a submission can fail. The `Display` text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No module is active.
    #[error("Please select a module first.")]
    NoModuleSelected,

    /// The module needs an argument and none was given.
    #[error("Error: Input is required for {module}.\nFormat: {hint}")]
    MissingArgument { module: String, hint: String },

    /// The id does not resolve to a provider.
    #[error("Error: Module '{0}' not found.")]
    NotFound(String),

    /// The provider exists but has no `main` entry point.
    #[error("Error: Module '{0}' does not have a main() function.")]
    NoEntryPoint(String),

    /// The provider reported an error.
    #[error("Error processing with {module}:\n{message}")]
    Computation { module: String, message: String },

    /// The submission was cancelled before the provider finished.
    #[error("Computation with {0} was cancelled.")]
    Cancelled(String),

    /// The submission ran past the configured timeout.
    #[error("Computation with {0} timed out.")]
    TimedOut(String),

    /// Rejected because another submission is still running.
    #[error("A computation with {0} is still running. Try again when it finishes.")]
    Busy(String),
}

/// Coarse error category, used for exit codes and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Selection,
    Validation,
    NotFound,
    EntryPointMissing,
    Computation,
    Cancelled,
    Timeout,
    Busy,
}

impl DispatchError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoModuleSelected => ErrorKind::Selection,
            Self::MissingArgument { .. } => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NoEntryPoint(_) => ErrorKind::EntryPointMissing,
            Self::Computation { .. } => ErrorKind::Computation,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::TimedOut(_) => ErrorKind::Timeout,
            Self::Busy(_) => ErrorKind::Busy,
        }
    }
}
