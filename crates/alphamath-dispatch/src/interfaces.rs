//! Dispatch interfaces: requests, results and the presentation-side traits.

use alphamath_core::ComputationError;

use crate::error::DispatchError;

/// One user submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Module id; `None` or empty when nothing is selected.
    pub module_id: Option<String>,
    /// User input, possibly empty.
    pub argument: Option<String>,
    /// Optional mode passed as the provider's second argument.
    pub mode: Option<String>,
}

impl DispatchRequest {
    #[must_use]
    pub fn new(module_id: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            module_id: Some(module_id.into()),
            argument: Some(argument.into()),
            mode: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Trimmed module id, `None` when absent or blank.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trimmed argument, `None` when absent or blank.
    #[must_use]
    pub fn trimmed_argument(&self) -> Option<&str> {
        self.argument.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// What a background worker produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Success(String),
    NotFound(String),
    NoEntryPoint(String),
    Failure(ComputationError),
    Panicked(String),
}

impl DispatchResult {
    /// Convert into the outcome delivered to the callback.
    ///
    /// Only the provider's own cancellation errors become `Cancelled` or
    /// `TimedOut`; any other failure keeps its message.
    #[must_use]
    pub fn into_outcome(self, module: &str) -> Outcome {
        match self {
            Self::Success(text) => Ok(text),
            Self::NotFound(id) => Err(DispatchError::NotFound(id)),
            Self::NoEntryPoint(id) => Err(DispatchError::NoEntryPoint(id)),
            Self::Failure(ComputationError::TimedOut) => {
                Err(DispatchError::TimedOut(module.into()))
            }
            Self::Failure(ComputationError::Cancelled) => {
                Err(DispatchError::Cancelled(module.into()))
            }
            Self::Failure(err) => Err(DispatchError::Computation {
                module: module.into(),
                message: err.to_string(),
            }),
            Self::Panicked(detail) => Err(DispatchError::Computation {
                module: module.into(),
                message: format!("internal error: {detail}"),
            }),
        }
    }
}

/// Terminal outcome of one submission.
pub type Outcome = Result<String, DispatchError>;

/// Presentation side: receives every outcome on the UI thread.
pub trait OutcomePresenter: Send + Sync {
    /// Show an outcome for `module` (`None` when nothing was selected).
    fn present(&self, module: Option<&str>, outcome: &Outcome);

    /// Show an informational notice.
    fn notice(&self, message: &str);
}

/// Notified when background work starts and finishes.
pub trait ProgressReporter: Send + Sync {
    /// A worker for `module` was spawned.
    fn started(&self, ticket: u64, module: &str);

    /// The worker's outcome has been delivered.
    fn complete(&self, ticket: u64);
}

/// Reporter that ignores every notification.
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn started(&self, _ticket: u64, _module: &str) {}
    fn complete(&self, _ticket: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accessors_trim() {
        let req = DispatchRequest::new("  cubic ", "  x^3  ").with_mode("factor");
        assert_eq!(req.module(), Some("cubic"));
        assert_eq!(req.trimmed_argument(), Some("x^3"));
        assert_eq!(req.mode.as_deref(), Some("factor"));
        assert_eq!(DispatchRequest::default().module(), None);
        assert_eq!(DispatchRequest::new("", "x").module(), None);
        assert_eq!(DispatchRequest::new("cubic", "   ").trimmed_argument(), None);
    }

    #[test]
    fn result_to_outcome() {
        assert_eq!(
            DispatchResult::Success("42".into()).into_outcome("m"),
            Ok("42".into())
        );
        assert_eq!(
            DispatchResult::Failure(ComputationError::invalid("bad")).into_outcome("m"),
            Err(DispatchError::Computation {
                module: "m".into(),
                message: "bad".into()
            })
        );
        assert_eq!(
            DispatchResult::Failure(ComputationError::Cancelled).into_outcome("m"),
            Err(DispatchError::Cancelled("m".into()))
        );
        assert_eq!(
            DispatchResult::Panicked("boom".into()).into_outcome("m"),
            Err(DispatchError::Computation {
                module: "m".into(),
                message: "internal error: boom".into()
            })
        );
    }

    #[test]
    fn provider_timeout_reports_timeout() {
        assert_eq!(
            DispatchResult::Failure(ComputationError::TimedOut).into_outcome("cubic"),
            Err(DispatchError::TimedOut("cubic".into()))
        );
    }

    #[test]
    fn input_errors_keep_their_message() {
        let err = ComputationError::invalid("Modulus 'm' cannot be zero.");
        assert_eq!(
            DispatchResult::Failure(err).into_outcome("congruence"),
            Err(DispatchError::Computation {
                module: "congruence".into(),
                message: "Modulus 'm' cannot be zero.".into()
            })
        );
    }

    #[test]
    fn null_reporter() {
        let reporter = NullProgressReporter;
        reporter.started(1, "cubic");
        reporter.complete(1);
    }
}
