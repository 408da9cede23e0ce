//! Dispatch gateway: validate, spawn one worker per submission, post the outcome.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use alphamath_core::{requires_argument, CancellationToken, ModuleRegistry, ProviderFactory};

use crate::error::DispatchError;
use crate::event_loop::EventPoster;
use crate::interfaces::{
    DispatchRequest, DispatchResult, NullProgressReporter, Outcome, ProgressReporter,
};

type Callback = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// What to do with a submission while another is still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Run both; the last to finish is displayed last.
    #[default]
    Race,
    /// Fail the new submission with [`DispatchError::Busy`].
    Reject,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "race" => Ok(Self::Race),
            "reject" => Ok(Self::Reject),
            other => Err(format!("invalid overlap policy '{other}' (expected race or reject)")),
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Race => "race",
            Self::Reject => "reject",
        })
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayOptions {
    pub overlap: OverlapPolicy,
    /// Deadline applied to every submission's cancellation token.
    pub timeout: Option<Duration>,
}

/// Handle for a submission that was scheduled on a worker.
#[derive(Debug, Clone)]
pub struct SubmissionHandle {
    ticket: u64,
    module: String,
    cancel: CancellationToken,
}

impl SubmissionHandle {
    #[must_use]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Request cancellation; the callback still fires once.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Everything a worker needs, owned.
struct Job {
    module: String,
    argument: Option<String>,
    mode: Option<String>,
    cancel: CancellationToken,
}

impl Job {
    fn execute(&self, factory: &dyn ProviderFactory) -> DispatchResult {
        let Some(provider) = factory.get(&self.module) else {
            return DispatchResult::NotFound(self.module.clone());
        };
        if !provider.has_main() {
            return DispatchResult::NoEntryPoint(self.module.clone());
        }
        let mut args: Vec<&str> = Vec::with_capacity(2);
        if let Some(argument) = self.argument.as_deref() {
            args.push(argument);
            args.extend(self.mode.as_deref());
        }
        match catch_unwind(AssertUnwindSafe(|| provider.call_main(&args, &self.cancel))) {
            Ok(Ok(text)) => DispatchResult::Success(text),
            Ok(Err(err)) => DispatchResult::Failure(err),
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                tracing::error!(module = %self.module, %detail, "provider panicked");
                DispatchResult::Panicked(detail)
            }
        }
    }
}

/// Routes requests to providers off the UI thread.
pub struct DispatchGateway {
    factory: Arc<dyn ProviderFactory>,
    poster: EventPoster,
    options: GatewayOptions,
    reporter: Arc<dyn ProgressReporter>,
    next_ticket: AtomicU64,
    in_flight: Arc<Mutex<HashMap<u64, CancellationToken>>>,
}

impl DispatchGateway {
    #[must_use]
    pub fn new(factory: Arc<dyn ProviderFactory>, poster: EventPoster) -> Self {
        Self {
            factory,
            poster,
            options: GatewayOptions::default(),
            reporter: Arc::new(NullProgressReporter),
            next_ticket: AtomicU64::new(0),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GatewayOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    #[must_use]
    pub fn options(&self) -> GatewayOptions {
        self.options
    }

    /// Submissions whose worker has not finished yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Cancel every running submission, returning how many were signalled.
    pub fn cancel_all(&self) -> usize {
        let running = self.in_flight.lock();
        for token in running.values() {
            token.cancel();
        }
        running.len()
    }

    /// Submit a request. `callback` fires exactly once.
    ///
    /// Selection, validation and busy errors are delivered before this
    /// returns, on the calling thread, and yield `None`. Otherwise a worker
    /// is spawned and its outcome is posted to the event loop.
    pub fn submit(
        &self,
        request: DispatchRequest,
        callback: impl FnOnce(Outcome) + Send + 'static,
    ) -> Option<SubmissionHandle> {
        let Some(module) = request.module().map(str::to_string) else {
            return Self::fail_fast(DispatchError::NoModuleSelected, callback);
        };
        let argument = request.trimmed_argument().map(str::to_string);
        if argument.is_none() && requires_argument(Some(module.as_str())) {
            let hint = ModuleRegistry::global()
                .by_id(&module)
                .map_or("", |d| d.hint);
            return Self::fail_fast(
                DispatchError::MissingArgument {
                    module,
                    hint: hint.to_string(),
                },
                callback,
            );
        }
        if self.options.overlap == OverlapPolicy::Reject && self.in_flight() > 0 {
            return Self::fail_fast(DispatchError::Busy(module), callback);
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = self
            .options
            .timeout
            .map_or_else(CancellationToken::new, CancellationToken::with_timeout);
        self.in_flight.lock().insert(ticket, cancel.clone());
        self.reporter.started(ticket, &module);
        tracing::info!(ticket, %module, "submission scheduled");

        let job = Job {
            module: module.clone(),
            argument,
            mode: request.mode.clone(),
            cancel: cancel.clone(),
        };
        let slot: Arc<Mutex<Option<Callback>>> = Arc::new(Mutex::new(Some(Box::new(callback))));

        let spawned = thread::Builder::new()
            .name(format!("dispatch-{ticket}"))
            .spawn({
                let factory = Arc::clone(&self.factory);
                let poster = self.poster.clone();
                let reporter = Arc::clone(&self.reporter);
                let in_flight = Arc::clone(&self.in_flight);
                let slot = Arc::clone(&slot);
                move || {
                    let outcome = job.execute(factory.as_ref()).into_outcome(&job.module);
                    in_flight.lock().remove(&ticket);
                    match &outcome {
                        Ok(_) => tracing::debug!(ticket, module = %job.module, "submission succeeded"),
                        Err(err) => tracing::warn!(ticket, module = %job.module, error = %err, "submission failed"),
                    }
                    let Some(callback) = slot.lock().take() else {
                        return;
                    };
                    let delivered = poster.post(move || {
                        reporter.complete(ticket);
                        callback(outcome);
                    });
                    if !delivered {
                        tracing::warn!(ticket, "event loop closed; outcome dropped");
                    }
                }
            });

        match spawned {
            Ok(_) => Some(SubmissionHandle {
                ticket,
                module,
                cancel,
            }),
            Err(err) => {
                tracing::error!(ticket, error = %err, "failed to spawn dispatch worker");
                self.in_flight.lock().remove(&ticket);
                self.reporter.complete(ticket);
                if let Some(callback) = slot.lock().take() {
                    callback(Err(DispatchError::Computation {
                        module,
                        message: format!("could not start worker: {err}"),
                    }));
                }
                None
            }
        }
    }

    fn fail_fast(
        error: DispatchError,
        callback: impl FnOnce(Outcome),
    ) -> Option<SubmissionHandle> {
        tracing::warn!(error = %error, "submission rejected");
        callback(Err(error));
        None
    }
}
