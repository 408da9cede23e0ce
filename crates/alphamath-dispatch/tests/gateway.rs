//! Gateway behaviour: validation, worker dispatch and exactly-once delivery.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use alphamath_core::{
    CancellationToken, ComputationError, ComputationProvider, DefaultProviders, ModuleId,
    ProviderFactory,
};
use alphamath_dispatch::{
    DispatchError, DispatchGateway, DispatchRequest, EventLoop, GatewayOptions, Outcome,
    OverlapPolicy,
};

/// Records every invocation; behaviour chosen by the argument text.
struct Recording {
    name: String,
    has_main: bool,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ComputationProvider for Recording {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_main(&self) -> bool {
        self.has_main
    }

    fn call_main(
        &self,
        args: &[&str],
        cancel: &CancellationToken,
    ) -> Result<String, ComputationError> {
        self.calls
            .lock()
            .push(args.iter().map(ToString::to_string).collect());
        match args.first().copied() {
            Some("fail") => Err(ComputationError::invalid("provider says no")),
            Some("panic") => panic!("boom"),
            Some("slow") => {
                let start = Instant::now();
                while start.elapsed() < Duration::from_secs(5) {
                    cancel.check_cancelled()?;
                    thread::sleep(Duration::from_millis(2));
                }
                Ok("slow done".into())
            }
            Some("late") => {
                let start = Instant::now();
                while !cancel.is_cancelled() && start.elapsed() < Duration::from_secs(5) {
                    thread::sleep(Duration::from_millis(2));
                }
                Err(ComputationError::invalid("late input error"))
            }
            Some(_) => Ok(format!("{}({})", self.name, args.join(", "))),
            None => Ok(format!("{}()", self.name)),
        }
    }
}

/// Factory answering every known module id with a recording provider.
#[derive(Default)]
struct FakeFactory {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ProviderFactory for FakeFactory {
    fn get(&self, id: &str) -> Option<Arc<dyn ComputationProvider>> {
        let module = ModuleId::parse(id)?;
        Some(Arc::new(Recording {
            name: id.to_string(),
            has_main: module != ModuleId::ProjectActivity,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct Harness {
    event_loop: EventLoop,
    gateway: DispatchGateway,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    outcomes: Arc<Mutex<Vec<(thread::ThreadId, Outcome)>>>,
}

impl Harness {
    fn new(options: GatewayOptions) -> Self {
        let factory = FakeFactory::default();
        let calls = Arc::clone(&factory.calls);
        let event_loop = EventLoop::new();
        let gateway =
            DispatchGateway::new(Arc::new(factory), event_loop.poster()).with_options(options);
        Self {
            event_loop,
            gateway,
            calls,
            outcomes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn submit(&self, request: DispatchRequest) -> bool {
        let outcomes = Arc::clone(&self.outcomes);
        self.gateway
            .submit(request, move |outcome| {
                outcomes.lock().push((thread::current().id(), outcome));
            })
            .is_some()
    }

    /// Pump the loop until `n` outcomes have arrived.
    fn wait_for(&self, n: usize) -> Vec<Outcome> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while self.outcomes.lock().len() < n && Instant::now() < deadline {
            self.event_loop.pump(Duration::from_millis(10));
        }
        let outcomes = self.outcomes.lock();
        for (thread_id, _) in outcomes.iter() {
            assert_eq!(*thread_id, thread::current().id(), "callback off the UI thread");
        }
        outcomes.iter().map(|(_, o)| o.clone()).collect()
    }
}

fn request(module: &str, argument: &str) -> DispatchRequest {
    DispatchRequest::new(module, argument)
}

#[test]
fn no_module_selected_is_synchronous() {
    let h = Harness::new(GatewayOptions::default());
    for argument in ["", "3 5 7", "   "] {
        let req = DispatchRequest {
            module_id: None,
            argument: Some(argument.into()),
            mode: None,
        };
        assert!(!h.submit(req));
    }
    assert!(!h.submit(request("  ", "x")));
    let outcomes = h.wait_for(4);
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes
        .iter()
        .all(|o| *o == Err(DispatchError::NoModuleSelected)));
    assert!(h.calls.lock().is_empty());
}

#[test]
fn missing_argument_mentions_hint_and_skips_provider() {
    let h = Harness::new(GatewayOptions::default());
    assert!(!h.submit(request("cubic", "")));
    let outcomes = h.wait_for(1);
    let hint = ModuleId::Cubic.hint();
    match &outcomes[0] {
        Err(err @ DispatchError::MissingArgument { module, .. }) => {
            assert_eq!(module, "cubic");
            assert!(err.to_string().contains(hint));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(h.calls.lock().is_empty());
}

#[test]
fn every_required_module_rejects_blank_input() {
    let h = Harness::new(GatewayOptions::default());
    let required: Vec<ModuleId> = ModuleId::ALL
        .into_iter()
        .filter(|m| m.requires_argument())
        .collect();
    for module in &required {
        assert!(!h.submit(request(module.as_str(), " \t ")));
    }
    let outcomes = h.wait_for(required.len());
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, Err(DispatchError::MissingArgument { .. }))));
    assert!(h.calls.lock().is_empty());
}

#[test]
fn congruence_argument_is_passed_verbatim() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("congruence", "3 5 7")));
    let outcomes = h.wait_for(1);
    assert_eq!(outcomes, vec![Ok("congruence(3 5 7)".to_string())]);
    assert_eq!(*h.calls.lock(), vec![vec!["3 5 7".to_string()]]);
}

#[test]
fn sturm_with_empty_argument_gets_zero_arguments() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("sturm_final", "")));
    assert_eq!(h.wait_for(1), vec![Ok("sturm_final()".to_string())]);
    assert_eq!(*h.calls.lock(), vec![Vec::<String>::new()]);
}

#[test]
fn unknown_module_is_not_found() {
    let h = Harness::new(GatewayOptions::default());
    for argument in ["", "anything"] {
        assert!(h.submit(request("unknown_module", argument)));
    }
    let outcomes = h.wait_for(2);
    assert!(outcomes
        .iter()
        .all(|o| *o == Err(DispatchError::NotFound("unknown_module".into()))));
}

#[test]
fn activity_entry_has_no_entry_point() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("PROJ_ACTIVITY", "")));
    assert_eq!(
        h.wait_for(1),
        vec![Err(DispatchError::NoEntryPoint("PROJ_ACTIVITY".into()))]
    );
    assert!(h.calls.lock().is_empty());
}

#[test]
fn provider_error_text_is_kept() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("CRT", "fail")));
    assert_eq!(
        h.wait_for(1),
        vec![Err(DispatchError::Computation {
            module: "CRT".into(),
            message: "provider says no".into()
        })]
    );
}

#[test]
fn provider_panic_becomes_failure() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("cubic", "panic")));
    match &h.wait_for(1)[0] {
        Err(DispatchError::Computation { message, .. }) => assert!(message.contains("boom")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    // The gateway keeps working afterwards.
    assert!(h.submit(request("cubic", "x^3")));
    assert_eq!(h.wait_for(2)[1], Ok("cubic(x^3)".to_string()));
}

#[test]
fn mode_is_passed_as_second_argument() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("proj", "x^2 - 1").with_mode("factor")));
    h.wait_for(1);
    assert_eq!(
        *h.calls.lock(),
        vec![vec!["x^2 - 1".to_string(), "factor".to_string()]]
    );
}

#[test]
fn cancellation_still_delivers_once() {
    let h = Harness::new(GatewayOptions::default());
    let outcomes = Arc::clone(&h.outcomes);
    let handle = h
        .gateway
        .submit(request("cubic", "slow"), move |o| {
            outcomes.lock().push((thread::current().id(), o));
        })
        .unwrap();
    handle.cancel();
    assert_eq!(
        h.wait_for(1),
        vec![Err(DispatchError::Cancelled("cubic".into()))]
    );
    h.event_loop.pump(Duration::from_millis(20));
    assert_eq!(h.outcomes.lock().len(), 1);
    assert_eq!(h.gateway.in_flight(), 0);
}

#[test]
fn timeout_cancels_the_token() {
    let h = Harness::new(GatewayOptions {
        timeout: Some(Duration::from_millis(20)),
        ..GatewayOptions::default()
    });
    assert!(h.submit(request("Quad", "slow")));
    assert_eq!(
        h.wait_for(1),
        vec![Err(DispatchError::TimedOut("Quad".into()))]
    );
}

#[test]
fn input_error_after_deadline_keeps_its_message() {
    let h = Harness::new(GatewayOptions {
        timeout: Some(Duration::from_millis(20)),
        ..GatewayOptions::default()
    });
    assert!(h.submit(request("cubic", "late")));
    assert_eq!(
        h.wait_for(1),
        vec![Err(DispatchError::Computation {
            module: "cubic".into(),
            message: "late input error".into()
        })]
    );
}

#[test]
fn reject_policy_refuses_overlap() {
    let h = Harness::new(GatewayOptions {
        overlap: OverlapPolicy::Reject,
        ..GatewayOptions::default()
    });
    assert!(h.submit(request("cubic", "slow")));
    assert!(!h.submit(request("CRT", "1 2")));
    assert_eq!(h.gateway.cancel_all(), 1);
    let outcomes = h.wait_for(2);
    assert_eq!(outcomes[0], Err(DispatchError::Busy("CRT".into())));
    assert_eq!(outcomes[1], Err(DispatchError::Cancelled("cubic".into())));
}

#[test]
fn race_policy_runs_overlapping_submissions() {
    let h = Harness::new(GatewayOptions::default());
    assert!(h.submit(request("cubic", "slow")));
    assert!(h.submit(request("CRT", "2 3 3 5")));
    let first = h.wait_for(1);
    assert_eq!(first, vec![Ok("CRT(2 3 3 5)".to_string())]);
    h.gateway.cancel_all();
    let all = h.wait_for(2);
    assert_eq!(all.len(), 2);
}

#[test]
fn real_providers_end_to_end() {
    let event_loop = EventLoop::new();
    let gateway = DispatchGateway::new(Arc::new(DefaultProviders::new()), event_loop.poster());
    let result = Arc::new(Mutex::new(None));
    {
        let result = Arc::clone(&result);
        gateway.submit(request("multiplier", "12 8"), move |o| {
            *result.lock() = Some(o);
        });
    }
    let deadline = Instant::now() + Duration::from_secs(10);
    while result.lock().is_none() && Instant::now() < deadline {
        event_loop.pump(Duration::from_millis(10));
    }
    let text = result.lock().take().unwrap().unwrap();
    assert!(text.ends_with("24 / 8 = 3"));
}
