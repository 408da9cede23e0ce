//! Application entry point and dispatch.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use alphamath_cli::output::{module_table, modules_json};
use alphamath_cli::{CliPresenter, OutputFormat, SpinnerReporter};
use alphamath_core::{exit_codes, DefaultProviders, ModuleRegistry};
use alphamath_dispatch::{
    DispatchGateway, DispatchRequest, EventLoop, EventPoster, OutcomePresenter, Session,
};

use crate::config::AppConfig;
use crate::errors::exit_code_for;
use crate::shell::Shell;

/// UI event loop, gateway and presenter wired together.
pub struct Runtime {
    pub event_loop: EventLoop,
    pub gateway: Arc<DispatchGateway>,
    pub presenter: Arc<CliPresenter>,
}

impl Runtime {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let event_loop = EventLoop::new();
        let spinner_hidden = config.quiet || config.json;
        let gateway = DispatchGateway::new(Arc::new(DefaultProviders::new()), event_loop.poster())
            .with_options(config.gateway_options())
            .with_reporter(Arc::new(SpinnerReporter::new(spinner_hidden)));
        let presenter = CliPresenter::new(config.format(), config.quiet, config.verbose)
            .with_output_file(config.output.clone());
        Self {
            event_loop,
            gateway: Arc::new(gateway),
            presenter: Arc::new(presenter),
        }
    }

    #[must_use]
    pub fn poster(&self) -> EventPoster {
        self.event_loop.poster()
    }
}

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        alphamath_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    if config.list {
        return list_modules(config);
    }

    let runtime = Runtime::new(config);
    install_ctrlc_handler(&runtime);

    if config.is_one_shot() {
        run_one_shot(config, &runtime)
    } else {
        run_shell(config, runtime)
    }
}

fn list_modules(config: &AppConfig) -> Result<i32> {
    let registry = ModuleRegistry::global();
    match config.format() {
        OutputFormat::Json => {
            let json = modules_json(registry.selectable()).context("serializing module list")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if !config.quiet {
                alphamath_cli::ui::print_header("Modules");
            }
            print!("{}", module_table(registry.selectable()));
        }
    }
    Ok(exit_codes::SUCCESS)
}

/// Request for a one-shot run.
///
/// Known labels and ids go through a [`Session`] so the mode only reaches the
/// algebra backend; anything else is forwarded as-is and reported by the
/// gateway.
#[must_use]
pub fn one_shot_request(config: &AppConfig) -> DispatchRequest {
    let input = config.input.clone().unwrap_or_default();
    match config.module.as_deref() {
        Some(name) => match Session::with_module(name) {
            Ok(mut session) => {
                session.set_mode(config.mode.clone());
                session.request(&input)
            }
            Err(_) => DispatchRequest {
                module_id: Some(name.trim().to_string()),
                argument: Some(input),
                mode: config.mode.clone(),
            },
        },
        None => Session::new().request(&input),
    }
}

fn run_one_shot(config: &AppConfig, runtime: &Runtime) -> Result<i32> {
    let request = one_shot_request(config);
    let module = request.module().map(str::to_string);
    tracing::info!(module = ?module, "one-shot submission");

    let presenter = Arc::clone(&runtime.presenter);
    let poster = runtime.poster();
    let started = Instant::now();
    runtime.gateway.submit(request, move |outcome| {
        presenter.present_timed(module.as_deref(), &outcome, started.elapsed());
        poster.shutdown();
    });
    runtime.event_loop.run(|line| {
        tracing::debug!(%line, "unexpected input in one-shot mode");
        std::ops::ControlFlow::Continue(())
    });

    Ok(exit_code_for(runtime.presenter.last_error()))
}

fn run_shell(config: &AppConfig, runtime: Runtime) -> Result<i32> {
    let interactive = std::io::stdin().is_terminal();
    let mut session = Session::new();
    if let Some(name) = config.module.as_deref() {
        if let Err(err) = session.select(name) {
            runtime.presenter.present(Some(name), &Err(err));
            return Ok(exit_code_for(runtime.presenter.last_error()));
        }
    }
    session.set_mode(config.mode.clone());

    let shell = Shell::new(session, &runtime, interactive, config.quiet);
    shell.spawn_reader().context("starting input reader")?;
    shell.run(&runtime.event_loop);
    Ok(exit_codes::SUCCESS)
}

/// Ctrl+C cancels running work; with nothing running it stops the loop.
fn install_ctrlc_handler(runtime: &Runtime) {
    let gateway = Arc::clone(&runtime.gateway);
    let poster = runtime.poster();
    let result = ctrlc::set_handler(move || {
        let cancelled = gateway.cancel_all();
        tracing::info!(cancelled, "interrupt received");
        if cancelled == 0 {
            poster.shutdown();
        }
    });
    if let Err(err) = result {
        tracing::warn!(error = %err, "could not install Ctrl+C handler");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("alphamath").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn label_resolves_to_id() {
        let req = one_shot_request(&config(&["-m", "Quadratic Solver", "-i", " x^2 - 1 "]));
        assert_eq!(req.module(), Some("Quad"));
        assert_eq!(req.trimmed_argument(), Some("x^2 - 1"));
        assert_eq!(req.mode, None);
    }

    #[test]
    fn mode_only_reaches_algebra() {
        let req = one_shot_request(&config(&["-m", "proj", "-i", "x^2-1", "--mode", "factor"]));
        assert_eq!(req.mode.as_deref(), Some("factor"));
        let req = one_shot_request(&config(&["-m", "cubic", "-i", "x^3", "--mode", "factor"]));
        assert_eq!(req.mode, None);
    }

    #[test]
    fn unknown_module_is_forwarded() {
        let req = one_shot_request(&config(&["-m", " unknown_module ", "-i", "1"]));
        assert_eq!(req.module(), Some("unknown_module"));
    }

    #[test]
    fn no_module_has_no_id() {
        let req = one_shot_request(&config(&["-i", "3 5 7"]));
        assert_eq!(req.module(), None);
    }
}
