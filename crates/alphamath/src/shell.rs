//! Interactive shell: `:` commands manage the session, other lines are input.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::Mutex;

use alphamath_cli::output::module_table;
use alphamath_cli::{ui, CliPresenter};
use alphamath_core::ModuleRegistry;
use alphamath_dispatch::{DispatchGateway, EventLoop, EventPoster, OutcomePresenter, Session};

use crate::app::Runtime;
use crate::version::full_version;

const HELP: &str = "\
Commands:
  :use <module>   select a module by label or id
  :mode [mode]    set the algebra mode (expand, simplify, factor, substitute)
  :modules        list modules
  :clear          deselect the module
  :help           show this help
  :quit           leave the shell
Any other line is sent to the selected module.";

/// One parsed shell line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Use(&'a str),
    Mode(Option<&'a str>),
    Modules,
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
    Input(&'a str),
}

impl<'a> Command<'a> {
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let Some(rest) = line.trim().strip_prefix(':') else {
            return Self::Input(line);
        };
        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(n, a)| (n, a.trim()));
        match name {
            "use" => Self::Use(arg),
            "mode" => Self::Mode(Some(arg).filter(|a| !a.is_empty())),
            "modules" | "list" => Self::Modules,
            "clear" => Self::Clear,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(name),
        }
    }
}

/// Shell state, owned by the UI thread.
pub struct Shell {
    session: Session,
    gateway: Arc<DispatchGateway>,
    presenter: Arc<CliPresenter>,
    poster: EventPoster,
    pending: Arc<AtomicUsize>,
    closing: Arc<AtomicBool>,
    /// `None` when stdin is not a terminal.
    prompt: Arc<Mutex<Option<String>>>,
    quiet: bool,
}

impl Shell {
    #[must_use]
    pub fn new(session: Session, runtime: &Runtime, interactive: bool, quiet: bool) -> Self {
        let shell = Self {
            session,
            gateway: Arc::clone(&runtime.gateway),
            presenter: Arc::clone(&runtime.presenter),
            poster: runtime.poster(),
            pending: Arc::new(AtomicUsize::new(0)),
            closing: Arc::new(AtomicBool::new(false)),
            prompt: Arc::new(Mutex::new(None)),
            quiet,
        };
        if interactive {
            shell.refresh_prompt();
        }
        shell
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Submissions whose outcome has not been presented yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Forward stdin lines to the event loop.
    ///
    /// At end of input the loop stops once every pending outcome is shown.
    pub fn spawn_reader(&self) -> io::Result<JoinHandle<()>> {
        let poster = self.poster.clone();
        let closing = Arc::clone(&self.closing);
        let pending = Arc::clone(&self.pending);
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if !poster.input(line) {
                                return;
                            }
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "stdin read failed");
                            break;
                        }
                    }
                }
                let stop = poster.clone();
                poster.post(move || {
                    closing.store(true, Ordering::SeqCst);
                    if pending.load(Ordering::SeqCst) == 0 {
                        stop.shutdown();
                    }
                });
            })
    }

    /// Drive the event loop until `:quit`, end of input or Ctrl+C.
    pub fn run(mut self, event_loop: &EventLoop) {
        if self.prompt.lock().is_some() && !self.quiet {
            ui::print_header(&full_version());
            self.presenter.notice("Type :help for commands.");
        }
        self.show_prompt();
        event_loop.run(|line| self.handle_line(&line));
        if self.pending() > 0 {
            self.gateway.cancel_all();
        }
    }

    /// Handle one line of input.
    pub fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        match Command::parse(line) {
            Command::Quit => return ControlFlow::Break(()),
            Command::Input(text) => {
                if !text.trim().is_empty() || self.session.active().is_some() {
                    self.submit(text);
                    return ControlFlow::Continue(());
                }
            }
            Command::Use("") => ui::print_error("Usage: :use <module>"),
            Command::Use(name) => match self.session.select(name) {
                Ok(descriptor) => {
                    self.refresh_prompt();
                    self.presenter.notice(&format!(
                        "Using {} ({}). Format: {}",
                        descriptor.display_label, descriptor.id, descriptor.hint
                    ));
                }
                Err(err) => ui::print_error(&err.to_string()),
            },
            Command::Mode(mode) => {
                self.session.set_mode(mode.map(str::to_string));
                self.presenter.notice(&format!(
                    "Mode: {}",
                    self.session.mode().unwrap_or("default")
                ));
            }
            Command::Modules => print!("{}", module_table(ModuleRegistry::global().selectable())),
            Command::Clear => {
                self.session.clear();
                self.refresh_prompt();
                self.presenter.notice("Module cleared.");
            }
            Command::Help => println!("{HELP}"),
            Command::Unknown(name) => ui::print_error(&format!(
                "Unknown command ':{name}'. Type :help for commands."
            )),
        }
        self.show_prompt();
        ControlFlow::Continue(())
    }

    fn submit(&mut self, text: &str) {
        let request = self.session.request(text);
        let module = request.module().map(str::to_string);
        self.pending.fetch_add(1, Ordering::SeqCst);

        let presenter = Arc::clone(&self.presenter);
        let pending = Arc::clone(&self.pending);
        let closing = Arc::clone(&self.closing);
        let prompt = Arc::clone(&self.prompt);
        let poster = self.poster.clone();
        let started = Instant::now();
        self.gateway.submit(request, move |outcome| {
            presenter.present_timed(module.as_deref(), &outcome, started.elapsed());
            let left = pending.fetch_sub(1, Ordering::SeqCst) - 1;
            if left == 0 && closing.load(Ordering::SeqCst) {
                poster.shutdown();
            } else {
                print_prompt(prompt.lock().as_deref());
            }
        });
    }

    fn refresh_prompt(&self) {
        let label = self.session.descriptor().map(|d| d.id.as_str());
        *self.prompt.lock() = Some(ui::prompt(label));
    }

    fn show_prompt(&self) {
        print_prompt(self.prompt.lock().as_deref());
    }
}

fn print_prompt(prompt: Option<&str>) {
    if let Some(prompt) = prompt {
        print!("{prompt}");
        let _ = io::stdout().flush();
    }
}
