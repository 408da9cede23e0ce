//! CLI outcome presenter.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use parking_lot::Mutex;

use alphamath_core::ModuleRegistry;
use alphamath_dispatch::{ErrorKind, Outcome, OutcomePresenter};

use crate::output::{format_duration, outcome_json, write_to_file, OutputFormat};
use crate::ui;

/// Prints outcomes to a writer (stdout by default) and remembers the last one.
///
/// Outcomes are shown in arrival order; when submissions overlap the one
/// delivered last is what [`CliPresenter::last_error`] reports.
pub struct CliPresenter {
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
    output_file: Option<PathBuf>,
    out: Mutex<Box<dyn Write + Send>>,
    last: Mutex<Option<Result<(), ErrorKind>>>,
}

impl CliPresenter {
    #[must_use]
    pub fn new(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            output_file: None,
            out: Mutex::new(Box::new(io::stdout())),
            last: Mutex::new(None),
        }
    }

    /// Redirect rendered outcomes to `writer`.
    #[must_use]
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.out = Mutex::new(Box::new(writer));
        self
    }

    /// Also write successful output to `path`.
    #[must_use]
    pub fn with_output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path;
        self
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `None` until an outcome arrives; then the kind of the last error, if any.
    #[must_use]
    pub fn last(&self) -> Option<Result<(), ErrorKind>> {
        *self.last.lock()
    }

    /// Kind of the most recent outcome when it was an error.
    #[must_use]
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last().and_then(Result::err)
    }

    /// Present an outcome, then report how long it took in verbose text mode.
    pub fn present_timed(&self, module: Option<&str>, outcome: &Outcome, elapsed: Duration) {
        self.present(module, outcome);
        tracing::debug!(module = ?module, ?elapsed, "outcome presented");
        if let Some(notice) = self.elapsed_notice(elapsed) {
            ui::print_notice(&notice);
        }
    }

    fn elapsed_notice(&self, elapsed: Duration) -> Option<String> {
        (self.verbose && !self.quiet && self.format == OutputFormat::Text)
            .then(|| format!("Completed in {}", format_duration(elapsed)))
    }

    fn write_line(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(err) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            tracing::warn!(error = %err, "failed to write outcome");
        }
    }

    fn present_text(&self, module: Option<&str>, outcome: &Outcome) {
        match outcome {
            Ok(text) => {
                if !self.quiet {
                    let label = match module {
                        Some(id) => ModuleRegistry::global()
                            .by_id(id)
                            .map_or(id, |d| d.display_label),
                        None => "",
                    };
                    if !label.is_empty() {
                        self.write_line(&ui::header(label));
                    }
                }
                self.write_line(text);
            }
            Err(err) => {
                ui::print_error(&err.to_string());
                if self.verbose {
                    ui::print_notice(&format!("error kind: {:?}", err.kind()));
                }
            }
        }
    }
}

impl OutcomePresenter for CliPresenter {
    fn present(&self, module: Option<&str>, outcome: &Outcome) {
        *self.last.lock() = Some(outcome.as_ref().map(|_| ()).map_err(|e| e.kind()));
        match self.format {
            OutputFormat::Text => self.present_text(module, outcome),
            OutputFormat::Json => self.write_line(&outcome_json(module, outcome)),
        }
        if let (Ok(text), Some(path)) = (outcome, &self.output_file) {
            match write_to_file(path, text) {
                Ok(()) => tracing::info!(path = %path.display(), "result written"),
                Err(err) => ui::print_error(&format!(
                    "could not write {}: {err}",
                    path.display()
                )),
            }
        }
    }

    fn notice(&self, message: &str) {
        if !self.quiet {
            ui::print_notice(message);
        }
    }
}
