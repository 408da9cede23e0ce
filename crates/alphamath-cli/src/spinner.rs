//! Terminal spinner shown while submissions run.

use std::collections::HashMap;
use std::time::Duration;

use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;

use alphamath_dispatch::ProgressReporter;

/// One spinner per running ticket, drawn on stderr.
pub struct SpinnerReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<u64, ProgressBar>>,
}

impl SpinnerReporter {
    /// Spinners are hidden when `quiet` is set or stderr is not a terminal.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let target = if quiet || !Term::stderr().is_term() {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// Never draws; used by tests and non-interactive runs.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(true)
    }

    /// Tickets with a live spinner.
    #[must_use]
    pub fn active(&self) -> usize {
        self.bars.lock().len()
    }
}

impl ProgressReporter for SpinnerReporter {
    fn started(&self, ticket: u64, module: &str) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Computing with {module}..."));
        bar.enable_steady_tick(Duration::from_millis(120));
        self.bars.lock().insert(ticket, bar);
    }

    fn complete(&self, ticket: u64) {
        if let Some(bar) = self.bars.lock().remove(&ticket) {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_tickets() {
        let reporter = SpinnerReporter::hidden();
        reporter.started(1, "cubic");
        reporter.started(2, "CRT");
        assert_eq!(reporter.active(), 2);
        reporter.complete(1);
        assert_eq!(reporter.active(), 1);
        reporter.complete(2);
        assert_eq!(reporter.active(), 0);
    }

    #[test]
    fn unknown_ticket_is_ignored() {
        let reporter = SpinnerReporter::hidden();
        reporter.complete(42);
        assert_eq!(reporter.active(), 0);
    }
}
