//! Single-threaded UI event loop.
//!
//! Workers never touch presentation state directly: they post a task to the
//! loop, and the task runs on whichever thread drives [`EventLoop::run`].

use std::ops::ControlFlow;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

/// Unit of work executed on the UI thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Messages drained by the event loop.
pub enum Event {
    /// Run a closure on the UI thread.
    Task(Task),
    /// A line of user input.
    Input(String),
    /// Stop the loop.
    Shutdown,
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task(_) => f.write_str("Task"),
            Self::Input(line) => f.debug_tuple("Input").field(line).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cloneable handle for posting to the loop from any thread.
#[derive(Clone)]
pub struct EventPoster {
    tx: Sender<Event>,
}

impl EventPoster {
    /// Post a task; returns false once the loop has gone away.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Event::Task(Box::new(task))).is_ok()
    }

    /// Forward a line of user input.
    pub fn input(&self, line: impl Into<String>) -> bool {
        self.tx.send(Event::Input(line.into())).is_ok()
    }

    /// Ask the loop to stop after the events already queued.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Event::Shutdown);
    }
}

/// Receiving end of the UI event channel.
pub struct EventLoop {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    #[must_use]
    pub fn poster(&self) -> EventPoster {
        EventPoster {
            tx: self.tx.clone(),
        }
    }

    /// Drain events until `Shutdown`, or until `on_input` breaks.
    ///
    /// Tasks run in posting order on the calling thread.
    pub fn run(&self, mut on_input: impl FnMut(String) -> ControlFlow<()>) {
        while let Ok(event) = self.rx.recv() {
            match event {
                Event::Task(task) => task(),
                Event::Input(line) => {
                    if on_input(line).is_break() {
                        break;
                    }
                }
                Event::Shutdown => break,
            }
        }
        tracing::debug!("event loop stopped");
    }

    /// Run tasks already queued or arriving within `timeout`.
    ///
    /// Returns the number of tasks executed. Input events are dropped and
    /// a `Shutdown` stops early.
    pub fn pump(&self, timeout: Duration) -> usize {
        let mut executed = 0;
        loop {
            match self.rx.recv_timeout(timeout) {
                Ok(Event::Task(task)) => {
                    task();
                    executed += 1;
                }
                Ok(Event::Input(line)) => tracing::debug!(%line, "input dropped while pumping"),
                Ok(Event::Shutdown) | Err(RecvTimeoutError::Disconnected | RecvTimeoutError::Timeout) => {
                    return executed
                }
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
