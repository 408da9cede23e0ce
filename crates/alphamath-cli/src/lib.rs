//! # alphamath-cli
//!
//! Outcome presentation (text or JSON), spinner, styled printing and shell
//! completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod spinner;
pub mod ui;

pub use output::OutputFormat;
pub use presenter::CliPresenter;
pub use spinner::SpinnerReporter;
