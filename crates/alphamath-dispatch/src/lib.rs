//! # alphamath-dispatch
//!
//! Module dispatch gateway: argument-presence validation, one background
//! worker per submission, and delivery of exactly one outcome per
//! submission on the UI event loop.

pub mod error;
pub mod event_loop;
pub mod gateway;
pub mod interfaces;
pub mod session;

pub use error::{DispatchError, ErrorKind};
pub use event_loop::{Event, EventLoop, EventPoster};
pub use gateway::{DispatchGateway, GatewayOptions, OverlapPolicy, SubmissionHandle};
pub use interfaces::{
    DispatchRequest, DispatchResult, NullProgressReporter, Outcome, OutcomePresenter,
    ProgressReporter,
};
pub use session::{request_for, Session};
