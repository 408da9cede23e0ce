//! AlphaMath library — application wiring for the calculator binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod shell;
pub mod version;
