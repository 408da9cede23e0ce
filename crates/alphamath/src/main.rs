//! AlphaMath — dispatch calculator input to computation modules.

use alphamath_lib::{app, config};
use anyhow::Result;

fn main() -> Result<()> {
    let config = config::AppConfig::parse();

    // Logs go to stderr so stdout stays clean for results
    let level = if config.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = app::run(&config)?;
    std::process::exit(code)
}
