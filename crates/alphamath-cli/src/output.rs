//! Output formatting: text and JSON records, module listings, file output.

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use alphamath_core::ModuleDescriptor;
use alphamath_dispatch::{ErrorKind, Outcome};

/// How outcomes are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON shape of one outcome.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeRecord<'a> {
    Ok {
        module: Option<&'a str>,
        output: &'a str,
    },
    Error {
        module: Option<&'a str>,
        kind: ErrorKind,
        message: String,
    },
}

impl<'a> OutcomeRecord<'a> {
    #[must_use]
    pub fn new(module: Option<&'a str>, outcome: &'a Outcome) -> Self {
        match outcome {
            Ok(output) => Self::Ok { module, output },
            Err(err) => Self::Error {
                module,
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

/// Render an outcome as a single JSON line.
#[must_use]
pub fn outcome_json(module: Option<&str>, outcome: &Outcome) -> String {
    serde_json::to_string(&OutcomeRecord::new(module, outcome))
        .unwrap_or_else(|err| format!(r#"{{"status":"error","message":"{err}"}}"#))
}

/// Aligned `label  id  [input]  hint` table.
#[must_use]
pub fn module_table<'a>(descriptors: impl IntoIterator<Item = &'a ModuleDescriptor>) -> String {
    let descriptors: Vec<&ModuleDescriptor> = descriptors.into_iter().collect();
    let label_width = descriptors
        .iter()
        .map(|d| d.display_label.chars().count())
        .max()
        .unwrap_or(0);
    let id_width = descriptors
        .iter()
        .map(|d| d.id.as_str().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for d in descriptors {
        let input = if d.requires_argument { "input" } else { "  -  " };
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:<id_width$}  [{input}]  {}",
            d.display_label,
            d.id.as_str(),
            d.hint
        );
    }
    out
}

/// Descriptors as a JSON array.
pub fn modules_json<'a>(
    descriptors: impl IntoIterator<Item = &'a ModuleDescriptor>,
) -> serde_json::Result<String> {
    let list: Vec<&ModuleDescriptor> = descriptors.into_iter().collect();
    serde_json::to_string_pretty(&list)
}

/// Format a duration for display.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else {
        format!("{secs:.3}s")
    }
}

/// Write a successful result to a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &Path, text: &str) -> io::Result<()> {
    std::fs::write(path, format!("{text}\n"))
}
