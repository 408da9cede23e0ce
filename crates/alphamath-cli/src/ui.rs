//! Styled printing helpers.

use console::style;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// `=== text ===`, bold cyan when colors are enabled.
#[must_use]
pub fn header(text: &str) -> String {
    if is_color_disabled() {
        format!("=== {text} ===")
    } else {
        style(format!("=== {text} ===")).bold().cyan().to_string()
    }
}

/// Print a styled header.
pub fn print_header(text: &str) {
    println!("{}", header(text));
}

/// Print a success message.
pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print an informational notice to stderr.
pub fn print_notice(text: &str) {
    if is_color_disabled() {
        eprintln!("[i] {text}");
    } else {
        eprintln!("{} {text}", style("[i]").yellow().bold());
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

/// Shell prompt showing the active module.
#[must_use]
pub fn prompt(module: Option<&str>) -> String {
    let label = module.unwrap_or("no module");
    if is_color_disabled() {
        format!("alphamath [{label}]> ")
    } else {
        format!("{} [{}]> ", style("alphamath").bold(), style(label).cyan())
    }
}
