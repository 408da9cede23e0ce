//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use alphamath_cli::OutputFormat;
use alphamath_dispatch::{GatewayOptions, OverlapPolicy};

/// AlphaMath — dispatch input to number-theory and polynomial modules.
///
/// Without `--input` an interactive shell starts; `--module` then
/// preselects the active module.
#[derive(Parser, Debug)]
#[command(name = "alphamath", version, about)]
pub struct AppConfig {
    /// Module to run, by menu label or id (e.g. "Cubic" or "cubic").
    #[arg(short, long, env = "ALPHAMATH_MODULE")]
    pub module: Option<String>,

    /// Input text for a one-shot run.
    #[arg(short, long, allow_hyphen_values = true)]
    pub input: Option<String>,

    /// Algebra workspace mode: expand, simplify, factor or substitute.
    #[arg(long)]
    pub mode: Option<String>,

    /// List the available modules and exit.
    #[arg(short, long)]
    pub list: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (only output the result).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Cancel a computation after this long (e.g. "30s", "5m", "500ms").
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// What to do when input arrives while a computation runs: race or reject.
    #[arg(long, default_value = "race")]
    pub overlap: OverlapPolicy,

    /// Also write successful results to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    #[must_use]
    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions {
            overlap: self.overlap,
            timeout: self.timeout,
        }
    }

    /// A one-shot run submits once and exits; otherwise the shell starts.
    #[must_use]
    pub fn is_one_shot(&self) -> bool {
        self.input.is_some()
    }
}

/// Parse a duration string like "5m", "1h", "30s", "500ms".
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let invalid = || format!("invalid duration '{s}' (expected e.g. 500ms, 30s, 5m, 1h)");
    let number = |digits: &str| digits.trim().parse::<u64>().map_err(|_| invalid());
    let seconds = |digits: &str, scale: u64| {
        number(digits)?
            .checked_mul(scale)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration '{s}' is too large"))
    };
    if let Some(ms) = s.strip_suffix("ms") {
        Ok(Duration::from_millis(number(ms)?))
    } else if let Some(mins) = s.strip_suffix('m') {
        seconds(mins, 60)
    } else if let Some(hours) = s.strip_suffix('h') {
        seconds(hours, 3600)
    } else if let Some(secs) = s.strip_suffix('s') {
        seconds(secs, 1)
    } else {
        seconds(s, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("alphamath").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn parse_duration_formats() {
        assert_eq!(parse_duration("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("12"), Ok(Duration::from_secs(12)));
    }

    #[test]
    fn parse_duration_ms() {
        assert_eq!(parse_duration("1ms"), Ok(Duration::from_millis(1)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn parse_duration_rejects_overflow() {
        let err = parse_duration("307445734561825861m").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("5124095576030432h").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
        let args = ["alphamath", "--timeout", "307445734561825861m"];
        assert!(AppConfig::try_parse_from(args).is_err());
    }

    #[test]
    fn one_shot_flags() {
        let cfg = config(&["--module", "CRT", "--input", "2 3 3 5", "--json"]);
        assert_eq!(cfg.module.as_deref(), Some("CRT"));
        assert!(cfg.is_one_shot());
        assert_eq!(cfg.format(), OutputFormat::Json);
        assert_eq!(cfg.gateway_options().overlap, OverlapPolicy::Race);
        assert_eq!(cfg.gateway_options().timeout, None);
    }

    #[test]
    fn input_may_start_with_minus() {
        let cfg = config(&["-m", "cubic", "-i", "-x^3 + 1"]);
        assert_eq!(cfg.input.as_deref(), Some("-x^3 + 1"));
    }

    #[test]
    fn overlap_and_timeout() {
        let cfg = config(&["--overlap", "reject", "--timeout", "250ms"]);
        assert!(!cfg.is_one_shot());
        let options = cfg.gateway_options();
        assert_eq!(options.overlap, OverlapPolicy::Reject);
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn bad_overlap_is_a_usage_error() {
        assert!(AppConfig::try_parse_from(["alphamath", "--overlap", "queue"]).is_err());
    }
}
