//! Exit codes for dispatch outcomes.

use alphamath_core::constants::exit_codes;
use alphamath_dispatch::ErrorKind;

/// Exit code for an outcome that ended in an error of `kind`.
#[must_use]
pub fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Selection | ErrorKind::NotFound | ErrorKind::EntryPointMissing => {
            exit_codes::ERROR_CONFIG
        }
        ErrorKind::Validation => exit_codes::ERROR_VALIDATION,
        ErrorKind::Computation | ErrorKind::Busy => exit_codes::ERROR_GENERIC,
        ErrorKind::Cancelled => exit_codes::ERROR_CANCELED,
        ErrorKind::Timeout => exit_codes::ERROR_TIMEOUT,
    }
}

/// Exit code for the last presented outcome; success when nothing failed.
#[must_use]
pub fn exit_code_for(last_error: Option<ErrorKind>) -> i32 {
    last_error.map_or(exit_codes::SUCCESS, exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(exit_code(ErrorKind::Cancelled), 130);
        assert_eq!(exit_code(ErrorKind::Timeout), 2);
        assert_eq!(exit_code(ErrorKind::Validation), 3);
        assert_eq!(exit_code(ErrorKind::Selection), 4);
        assert_eq!(exit_code(ErrorKind::NotFound), 4);
        assert_eq!(exit_code(ErrorKind::Computation), 1);
    }

    #[test]
    fn no_error_is_success() {
        assert_eq!(exit_code_for(None), 0);
        assert_eq!(exit_code_for(Some(ErrorKind::EntryPointMissing)), 4);
    }
}
