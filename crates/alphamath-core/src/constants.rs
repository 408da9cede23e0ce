//! Constants shared by the providers and the binary.

/// Maximum number of congruence solutions listed individually.
pub const MAX_LISTED_SOLUTIONS: usize = 1_000;

/// Evaluation points used by the Sturm module when none are given.
pub const DEFAULT_STURM_POINTS: [i64; 9] = [-4, -3, -2, -1, 0, 1, 2, 3, 4];

/// Largest magnitude for which rational-root candidates are enumerated.
pub const MAX_ROOT_SEARCH: u64 = 1_000_000_000_000;

/// Upper bound on numerator/denominator candidate pairs tried for rational roots.
pub const MAX_ROOT_CANDIDATES: usize = 200_000;

/// Largest exponent, and largest total degree, accepted when expanding
/// polynomials.
pub const MAX_EXPONENT: u32 = 256;

/// Estimated coefficient size, in bits, above which a power is not expanded.
pub const MAX_COEFFICIENT_BITS: u64 = 1 << 18;

/// Expression evaluated by the trigonometric calculator on empty input.
pub const DEFAULT_TRIG_EXPRESSION: &str = "sin(4pi) + cos(pi/3)";

/// Mode used by the algebra provider when none is given.
pub const DEFAULT_ALGEBRA_MODE: &str = "expand";

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// The computation reported a failure.
    pub const ERROR_GENERIC: i32 = 1;
    /// Computation timed out.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// Input did not satisfy the module's argument policy.
    pub const ERROR_VALIDATION: i32 = 3;
    /// Invalid configuration, unknown module or no module selected.
    pub const ERROR_CONFIG: i32 = 4;
    /// Computation cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
