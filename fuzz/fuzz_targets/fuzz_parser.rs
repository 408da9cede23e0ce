#![no_main]

use libfuzzer_sys::fuzz_target;

use alphamath_core::algebra::{parse, parse_equation, Dialect};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if input.len() > 256 {
        return;
    }

    // Parse errors are fine; panics are not.
    let _ = parse(input, Dialect::Polynomial);
    let _ = parse_equation(input, Dialect::Polynomial);
    if let Ok(expr) = parse(input, Dialect::Trigonometric) {
        let _ = expr.eval();
    }
});
