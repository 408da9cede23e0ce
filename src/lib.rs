//! Cross-crate golden and integration tests for AlphaMath live in `tests/`.
