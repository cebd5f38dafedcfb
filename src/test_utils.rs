// src/test_utils.rs

//! This module contains utilities for testing.

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f64 = 1e-5;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
pub fn value_close(target: f64, value: f64) -> bool {
    (target - value).abs() < TEST_TOLERANCE
}

/// Checks if two floating point numbers are not close enough to be
/// considered equal.
pub fn value_not_close(target: f64, value: f64) -> bool {
    TEST_TOLERANCE <= (target - value).abs()
}

/// Checks if each of the components in a vector is close enough to be
/// considered equal.
pub fn vector_close(target: (f64, f64, f64), value: (f64, f64, f64)) -> bool {
    value_close(target.0, value.0)
        && value_close(target.1, value.1)
        && value_close(target.2, value.2)
}

/// Checks if each of the four motor duties is close enough to be
/// considered equal.
pub fn quad_close(target: [f64; 4], value: [f64; 4]) -> bool {
    target
        .iter()
        .zip(value.iter())
        .all(|(t, v)| value_close(*t, *v))
}
