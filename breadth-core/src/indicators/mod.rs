//! Moving-average indicators used by the breadth calculator.
//!
//! Inputs are nullable close series straight from a `PriceTable` column, so
//! undefined values are `None` rather than NaN.

pub mod sma;

pub use sma::{RollingWindow, Sma};

/// Wrap plain closes as a fully-populated nullable series for tests.
#[cfg(test)]
pub fn closes(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
