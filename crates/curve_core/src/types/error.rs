//! Error types for dates and numerical solvers.

use thiserror::Error;

/// Errors raised by root-finding and least-squares solvers.
///
/// # Variants
///
/// - `NoBracket`: the supplied (or expanded) interval does not bracket a root
/// - `MaxIterationsExceeded`: the iteration budget ran out before convergence
/// - `DerivativeNearZero`: a derivative-based step degenerated
/// - `NumericalInstability`: a non-finite value or singular system appeared
///
/// # Examples
///
/// ```
/// use curve_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// No sign change between the bracket endpoints.
    #[error("No bracket: f({a}) and f({b}) have the same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Iteration budget exhausted before the termination criterion was met.
    #[error("Maximum iterations exceeded: {iterations}")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative too small for a stable update.
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// Point where the derivative degenerated
        x: f64,
    },

    /// Non-finite value or singular linear system encountered.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Date construction and parsing errors.
///
/// # Variants
///
/// - `InvalidDate`: invalid calendar components (e.g. February 30th)
/// - `ParseError`: failed to parse a date string
/// - `OutOfRange`: arithmetic left the representable date range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components.
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse a date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Date arithmetic left the representable range.
    #[error("Date out of range: {0}")]
    OutOfRange(String),
}
