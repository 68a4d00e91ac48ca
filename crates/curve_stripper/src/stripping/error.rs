//! Stripping error types.
//!
//! Structured errors for dual-curve stripping with enough context (pair
//! index, leftover identity, last iterate) to diagnose a failed build.

use curve_core::market_data::MarketDataError;
use curve_core::types::time::Date;
use curve_core::types::SolverError;
use num_traits::Float;
use thiserror::Error;

/// Errors that can occur during dual-curve stripping.
///
/// # Variants
///
/// - `InsufficientInstruments`: fewer than two instruments supplied
/// - `InsufficientPairs`: no adjacent maturities within the pairing distance
/// - `SolverDidNotConverge`: a pair's coupled solve missed its termination
///   criterion
/// - `LeftoverSolveFailed`: a trailing leftover's one-dimensional solve
///   failed
/// - `FactoryRejected`: the curve factory refused a `(dates, abscissae)`
///   combination
/// - `Solver` / `MarketData`: wrapped lower-level errors
///
/// # Examples
///
/// ```
/// use curve_stripper::stripping::StripError;
///
/// let err = StripError::insufficient_instruments(1);
/// assert!(format!("{}", err).contains("1"));
/// assert!(err.is_insufficient_instruments());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StripError {
    /// Fewer than two instruments supplied.
    #[error("At least two instruments are required, got {provided}")]
    InsufficientInstruments {
        /// Number of instruments provided
        provided: usize,
    },

    /// Every adjacent maturity gap exceeded the pairing distance.
    #[error("No instrument pair formed within the pairing distance")]
    InsufficientPairs,

    /// A pair's coupled solve missed the termination criterion.
    #[error("Coupled solve for pair {pair_index} did not converge; last iterate {last_iterate:?}")]
    SolverDidNotConverge {
        /// Index of the failing pair, in paired-date order
        pair_index: usize,
        /// Last iterate of the multidimensional solver
        last_iterate: Vec<f64>,
    },

    /// A trailing leftover's one-dimensional solve failed.
    #[error("Leftover solve {leftover_index} maturing {end_date} failed: {source}")]
    LeftoverSolveFailed {
        /// Index of the failing leftover, in maturity order
        leftover_index: usize,
        /// The leftover instrument's end date
        end_date: Date,
        /// Underlying root-finder error
        #[source]
        source: SolverError,
    },

    /// The curve factory refused a `(dates, abscissae)` combination.
    #[error("Curve factory rejected inputs: {0}")]
    FactoryRejected(String),

    /// Wrapped solver error.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Wrapped market data error.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

impl StripError {
    /// Create an insufficient-instruments error.
    pub fn insufficient_instruments(provided: usize) -> Self {
        Self::InsufficientInstruments { provided }
    }

    /// Create a did-not-converge error from the solver's last iterate.
    pub fn solver_did_not_converge<T: Float>(pair_index: usize, last_iterate: &[T]) -> Self {
        Self::SolverDidNotConverge {
            pair_index,
            last_iterate: last_iterate
                .iter()
                .map(|v| v.to_f64().unwrap_or(f64::NAN))
                .collect(),
        }
    }

    /// Create a leftover-solve-failed error.
    pub fn leftover_solve_failed(
        leftover_index: usize,
        end_date: Date,
        source: SolverError,
    ) -> Self {
        Self::LeftoverSolveFailed {
            leftover_index,
            end_date,
            source,
        }
    }

    /// Create a factory-rejected error.
    pub fn factory_rejected(message: impl Into<String>) -> Self {
        Self::FactoryRejected(message.into())
    }

    /// Check if this is an insufficient-instruments error.
    pub fn is_insufficient_instruments(&self) -> bool {
        matches!(self, Self::InsufficientInstruments { .. })
    }

    /// Check if this is an insufficient-pairs error.
    pub fn is_insufficient_pairs(&self) -> bool {
        matches!(self, Self::InsufficientPairs)
    }

    /// Check if this is a did-not-converge error.
    pub fn is_solver_did_not_converge(&self) -> bool {
        matches!(self, Self::SolverDidNotConverge { .. })
    }

    /// Check if this is a leftover-solve-failed error.
    pub fn is_leftover_solve_failed(&self) -> bool {
        matches!(self, Self::LeftoverSolveFailed { .. })
    }

    /// Check if this is a factory-rejected error.
    pub fn is_factory_rejected(&self) -> bool {
        matches!(self, Self::FactoryRejected(_))
    }
}
