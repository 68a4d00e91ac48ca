//! Calibration instrument contract.

use curve_core::market_data::curves::CurvePair;
use curve_core::types::time::Date;
use num_traits::Float;
use std::sync::Arc;

/// Shared handle to a calibration instrument.
pub type InstrumentHandle<T> = Arc<dyn CalibrationInstrument<T>>;

/// The capability a stripping engine needs from a rate instrument.
///
/// An instrument exposes its maturity date and, given a candidate pair of
/// curves, the deviation of its mark-to-market from zero. The stripper
/// drives that value difference to zero at every pillar.
///
/// Implementations must be immutable: the stripper evaluates the same
/// instrument many times against different candidate curves and relies on
/// the residual being a pure function of the curve pair.
pub trait CalibrationInstrument<T: Float>: Send + Sync {
    /// The instrument's end (maturity) date.
    fn end(&self) -> Date;

    /// Mark-to-market deviation from zero under the candidate curves,
    /// per unit notional.
    ///
    /// Curves supplied by the stripper extrapolate flat outside their
    /// pillar range, so evaluation is total.
    fn value_diff(&self, curves: &CurvePair<T>) -> T;
}

impl<T: Float> std::fmt::Debug for dyn CalibrationInstrument<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationInstrument")
            .field("end", &self.end())
            .finish()
    }
}
