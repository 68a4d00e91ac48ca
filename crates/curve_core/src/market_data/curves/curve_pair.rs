//! Discounting/index curve pair for multi-curve pricing.

use num_traits::Float;

use super::pillar::PillarCurve;

/// An immutable pair of curves for multi-curve pricing: one for discounting
/// cash flows, one for projecting floating-rate fixings.
///
/// In the multi-curve framework the two roles are served by different
/// curves: present values are discounted off the funding (e.g. OIS) curve
/// while floating cash flows are forecast off the index curve.
///
/// # Examples
///
/// ```
/// use curve_core::market_data::curves::{CurvePair, PillarCurve};
/// use curve_core::types::time::Date;
///
/// let anchor = Date::from_ymd(2024, 1, 2).unwrap();
/// let discounting: PillarCurve<f64> = PillarCurve::builder(anchor)
///     .pillar(anchor.add_days(365), 0.97)
///     .build()
///     .unwrap();
/// let index = discounting.clone();
///
/// let pair = CurvePair::new(discounting, index);
/// assert_eq!(pair.discounting().pillar_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CurvePair<T: Float> {
    /// Curve used to discount cash flows
    discounting: PillarCurve<T>,
    /// Curve used to project floating-rate fixings
    index: PillarCurve<T>,
}

impl<T: Float> CurvePair<T> {
    /// Create a new curve pair.
    pub fn new(discounting: PillarCurve<T>, index: PillarCurve<T>) -> Self {
        Self { discounting, index }
    }

    /// Get the discounting curve.
    pub fn discounting(&self) -> &PillarCurve<T> {
        &self.discounting
    }

    /// Get the index (projection) curve.
    pub fn index(&self) -> &PillarCurve<T> {
        &self.index
    }

    /// Consume the pair, returning `(discounting, index)`.
    pub fn into_parts(self) -> (PillarCurve<T>, PillarCurve<T>) {
        (self.discounting, self.index)
    }
}
