//! Pillar-based yield curve implementation.
//!
//! `PillarCurve<T>` stores discount factors at discrete pillar dates and
//! interpolates between them. It is the curve representation produced by the
//! stripping factories.

use crate::market_data::error::MarketDataError;
use crate::types::time::{Date, DayCount};
use num_traits::Float;

use super::traits::YieldCurve;

/// Interpolation method between pillar discount factors.
///
/// # Variants
///
/// - `LogLinear`: linear on log(DF); equivalent to piecewise-constant forward
///   rates and arbitrage-free (default)
/// - `LinearZeroRate`: linear on continuously compounded zero rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Log-linear interpolation on discount factors.
    #[default]
    LogLinear,
    /// Linear interpolation on zero rates.
    LinearZeroRate,
}

/// A yield curve anchored at a valuation date with discount factors at
/// strictly increasing pillar dates.
///
/// Times are measured from the anchor with ACT/365F. Queries before the
/// first pillar or beyond the last use flat-rate extrapolation; the fallible
/// [`YieldCurve`] surface reports `OutOfBounds` instead when extrapolation
/// is disabled.
///
/// # Examples
///
/// ```
/// use curve_core::market_data::curves::{PillarCurve, YieldCurve};
/// use curve_core::types::time::Date;
///
/// let anchor = Date::from_ymd(2024, 1, 2).unwrap();
/// let curve: PillarCurve<f64> = PillarCurve::builder(anchor)
///     .pillar(anchor.add_days(365), 0.97)
///     .pillar(anchor.add_days(730), 0.94)
///     .build()
///     .unwrap();
///
/// let df = curve.discount_factor(1.5).unwrap();
/// assert!(df > 0.94 && df < 0.97);
/// ```
#[derive(Debug, Clone)]
pub struct PillarCurve<T: Float> {
    /// Valuation date the curve is anchored at
    anchor: Date,
    /// Pillar dates (strictly increasing, all after the anchor)
    dates: Vec<Date>,
    /// Pillar times in years from the anchor (ACT/365F)
    times: Vec<T>,
    /// Discount factors at each pillar
    discount_factors: Vec<T>,
    /// Interpolation method
    interpolation: Interpolation,
    /// Whether queries outside the pillar range are allowed
    allow_extrapolation: bool,
}

impl<T: Float> PillarCurve<T> {
    /// Create a new pillar curve.
    ///
    /// # Arguments
    ///
    /// * `anchor` - Valuation date (time zero)
    /// * `dates` - Pillar dates, strictly increasing and after the anchor
    /// * `discount_factors` - Positive discount factor per pillar
    /// * `interpolation` - Interpolation method
    /// * `allow_extrapolation` - Whether out-of-range queries are allowed
    pub fn new(
        anchor: Date,
        dates: Vec<Date>,
        discount_factors: Vec<T>,
        interpolation: Interpolation,
        allow_extrapolation: bool,
    ) -> Result<Self, MarketDataError> {
        if dates.len() != discount_factors.len() {
            return Err(MarketDataError::InvalidInput(format!(
                "pillar count ({}) must match discount factor count ({})",
                dates.len(),
                discount_factors.len()
            )));
        }

        if dates.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }

        if dates[0] <= anchor {
            return Err(MarketDataError::InvalidInput(format!(
                "first pillar {} must fall after the anchor {}",
                dates[0], anchor
            )));
        }

        for i in 1..dates.len() {
            if dates[i] <= dates[i - 1] {
                return Err(MarketDataError::InvalidInput(format!(
                    "pillar dates must be strictly increasing (at index {})",
                    i
                )));
            }
        }

        for (i, df) in discount_factors.iter().enumerate() {
            if *df <= T::zero() {
                return Err(MarketDataError::InvalidInput(format!(
                    "discount factor at index {} must be positive",
                    i
                )));
            }
        }

        let times = dates
            .iter()
            .map(|&d| DayCount::Act365Fixed.year_fraction(anchor, d))
            .collect();

        Ok(Self {
            anchor,
            dates,
            times,
            discount_factors,
            interpolation,
            allow_extrapolation,
        })
    }

    /// Create a curve builder anchored at `anchor`.
    pub fn builder(anchor: Date) -> PillarCurveBuilder<T> {
        PillarCurveBuilder::new(anchor)
    }

    /// Get the anchor (valuation) date.
    pub fn anchor(&self) -> Date {
        self.anchor
    }

    /// Get the pillar dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Get the pillar times in years from the anchor.
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Get the discount factors at the pillars.
    pub fn discount_factors_at_pillars(&self) -> &[T] {
        &self.discount_factors
    }

    /// Get the interpolation method.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Get the number of pillars.
    pub fn pillar_count(&self) -> usize {
        self.dates.len()
    }

    /// Year fraction (ACT/365F) from the anchor to `date`.
    pub fn time_of(&self, date: Date) -> T {
        DayCount::Act365Fixed.year_fraction(self.anchor, date)
    }

    /// Discount factor at time `t`, extrapolating flat outside the pillars.
    ///
    /// This is the infallible evaluation surface used inside pricing
    /// kernels: `t <= 0` maps to 1 and out-of-range times use flat-rate
    /// extrapolation regardless of the extrapolation flag.
    pub fn df(&self, t: T) -> T {
        if t <= T::zero() {
            return T::one();
        }

        let n = self.times.len();
        if t < self.times[0] {
            return self.extrapolate_left(t);
        }
        if t > self.times[n - 1] {
            return self.extrapolate_right(t);
        }

        let idx = self.find_bracket_index(t);
        if (t - self.times[idx]).abs() < T::from(1e-12).unwrap() {
            return self.discount_factors[idx];
        }

        match self.interpolation {
            Interpolation::LogLinear => self.log_linear_interpolate(t, idx),
            Interpolation::LinearZeroRate => self.linear_zero_rate_interpolate(t, idx),
        }
    }

    /// Discount factor at a calendar date, via [`Self::df`].
    pub fn df_at(&self, date: Date) -> T {
        self.df(self.time_of(date))
    }

    /// Find the index of the left bracketing pillar.
    fn find_bracket_index(&self, t: T) -> usize {
        let mut lo = 0;
        let mut hi = self.times.len() - 1;

        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if self.times[mid] <= t {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }

        lo
    }

    /// Log-linear interpolation (default).
    fn log_linear_interpolate(&self, t: T, idx: usize) -> T {
        let t1 = self.times[idx];
        let t2 = self.times[idx + 1];
        let log_df1 = self.discount_factors[idx].ln();
        let log_df2 = self.discount_factors[idx + 1].ln();

        let w = (t - t1) / (t2 - t1);
        (log_df1 * (T::one() - w) + log_df2 * w).exp()
    }

    /// Linear interpolation on zero rates.
    fn linear_zero_rate_interpolate(&self, t: T, idx: usize) -> T {
        let t1 = self.times[idx];
        let t2 = self.times[idx + 1];
        let r1 = -self.discount_factors[idx].ln() / t1;
        let r2 = -self.discount_factors[idx + 1].ln() / t2;

        let w = (t - t1) / (t2 - t1);
        let r = r1 * (T::one() - w) + r2 * w;
        (-r * t).exp()
    }

    /// Flat-rate extrapolation before the first pillar.
    fn extrapolate_left(&self, t: T) -> T {
        let r = -self.discount_factors[0].ln() / self.times[0];
        (-r * t).exp()
    }

    /// Flat-rate extrapolation beyond the last pillar.
    fn extrapolate_right(&self, t: T) -> T {
        let n = self.times.len();
        let r = -self.discount_factors[n - 1].ln() / self.times[n - 1];
        (-r * t).exp()
    }
}

impl<T: Float> YieldCurve<T> for PillarCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }

        let n = self.times.len();
        if !self.allow_extrapolation && t > T::zero() && (t < self.times[0] || t > self.times[n - 1])
        {
            return Err(MarketDataError::OutOfBounds {
                x: t.to_f64().unwrap_or(0.0),
                min: self.times[0].to_f64().unwrap_or(0.0),
                max: self.times[n - 1].to_f64().unwrap_or(0.0),
            });
        }

        Ok(self.df(t))
    }
}

/// Builder for constructing [`PillarCurve`].
#[derive(Debug, Clone)]
pub struct PillarCurveBuilder<T: Float> {
    anchor: Date,
    dates: Vec<Date>,
    discount_factors: Vec<T>,
    interpolation: Interpolation,
    allow_extrapolation: bool,
}

impl<T: Float> PillarCurveBuilder<T> {
    /// Create a new builder anchored at `anchor`.
    pub fn new(anchor: Date) -> Self {
        Self {
            anchor,
            dates: Vec::new(),
            discount_factors: Vec::new(),
            interpolation: Interpolation::LogLinear,
            allow_extrapolation: true,
        }
    }

    /// Add a pillar point.
    pub fn pillar(mut self, date: Date, discount_factor: T) -> Self {
        self.dates.push(date);
        self.discount_factors.push(discount_factor);
        self
    }

    /// Set the interpolation method.
    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set whether extrapolation is allowed.
    pub fn allow_extrapolation(mut self, allow: bool) -> Self {
        self.allow_extrapolation = allow;
        self
    }

    /// Build the curve.
    pub fn build(self) -> Result<PillarCurve<T>, MarketDataError> {
        PillarCurve::new(
            self.anchor,
            self.dates,
            self.discount_factors,
            self.interpolation,
            self.allow_extrapolation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn test_curve() -> PillarCurve<f64> {
        PillarCurve::builder(anchor())
            .pillar(anchor().add_days(365), 0.97)
            .pillar(anchor().add_days(730), 0.94)
            .pillar(anchor().add_days(1095), 0.91)
            .build()
            .unwrap()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_create_curve() {
        let curve = test_curve();
        assert_eq!(curve.pillar_count(), 3);
        assert_eq!(curve.anchor(), anchor());
    }

    #[test]
    fn test_create_curve_mismatched_lengths() {
        let result: Result<PillarCurve<f64>, _> = PillarCurve::new(
            anchor(),
            vec![anchor().add_days(365)],
            vec![0.97, 0.94],
            Interpolation::LogLinear,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_curve_empty() {
        let result: Result<PillarCurve<f64>, _> =
            PillarCurve::new(anchor(), vec![], vec![], Interpolation::LogLinear, true);
        assert!(matches!(
            result.unwrap_err(),
            MarketDataError::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_create_curve_unsorted_pillars() {
        let result: Result<PillarCurve<f64>, _> = PillarCurve::new(
            anchor(),
            vec![anchor().add_days(730), anchor().add_days(365)],
            vec![0.94, 0.97],
            Interpolation::LogLinear,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_curve_pillar_before_anchor() {
        let result: Result<PillarCurve<f64>, _> = PillarCurve::new(
            anchor(),
            vec![anchor().add_days(-10)],
            vec![0.99],
            Interpolation::LogLinear,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_curve_negative_df() {
        let result: Result<PillarCurve<f64>, _> = PillarCurve::new(
            anchor(),
            vec![anchor().add_days(365)],
            vec![-0.97],
            Interpolation::LogLinear,
            true,
        );
        assert!(result.is_err());
    }

    // ========================================
    // Discount Factor Tests
    // ========================================

    #[test]
    fn test_df_at_zero() {
        let curve = test_curve();
        assert!((curve.discount_factor(0.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_df_at_pillar_is_exact() {
        use approx::assert_relative_eq;

        let curve = test_curve();
        let t = curve.times()[1];
        assert_relative_eq!(curve.discount_factor(t).unwrap(), 0.94, epsilon = 1e-12);
    }

    #[test]
    fn test_df_at_date_is_exact() {
        let curve = test_curve();
        assert!((curve.df_at(anchor().add_days(365)) - 0.97).abs() < 1e-12);
    }

    #[test]
    fn test_df_interpolated_is_bracketed() {
        let curve = test_curve();
        let t = (curve.times()[0] + curve.times()[1]) / 2.0;
        let df = curve.discount_factor(t).unwrap();
        assert!(df > 0.94 && df < 0.97);
    }

    #[test]
    fn test_df_extrapolated_left() {
        let curve = test_curve();
        let df = curve.discount_factor(0.5).unwrap();
        assert!(df > 0.97 && df < 1.0);
    }

    #[test]
    fn test_df_extrapolated_right() {
        let curve = test_curve();
        let df = curve.discount_factor(4.0).unwrap();
        assert!(df > 0.0 && df < 0.91);
    }

    #[test]
    fn test_df_no_extrapolation_error() {
        let curve: PillarCurve<f64> = PillarCurve::builder(anchor())
            .pillar(anchor().add_days(365), 0.97)
            .pillar(anchor().add_days(730), 0.94)
            .allow_extrapolation(false)
            .build()
            .unwrap();
        assert!(curve.discount_factor(3.0).is_err());
        assert!(curve.discount_factor(0.5).is_err());
    }

    #[test]
    fn test_df_negative_maturity() {
        let curve = test_curve();
        assert!(curve.discount_factor(-1.0).is_err());
    }

    #[test]
    fn test_infallible_df_ignores_extrapolation_flag() {
        let curve: PillarCurve<f64> = PillarCurve::builder(anchor())
            .pillar(anchor().add_days(365), 0.97)
            .allow_extrapolation(false)
            .build()
            .unwrap();
        // df() always extrapolates flat
        let df = curve.df(2.0);
        assert!(df > 0.0 && df < 0.97);
    }

    // ========================================
    // Interpolation Method Tests
    // ========================================

    #[test]
    fn test_linear_zero_rate_interpolation() {
        let curve: PillarCurve<f64> = PillarCurve::builder(anchor())
            .pillar(anchor().add_days(365), 0.97)
            .pillar(anchor().add_days(730), 0.94)
            .interpolation(Interpolation::LinearZeroRate)
            .build()
            .unwrap();
        let df = curve.discount_factor(1.5).unwrap();
        assert!(df > 0.94 && df < 0.97);
    }

    #[test]
    fn test_log_linear_matches_constant_rate() {
        let rate = 0.03;
        let d1 = anchor().add_days(365);
        let d2 = anchor().add_days(1095);
        let curve: PillarCurve<f64> = PillarCurve::builder(anchor())
            .pillar(d1, (-rate * 365.0 / 365.0_f64).exp())
            .pillar(d2, (-rate * 1095.0 / 365.0_f64).exp())
            .build()
            .unwrap();

        // Log-linear on a constant-rate curve reproduces the rate everywhere
        let t = 2.0;
        let df = curve.discount_factor(t).unwrap();
        assert!((df - (-rate * t).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_and_forward_rate() {
        let rate = 0.04;
        let curve: PillarCurve<f64> = PillarCurve::builder(anchor())
            .pillar(anchor().add_days(365), (-rate * 1.0_f64).exp())
            .pillar(anchor().add_days(730), (-rate * 2.0_f64).exp())
            .build()
            .unwrap();

        let t1 = curve.times()[0];
        let t2 = curve.times()[1];
        assert!((curve.zero_rate(t1).unwrap() - rate).abs() < 1e-10);
        assert!((curve.forward_rate(t1, t2).unwrap() - rate).abs() < 1e-10);
    }

    // ========================================
    // Clone Tests
    // ========================================

    #[test]
    fn test_clone() {
        let curve1 = test_curve();
        let curve2 = curve1.clone();
        assert_eq!(curve1.pillar_count(), curve2.pillar_count());
    }
}
