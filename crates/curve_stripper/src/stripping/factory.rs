//! Curve factory contract and the default zero-rate factory.

use curve_core::market_data::curves::{CurvePair, Interpolation, PillarCurve};
use curve_core::types::time::{Date, DayCount};
use num_traits::Float;

use super::error::StripError;

/// The curve-construction capability a stripper needs.
///
/// A factory turns two aligned `(dates, abscissae)` vectors into a
/// [`CurvePair`] and supplies the initial-guess abscissa values the solver
/// starts each pillar from. What an abscissa *means* (zero rate, discount
/// factor, forward rate) is the factory's business; the stripper only moves
/// them until instruments reprice.
///
/// Implementations should reject malformed shapes (length mismatch,
/// non-monotone dates) but accept any finite abscissa value: a
/// value-dependent rejection raised mid-solve surfaces as a solver failure
/// rather than a factory error.
pub trait DualCurveFactory<T: Float>: Send + Sync {
    /// Build a discounting/index curve pair from pillar dates and abscissae.
    ///
    /// `disc_dates` must align with `disc_abs`, and `idx_dates` with
    /// `idx_abs`; both date vectors must be strictly increasing.
    fn new_curves(
        &self,
        disc_dates: &[Date],
        disc_abs: &[T],
        idx_dates: &[Date],
        idx_abs: &[T],
    ) -> Result<CurvePair<T>, StripError>;

    /// Initial guess for a new discounting abscissa.
    fn discount_initial_guess(&self) -> T;

    /// Initial guess for a new index abscissa.
    fn index_initial_guess(&self) -> T;
}

impl<T: Float> std::fmt::Debug for dyn DualCurveFactory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualCurveFactory").finish()
    }
}

/// Default factory: abscissae are continuously compounded zero rates.
///
/// A pillar abscissa `r` at date `d` maps to the discount factor
/// `exp(-r * t)` where `t` is the ACT/365F year fraction from the anchor.
/// Curves are built with flat extrapolation enabled, which the staged
/// stripper relies on while early pillars are still being placed.
///
/// # Examples
///
/// ```
/// use curve_core::types::time::Date;
/// use curve_stripper::stripping::{DualCurveFactory, ZeroRateCurveFactory};
///
/// let anchor = Date::from_ymd(2024, 1, 2).unwrap();
/// let factory: ZeroRateCurveFactory<f64> = ZeroRateCurveFactory::new(anchor);
///
/// let dates = vec![anchor.add_days(365)];
/// let pair = factory
///     .new_curves(&dates, &[0.03], &dates, &[0.035])
///     .unwrap();
/// assert!(pair.index().df(1.0) < pair.discounting().df(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct ZeroRateCurveFactory<T: Float> {
    /// Valuation date the curves are anchored at
    anchor: Date,
    /// Interpolation method for both curves
    interpolation: Interpolation,
    /// Initial guess for discounting zero rates
    discount_guess: T,
    /// Initial guess for index zero rates
    index_guess: T,
}

impl<T: Float> ZeroRateCurveFactory<T> {
    /// Create a factory anchored at `anchor` with log-linear interpolation
    /// and 3% initial guesses.
    pub fn new(anchor: Date) -> Self {
        Self {
            anchor,
            interpolation: Interpolation::LogLinear,
            discount_guess: T::from(0.03).unwrap(),
            index_guess: T::from(0.03).unwrap(),
        }
    }

    /// Set the interpolation method.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set the initial-guess zero rates.
    pub fn with_guesses(mut self, discount_guess: T, index_guess: T) -> Self {
        self.discount_guess = discount_guess;
        self.index_guess = index_guess;
        self
    }

    /// The anchor (valuation) date.
    pub fn anchor(&self) -> Date {
        self.anchor
    }

    /// Build one curve from zero-rate abscissae.
    fn build_curve(&self, dates: &[Date], abscissae: &[T]) -> Result<PillarCurve<T>, StripError> {
        if dates.len() != abscissae.len() {
            return Err(StripError::factory_rejected(format!(
                "{} dates but {} abscissae",
                dates.len(),
                abscissae.len()
            )));
        }

        let discount_factors: Vec<T> = dates
            .iter()
            .zip(abscissae)
            .map(|(&date, &rate)| {
                let t: T = DayCount::Act365Fixed.year_fraction(self.anchor, date);
                (-rate * t).exp()
            })
            .collect();

        PillarCurve::new(
            self.anchor,
            dates.to_vec(),
            discount_factors,
            self.interpolation,
            true,
        )
        .map_err(|e| StripError::factory_rejected(e.to_string()))
    }
}

impl<T: Float + Send + Sync> DualCurveFactory<T> for ZeroRateCurveFactory<T> {
    fn new_curves(
        &self,
        disc_dates: &[Date],
        disc_abs: &[T],
        idx_dates: &[Date],
        idx_abs: &[T],
    ) -> Result<CurvePair<T>, StripError> {
        let discounting = self.build_curve(disc_dates, disc_abs)?;
        let index = self.build_curve(idx_dates, idx_abs)?;
        Ok(CurvePair::new(discounting, index))
    }

    fn discount_initial_guess(&self) -> T {
        self.discount_guess
    }

    fn index_initial_guess(&self) -> T {
        self.index_guess
    }
}
