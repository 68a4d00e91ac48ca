//! Par swap instruments for curve calibration.
//!
//! Two instrument types cover the two calibration roles:
//!
//! - [`OvernightIndexSwap`]: fixed vs. compounded overnight; both legs live
//!   on the discounting curve, so its residual pins a discounting pillar.
//! - [`VanillaSwap`]: fixed vs. floating projected off the index curve and
//!   discounted off the discounting curve; its residual couples both curves.
//!
//! Both price per unit notional from the receive-float side. The floating
//! legs use the standard discount-factor identities: a compounded overnight
//! leg telescopes to `D(start) - D(end)`, and a projected floating coupon is
//! `(I(t_start) / I(t_end) - 1) * D(t_end)` on the accrual period.

use curve_core::market_data::curves::{CurvePair, PillarCurve};
use curve_core::types::time::{Date, DayCount};
use num_traits::Float;

use crate::schedules::{Frequency, Schedule, ScheduleError};
use crate::traits::CalibrationInstrument;

/// Fixed-vs-overnight par swap.
///
/// The overnight leg compounds the rate the discounting curve itself
/// projects, so the swap's value depends only on the discounting curve.
///
/// # Examples
///
/// ```
/// use curve_core::types::time::Date;
/// use curve_instruments::traits::CalibrationInstrument;
/// use curve_instruments::OvernightIndexSwap;
///
/// let effective = Date::from_ymd(2024, 1, 2).unwrap();
/// let swap: OvernightIndexSwap<f64> =
///     OvernightIndexSwap::new(effective, effective.add_days(365), 0.03).unwrap();
/// assert_eq!(swap.end(), effective.add_days(365));
/// ```
#[derive(Debug, Clone)]
pub struct OvernightIndexSwap<T: Float> {
    /// Start of the first accrual period
    effective: Date,
    /// Maturity date
    termination: Date,
    /// Fixed rate (decimal, e.g. 0.03 for 3%)
    fixed_rate: T,
    /// Fixed leg payment schedule
    fixed_schedule: Schedule,
    /// Fixed leg accrual convention
    day_count: DayCount,
}

impl<T: Float> OvernightIndexSwap<T> {
    /// Create an OIS with market-standard conventions: annual fixed leg,
    /// ACT/360 accruals.
    pub fn new(effective: Date, termination: Date, fixed_rate: T) -> Result<Self, ScheduleError> {
        Self::with_conventions(
            effective,
            termination,
            fixed_rate,
            Frequency::Annual,
            DayCount::Act360,
        )
    }

    /// Create an OIS with explicit fixed-leg conventions.
    pub fn with_conventions(
        effective: Date,
        termination: Date,
        fixed_rate: T,
        frequency: Frequency,
        day_count: DayCount,
    ) -> Result<Self, ScheduleError> {
        let fixed_schedule = Schedule::generate(effective, termination, frequency)?;
        Ok(Self {
            effective,
            termination,
            fixed_rate,
            fixed_schedule,
            day_count,
        })
    }

    /// The fixed rate.
    pub fn fixed_rate(&self) -> T {
        self.fixed_rate
    }

    /// Present value of the fixed leg per unit rate (the annuity).
    fn annuity(&self, discounting: &PillarCurve<T>) -> T {
        self.fixed_schedule
            .periods()
            .iter()
            .fold(T::zero(), |acc, p| {
                let accrual: T = self.day_count.year_fraction(p.start, p.end);
                acc + accrual * discounting.df_at(p.end)
            })
    }

    /// Par fixed rate implied by the discounting curve.
    pub fn par_rate(&self, curves: &CurvePair<T>) -> T {
        let discounting = curves.discounting();
        let float_pv = discounting.df_at(self.effective) - discounting.df_at(self.termination);
        float_pv / self.annuity(discounting)
    }
}

impl<T: Float + Send + Sync> CalibrationInstrument<T> for OvernightIndexSwap<T> {
    fn end(&self) -> Date {
        self.termination
    }

    fn value_diff(&self, curves: &CurvePair<T>) -> T {
        let discounting = curves.discounting();
        // Compounded overnight leg telescopes to D(start) - D(end)
        let float_pv = discounting.df_at(self.effective) - discounting.df_at(self.termination);
        float_pv - self.fixed_rate * self.annuity(discounting)
    }
}

/// Fixed-vs-floating par swap in the multi-curve framework.
///
/// Floating fixings are projected off the index curve; both legs are
/// discounted off the discounting curve.
#[derive(Debug, Clone)]
pub struct VanillaSwap<T: Float> {
    /// Maturity date
    termination: Date,
    /// Fixed rate (decimal)
    fixed_rate: T,
    /// Fixed leg schedule
    fixed_schedule: Schedule,
    /// Floating leg schedule
    float_schedule: Schedule,
    /// Fixed leg accrual convention
    fixed_day_count: DayCount,
}

impl<T: Float> VanillaSwap<T> {
    /// Create a vanilla swap with market-standard conventions: annual
    /// 30/360 fixed leg, quarterly floating leg.
    ///
    /// The floating coupons come straight from discount-factor ratios, so
    /// no floating accrual convention is needed.
    pub fn new(effective: Date, termination: Date, fixed_rate: T) -> Result<Self, ScheduleError> {
        Self::with_conventions(
            effective,
            termination,
            fixed_rate,
            Frequency::Annual,
            DayCount::Thirty360,
            Frequency::Quarterly,
        )
    }

    /// Create a vanilla swap with explicit leg conventions.
    pub fn with_conventions(
        effective: Date,
        termination: Date,
        fixed_rate: T,
        fixed_frequency: Frequency,
        fixed_day_count: DayCount,
        float_frequency: Frequency,
    ) -> Result<Self, ScheduleError> {
        let fixed_schedule = Schedule::generate(effective, termination, fixed_frequency)?;
        let float_schedule = Schedule::generate(effective, termination, float_frequency)?;
        Ok(Self {
            termination,
            fixed_rate,
            fixed_schedule,
            float_schedule,
            fixed_day_count,
        })
    }

    /// The fixed rate.
    pub fn fixed_rate(&self) -> T {
        self.fixed_rate
    }

    /// Present value of the fixed leg per unit rate (the annuity).
    fn annuity(&self, discounting: &PillarCurve<T>) -> T {
        self.fixed_schedule
            .periods()
            .iter()
            .fold(T::zero(), |acc, p| {
                let accrual: T = self.fixed_day_count.year_fraction(p.start, p.end);
                acc + accrual * discounting.df_at(p.end)
            })
    }

    /// Present value of the floating leg.
    fn floating_pv(&self, discounting: &PillarCurve<T>, index: &PillarCurve<T>) -> T {
        self.float_schedule
            .periods()
            .iter()
            .fold(T::zero(), |acc, p| {
                // Projected coupon over the period: I(start)/I(end) - 1
                let projected = index.df_at(p.start) / index.df_at(p.end) - T::one();
                acc + projected * discounting.df_at(p.end)
            })
    }

    /// Par fixed rate implied by the curve pair.
    pub fn par_rate(&self, curves: &CurvePair<T>) -> T {
        let discounting = curves.discounting();
        self.floating_pv(discounting, curves.index()) / self.annuity(discounting)
    }
}

impl<T: Float + Send + Sync> CalibrationInstrument<T> for VanillaSwap<T> {
    fn end(&self) -> Date {
        self.termination
    }

    fn value_diff(&self, curves: &CurvePair<T>) -> T {
        let discounting = curves.discounting();
        self.floating_pv(discounting, curves.index())
            - self.fixed_rate * self.annuity(discounting)
    }
}
