//! Payment schedule generation.
//!
//! Generates the regular accrual periods of a swap leg by stepping calendar
//! months from the effective date, with a short final stub when the
//! termination date is not a whole number of periods away. Business-day
//! calendars and roll conventions are deliberately out of scope; dates are
//! used unadjusted.

use curve_core::types::time::Date;
use curve_core::types::DateError;
use std::fmt;
use thiserror::Error;

/// Schedule construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Termination does not follow the effective date.
    #[error("Termination {termination} must fall after effective {effective}")]
    InvalidRange {
        /// Schedule start date
        effective: Date,
        /// Schedule end date
        termination: Date,
    },

    /// Date arithmetic failed.
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}

/// Payment frequency of a swap leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frequency {
    /// Annual payments.
    #[default]
    Annual,
    /// Semi-annual payments.
    SemiAnnual,
    /// Quarterly payments.
    Quarterly,
    /// Monthly payments.
    Monthly,
}

impl Frequency {
    /// Number of calendar months in one period.
    pub fn months(&self) -> u32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
        }
    }

    /// Number of payments per year.
    pub fn payments_per_year(&self) -> usize {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Frequency name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "SemiAnnual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single accrual period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Accrual start date.
    pub start: Date,
    /// Accrual end date (payment date).
    pub end: Date,
}

/// A payment schedule: contiguous accrual periods from the effective date
/// to the termination date.
///
/// # Examples
///
/// ```
/// use curve_core::types::time::Date;
/// use curve_instruments::schedules::{Frequency, Schedule};
///
/// let effective = Date::from_ymd(2024, 1, 15).unwrap();
/// let termination = Date::from_ymd(2026, 1, 15).unwrap();
///
/// let schedule = Schedule::generate(effective, termination, Frequency::SemiAnnual).unwrap();
/// assert_eq!(schedule.len(), 4);
/// assert_eq!(schedule.termination(), termination);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    periods: Vec<Period>,
}

impl Schedule {
    /// Generate a schedule by stepping `frequency` months forward from
    /// `effective`, truncating the final period at `termination`.
    pub fn generate(
        effective: Date,
        termination: Date,
        frequency: Frequency,
    ) -> Result<Self, ScheduleError> {
        if termination <= effective {
            return Err(ScheduleError::InvalidRange {
                effective,
                termination,
            });
        }

        let step = frequency.months();
        let mut periods = Vec::new();
        let mut period_start = effective;
        let mut k: u32 = 0;

        loop {
            k += 1;
            let unadjusted = effective.add_months(k * step)?;
            let period_end = unadjusted.min(termination);
            periods.push(Period {
                start: period_start,
                end: period_end,
            });
            if period_end >= termination {
                break;
            }
            period_start = period_end;
        }

        Ok(Self { periods })
    }

    /// The accrual periods in order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the schedule has no periods. Generated schedules always have
    /// at least one.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The effective (first accrual start) date.
    pub fn effective(&self) -> Date {
        self.periods[0].start
    }

    /// The termination (last payment) date.
    pub fn termination(&self) -> Date {
        self.periods[self.periods.len() - 1].end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    // ========================================
    // Frequency Tests
    // ========================================

    #[test]
    fn test_frequency_months() {
        assert_eq!(Frequency::Annual.months(), 12);
        assert_eq!(Frequency::SemiAnnual.months(), 6);
        assert_eq!(Frequency::Quarterly.months(), 3);
        assert_eq!(Frequency::Monthly.months(), 1);
    }

    #[test]
    fn test_frequency_payments_per_year() {
        assert_eq!(Frequency::Annual.payments_per_year(), 1);
        assert_eq!(Frequency::Quarterly.payments_per_year(), 4);
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(format!("{}", Frequency::Quarterly), "Quarterly");
    }

    // ========================================
    // Schedule Generation Tests
    // ========================================

    #[test]
    fn test_regular_annual_schedule() {
        let schedule =
            Schedule::generate(date(2024, 1, 15), date(2027, 1, 15), Frequency::Annual).unwrap();

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.effective(), date(2024, 1, 15));
        assert_eq!(schedule.termination(), date(2027, 1, 15));
        assert_eq!(schedule.periods()[0].end, date(2025, 1, 15));
        assert_eq!(schedule.periods()[1].end, date(2026, 1, 15));
    }

    #[test]
    fn test_quarterly_schedule() {
        let schedule =
            Schedule::generate(date(2024, 1, 15), date(2025, 1, 15), Frequency::Quarterly)
                .unwrap();

        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.periods()[0].end, date(2024, 4, 15));
    }

    #[test]
    fn test_short_final_stub() {
        // 14 months at annual frequency: one full year plus a 2-month stub
        let schedule =
            Schedule::generate(date(2024, 1, 15), date(2025, 3, 15), Frequency::Annual).unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.periods()[0].end, date(2025, 1, 15));
        assert_eq!(schedule.periods()[1].start, date(2025, 1, 15));
        assert_eq!(schedule.periods()[1].end, date(2025, 3, 15));
    }

    #[test]
    fn test_sub_period_schedule() {
        // Termination before the first regular payment date
        let schedule =
            Schedule::generate(date(2024, 1, 15), date(2024, 4, 1), Frequency::Annual).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.periods()[0].start, date(2024, 1, 15));
        assert_eq!(schedule.periods()[0].end, date(2024, 4, 1));
    }

    #[test]
    fn test_periods_are_contiguous() {
        let schedule =
            Schedule::generate(date(2024, 1, 31), date(2026, 7, 10), Frequency::Quarterly)
                .unwrap();

        for pair in schedule.periods().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(schedule.termination(), date(2026, 7, 10));
    }

    #[test]
    fn test_invalid_range() {
        let result = Schedule::generate(date(2024, 1, 15), date(2024, 1, 15), Frequency::Annual);
        assert!(matches!(
            result.unwrap_err(),
            ScheduleError::InvalidRange { .. }
        ));
    }

    #[test]
    fn test_end_of_month_clamping() {
        // Jan 31 + 1 month clamps to Feb 29 (leap year)
        let schedule =
            Schedule::generate(date(2024, 1, 31), date(2024, 4, 30), Frequency::Monthly).unwrap();

        assert_eq!(schedule.periods()[0].end, date(2024, 2, 29));
        // Month stepping is measured from the effective date, not the
        // previous clamped end
        assert_eq!(schedule.periods()[1].end, date(2024, 3, 31));
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        /// Generated schedules cover [effective, termination] exactly, with
        /// contiguous periods, for any span and frequency.
        #[test]
        fn prop_schedule_covers_range(
            span_days in 1_i64..4000,
            freq_idx in 0_usize..4,
        ) {
            let frequency = [
                Frequency::Annual,
                Frequency::SemiAnnual,
                Frequency::Quarterly,
                Frequency::Monthly,
            ][freq_idx];

            let effective = date(2024, 1, 2);
            let termination = effective.add_days(span_days);
            let schedule = Schedule::generate(effective, termination, frequency).unwrap();

            prop_assert_eq!(schedule.effective(), effective);
            prop_assert_eq!(schedule.termination(), termination);
            for pair in schedule.periods().windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            for period in schedule.periods() {
                prop_assert!(period.start < period.end);
            }
        }
    }
}
