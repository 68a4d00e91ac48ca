//! Dates and day count conventions.
//!
//! This module provides:
//! - `Date`: type-safe date wrapper around `chrono::NaiveDate` with a
//!   monotone serial-day representation for ordering and subtraction
//! - `DayCount`: industry-standard day count conventions
//!
//! # Examples
//!
//! ```
//! use curve_core::types::time::{Date, DayCount};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! assert_eq!(end - start, 182);
//!
//! let yf: f64 = DayCount::Act365Fixed.year_fraction(start, end);
//! assert!((yf - 182.0 / 365.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, Months, NaiveDate};
use num_traits::Float;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around `chrono::NaiveDate`.
///
/// Every date embeds into a monotone serial-day integer (`serial_day`), so
/// ordering and day subtraction are plain integer arithmetic. Calendar
/// semantics beyond that are delegated to chrono.
///
/// # Examples
///
/// ```
/// use curve_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// assert_eq!(date.year(), 2024);
///
/// // Serial-day round trip
/// let same = Date::from_serial(date.serial_day()).unwrap();
/// assert_eq!(date, same);
///
/// // Day subtraction
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a date from year, month, and day components.
    ///
    /// # Examples
    ///
    /// ```
    /// use curve_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2024, 2, 29).unwrap();
    /// assert_eq!(date.day(), 29);
    ///
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Creates a date from its serial-day number (days from 0001-01-01 CE,
    /// where that date is day 1).
    pub fn from_serial(serial: i64) -> Result<Self, DateError> {
        let days = i32::try_from(serial)
            .map_err(|_| DateError::OutOfRange(format!("serial day {}", serial)))?;
        NaiveDate::from_num_days_from_ce_opt(days)
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("serial day {}", serial)))
    }

    /// Parses a date from an ISO 8601 string (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the monotone serial-day number of this date.
    ///
    /// The serial supports ordering and day-count subtraction:
    /// `a.serial_day() - b.serial_day()` equals the number of days from
    /// `b` to `a`.
    pub fn serial_day(&self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day-of-month component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns this date shifted by a number of calendar days.
    pub fn add_days(self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Returns this date shifted forward by a number of calendar months.
    ///
    /// The day-of-month is clamped to the target month's length, following
    /// chrono's month arithmetic.
    pub fn add_months(self, months: u32) -> Result<Self, DateError> {
        self.0
            .checked_add_months(Months::new(months))
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} + {} months", self, months)))
    }

    /// Returns the underlying `NaiveDate`.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of days from `rhs` to `self`.
    fn sub(self, rhs: Date) -> i64 {
        self.0.signed_duration_since(rhs.0).num_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

/// Day count conventions for accrual-fraction calculations.
///
/// # Variants
///
/// - `Act360`: actual days divided by 360
/// - `Act365Fixed`: actual days divided by 365
/// - `Thirty360`: 30/360 bond basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCount {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// 30/360 bond basis.
    Thirty360,
}

impl DayCount {
    /// Year fraction between two dates under this convention.
    ///
    /// A negative fraction is returned when `end` precedes `start`.
    pub fn year_fraction<T: Float>(&self, start: Date, end: Date) -> T {
        match self {
            DayCount::Act360 => {
                T::from(end - start).unwrap() / T::from(360.0).unwrap()
            }
            DayCount::Act365Fixed => {
                T::from(end - start).unwrap() / T::from(365.0).unwrap()
            }
            DayCount::Thirty360 => {
                let d1 = start.day().min(30);
                let d2 = if d1 == 30 { end.day().min(30) } else { end.day() };
                let days = 360 * (end.year() - start.year())
                    + 30 * (end.month() as i32 - start.month() as i32)
                    + (d2 as i32 - d1 as i32);
                T::from(days).unwrap() / T::from(360.0).unwrap()
            }
        }
    }

    /// Returns the convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCount::Act360 => "ACT/360",
            DayCount::Act365Fixed => "ACT/365F",
            DayCount::Thirty360 => "30/360",
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
