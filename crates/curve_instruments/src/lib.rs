//! # Curve Instruments (L2: Calibration instruments)
//!
//! Rate instruments used to calibrate discounting and index curves.
//!
//! This crate provides:
//! - `schedules`: regular payment-date generation and accrual periods
//! - [`CalibrationInstrument`]: the capability contract the stripping
//!   engine prices against
//! - [`OvernightIndexSwap`] and [`VanillaSwap`]: concrete par-swap
//!   instruments whose residuals pin down the discounting and index curves
//!
//! Instruments are immutable once constructed and are shared with the
//! stripper as [`InstrumentHandle`]s.

pub mod schedules;
pub mod swap;
pub mod traits;

pub use swap::{OvernightIndexSwap, VanillaSwap};
pub use traits::{CalibrationInstrument, InstrumentHandle};
