//! Dual yield curve stripping.
//!
//! This module strips two related discount-factor curves, a discounting
//! curve and an index (projection) curve, from a heterogeneous set of
//! calibration instruments.
//!
//! ## Components
//!
//! - [`make_pairs`] / [`PairingRecord`]: maturity-sorted pairing of
//!   instruments within a day-distance budget
//! - [`DualCurveStripper`]: the staged engine appending pillars pair by pair
//! - [`DualCurveFactory`] / [`ZeroRateCurveFactory`]: the curve construction
//!   contract and its default zero-rate implementation
//! - [`BatchStripper`]: parallel stripping of independent instrument sets
//!
//! ## Staging
//!
//! Each pair adds one discounting pillar and `1 + #preceding-leftovers`
//! index pillars, solved as one square system; staging keeps every solve
//! small and locally conditioned instead of coupling all pillars globally.

mod batch;
mod config;
mod engine;
mod error;
mod factory;
mod pairing;

pub use batch::BatchStripper;
pub use config::{FallbackPolicy, StripConfig, StripConfigBuilder};
pub use engine::{DualCurveStripper, StripResult};
pub use error::StripError;
pub use factory::{DualCurveFactory, ZeroRateCurveFactory};
pub use pairing::{make_pairs, PairingRecord};
