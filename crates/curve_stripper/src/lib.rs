//! # Curve Stripper (L3: Stripping engine)
//!
//! Joint construction of a discounting curve and an index curve from rate
//! instruments whose prices depend on both.
//!
//! ## Architecture
//!
//! Calibration instruments are sorted by maturity and partitioned into
//! *pairs* (adjacent maturities within a configured distance) and
//! *leftovers*. Each pair pins one discounting pillar and one index pillar
//! through a coupled multidimensional solve; leftovers contribute index
//! pillars only, solved one dimension at a time. See
//! [`stripping::DualCurveStripper`] for the engine.
//!
//! ## Example
//!
//! ```rust,ignore
//! use curve_stripper::prelude::*;
//!
//! let factory = Arc::new(ZeroRateCurveFactory::new(now_date));
//! let stripper = DualCurveStripper::new(factory, instruments, now_date, StripConfig::default())?;
//! let result = stripper.strip()?;
//! ```

pub mod stripping;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::stripping::*;
}
