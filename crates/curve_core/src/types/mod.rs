//! Foundational value types: dates, day counts, and error enums.

pub mod error;
pub mod time;

pub use error::{DateError, SolverError};
pub use time::{Date, DayCount};
