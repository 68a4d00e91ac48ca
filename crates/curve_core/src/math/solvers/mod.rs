//! Root-finding and least-squares solvers.
//!
//! This module provides the numerical machinery used by curve stripping:
//!
//! ## Available Solvers
//!
//! ### Root-Finding
//!
//! - [`BrentSolver`]: robust bracketing method, with seeded bracket
//!   expansion for callers that only have a starting guess
//! - [`BroydenSolver`]: multidimensional quasi-Newton method for square
//!   nonlinear systems
//!
//! ### Least-Squares
//!
//! - [`LevenbergMarquardtSolver`]: damped nonlinear least-squares, used as
//!   the robust fallback when a quasi-Newton solve stalls
//!
//! ## Configuration
//!
//! One-dimensional solvers share [`SolverConfig`]; the multidimensional
//! solvers carry their own configs ([`BroydenConfig`], [`LMConfig`]) with
//! additional step-size and damping parameters.
//!
//! ## Examples
//!
//! ```
//! use curve_core::math::solvers::{BrentSolver, SolverConfig};
//!
//! // Solve x² - 2 = 0 in the bracket [0, 2]
//! let solver = BrentSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
//! ```

mod brent;
mod broyden;
mod config;
mod levenberg_marquardt;

pub use brent::BrentSolver;
pub use broyden::{BroydenConfig, BroydenResult, BroydenSolver};
pub use config::SolverConfig;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
