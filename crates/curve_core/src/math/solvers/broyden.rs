//! Broyden's method for square nonlinear systems.
//!
//! This module provides the [`BroydenSolver`] for solving `F(x) = 0` where
//! `F : ℝⁿ → ℝⁿ`. The Jacobian is estimated once by forward differences and
//! then maintained with rank-1 secant updates, so each iteration costs a
//! single residual evaluation plus a dense linear solve.
//!
//! # Algorithm
//!
//! ```text
//! J₀    ≈ ∂F/∂x  (forward differences)
//! solve Jₖ δ = -F(xₖ)
//! xₖ₊₁  = xₖ + δ
//! Jₖ₊₁  = Jₖ + (ΔF - Jₖ δ) δᵀ / (δᵀ δ)
//! ```
//!
//! Termination is uniform over the residual components: the iteration stops
//! when `|Fᵢ(x)| < tolerance` for every `i`.
//!
//! # Example
//!
//! ```
//! use curve_core::math::solvers::{BroydenConfig, BroydenSolver};
//!
//! // Solve x² + y² = 2, x - y = 0  (root at (1, 1))
//! let f = |x: &[f64]| vec![x[0] * x[0] + x[1] * x[1] - 2.0, x[0] - x[1]];
//!
//! let solver = BroydenSolver::new(BroydenConfig::default());
//! let result = solver.solve(f, vec![0.5, 0.8]).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.solution[0] - 1.0).abs() < 1e-7);
//! ```

use crate::types::SolverError;
use num_traits::Float;

/// Configuration for Broyden's method.
///
/// # Fields
///
/// * `tolerance` - Uniform termination tolerance applied to every residual
///   component
/// * `max_iterations` - Iteration budget
/// * `fd_step` - Forward-difference step used to seed the Jacobian
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroydenConfig<T: Float> {
    /// Uniform termination tolerance: stop when `|f_i| < tolerance` for all i.
    pub tolerance: T,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Forward-difference step for the initial Jacobian estimate.
    pub fd_step: T,
}

impl<T: Float> Default for BroydenConfig<T> {
    /// Default: tolerance 1e-9, 100 iterations, difference step 1e-5.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-9).unwrap(),
            max_iterations: 100,
            fd_step: T::from(1e-5).unwrap(),
        }
    }
}

impl<T: Float> BroydenConfig<T> {
    /// Create a new configuration.
    pub fn new(tolerance: T, max_iterations: usize, fd_step: T) -> Self {
        Self {
            tolerance,
            max_iterations,
            fd_step,
        }
    }
}

/// Result of a Broyden solve.
///
/// A result with `converged == false` carries the last iterate so callers
/// can report it or hand it to a fallback strategy.
#[derive(Debug, Clone)]
pub struct BroydenResult<T: Float> {
    /// Final iterate.
    pub solution: Vec<T>,
    /// Residuals at the final iterate.
    pub residuals: Vec<T>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the uniform termination criterion was met.
    pub converged: bool,
}

/// Multidimensional quasi-Newton root finder.
///
/// See the [module documentation](self) for the algorithm. Dimension
/// mismatches, non-finite residuals, and unrecoverably singular Jacobians
/// surface as [`SolverError::NumericalInstability`]; running out of
/// iterations is **not** an error; the result is returned with
/// `converged == false`.
#[derive(Debug, Clone)]
pub struct BroydenSolver<T: Float> {
    /// Solver configuration
    config: BroydenConfig<T>,
}

impl<T: Float> BroydenSolver<T> {
    /// Create a new Broyden solver with the given configuration.
    pub fn new(config: BroydenConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: BroydenConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &BroydenConfig<T> {
        &self.config
    }

    /// Solve `F(x) = 0` starting from `initial`.
    ///
    /// `f` must map an n-vector to an n-vector (square system).
    ///
    /// # Returns
    ///
    /// * `Ok(result)` - final iterate with convergence flag and diagnostics
    /// * `Err(SolverError::NumericalInstability)` - empty or non-square
    ///   system, non-finite residuals, or singular Jacobian
    pub fn solve<F>(&self, f: F, initial: Vec<T>) -> Result<BroydenResult<T>, SolverError>
    where
        F: Fn(&[T]) -> Vec<T>,
    {
        let n = initial.len();
        if n == 0 {
            return Err(SolverError::NumericalInstability(
                "empty parameter vector".to_string(),
            ));
        }

        let mut x = initial;
        let mut fx = f(&x);
        if fx.len() != n {
            return Err(SolverError::NumericalInstability(format!(
                "residual dimension {} does not match parameter dimension {}",
                fx.len(),
                n
            )));
        }
        if !all_finite(&fx) {
            return Err(SolverError::NumericalInstability(
                "initial residual is not finite".to_string(),
            ));
        }

        if self.terminated(&fx) {
            return Ok(BroydenResult {
                solution: x,
                residuals: fx,
                iterations: 0,
                converged: true,
            });
        }

        let mut jacobian = self.finite_difference_jacobian(&f, &x, &fx);

        for iteration in 1..=self.config.max_iterations {
            let rhs: Vec<T> = fx.iter().map(|&v| -v).collect();

            let step = match solve_linear(&jacobian, &rhs) {
                Some(step) => step,
                None => {
                    // The secant updates have degenerated; rebuild from
                    // finite differences before giving up.
                    jacobian = self.finite_difference_jacobian(&f, &x, &fx);
                    solve_linear(&jacobian, &rhs).ok_or_else(|| {
                        SolverError::NumericalInstability("singular Jacobian".to_string())
                    })?
                }
            };

            let x_next: Vec<T> = x.iter().zip(&step).map(|(&xi, &si)| xi + si).collect();
            let fx_next = f(&x_next);
            if fx_next.len() != n || !all_finite(&fx_next) {
                return Err(SolverError::NumericalInstability(
                    "residual evaluation produced non-finite values".to_string(),
                ));
            }

            // Rank-1 secant update: J += (ΔF - J δ) δᵀ / (δᵀ δ)
            let step_norm_sq = dot(&step, &step);
            if step_norm_sq > T::zero() {
                let j_step = mat_vec(&jacobian, &step);
                for i in 0..n {
                    let coeff = (fx_next[i] - fx[i] - j_step[i]) / step_norm_sq;
                    for j in 0..n {
                        jacobian[i][j] = jacobian[i][j] + coeff * step[j];
                    }
                }
            }

            x = x_next;
            fx = fx_next;

            if self.terminated(&fx) {
                return Ok(BroydenResult {
                    solution: x,
                    residuals: fx,
                    iterations: iteration,
                    converged: true,
                });
            }
        }

        Ok(BroydenResult {
            solution: x,
            residuals: fx,
            iterations: self.config.max_iterations,
            converged: false,
        })
    }

    /// Uniform termination: every residual component below tolerance.
    fn terminated(&self, fx: &[T]) -> bool {
        fx.iter().all(|v| v.abs() < self.config.tolerance)
    }

    /// Forward-difference Jacobian estimate.
    fn finite_difference_jacobian<F>(&self, f: &F, x: &[T], fx: &[T]) -> Vec<Vec<T>>
    where
        F: Fn(&[T]) -> Vec<T>,
    {
        let n = x.len();
        let mut jacobian = vec![vec![T::zero(); n]; n];

        for j in 0..n {
            let h = self.config.fd_step * x[j].abs().max(T::one());

            let mut x_bumped = x.to_vec();
            x_bumped[j] = x_bumped[j] + h;
            let f_bumped = f(&x_bumped);

            for i in 0..n {
                jacobian[i][j] = (f_bumped[i] - fx[i]) / h;
            }
        }

        jacobian
    }
}

/// Check that every component is finite.
fn all_finite<T: Float>(v: &[T]) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Dot product.
fn dot<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Matrix-vector product for a dense row-major matrix.
fn mat_vec<T: Float>(matrix: &[Vec<T>], v: &[T]) -> Vec<T> {
    matrix.iter().map(|row| dot(row, v)).collect()
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when a pivot degenerates.
fn solve_linear<T: Float>(matrix: &[Vec<T>], rhs: &[T]) -> Option<Vec<T>> {
    let n = rhs.len();
    if matrix.len() != n {
        return None;
    }

    let mut a: Vec<Vec<T>> = matrix.to_vec();
    let mut b = rhs.to_vec();
    let tiny = T::from(1e-30).unwrap();

    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < tiny {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] = a[row][k] - factor * a[col][k];
            }
            b[row] = b[row] - factor * b[col];
        }
    }

    let mut x = vec![T::zero(); n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}
