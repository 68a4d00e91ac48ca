//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! Minimises `||F(p)||²` for a vector-valued residual function `F`. Used as
//! the robust fallback when a quasi-Newton root solve stalls: the
//! sum-of-squares surrogate turns the root-finding problem into an
//! unconstrained minimisation that damped steps handle gracefully.
//!
//! # Algorithm
//!
//! ```text
//! (J^T J + λI) δ = -J^T r
//! p_{n+1} = p_n + δ
//! ```
//!
//! where `J` is the residual Jacobian, `λ` the damping factor adjusted as
//! steps are accepted or rejected.
//!
//! # Example
//!
//! ```
//! use curve_core::math::solvers::{LMConfig, LevenbergMarquardtSolver};
//!
//! // Minimize (p[0] - 2)² + (p[1] - 3)²
//! let residuals = |params: &[f64]| -> Vec<f64> {
//!     vec![params[0] - 2.0, params[1] - 3.0]
//! };
//!
//! let solver = LevenbergMarquardtSolver::<f64>::with_defaults();
//! let result = solver.solve(residuals, vec![0.0, 0.0]).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.params[0] - 2.0).abs() < 1e-6);
//! ```

use crate::types::SolverError;
use num_traits::Float;

/// Configuration for the Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMConfig<T: Float> {
    /// Convergence tolerance on the residual norm.
    pub tolerance: T,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: T,
    /// Factor to increase lambda on a rejected step.
    pub lambda_up: T,
    /// Factor to decrease lambda on an accepted step.
    pub lambda_down: T,
    /// Minimum damping factor.
    pub min_lambda: T,
    /// Maximum damping factor.
    pub max_lambda: T,
    /// Tolerance for relative parameter-change convergence.
    pub param_tolerance: T,
}

impl<T: Float> Default for LMConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap(),
            max_iterations: 100,
            initial_lambda: T::from(1e-3).unwrap(),
            lambda_up: T::from(10.0).unwrap(),
            lambda_down: T::from(0.1).unwrap(),
            min_lambda: T::from(1e-10).unwrap(),
            max_lambda: T::from(1e10).unwrap(),
            param_tolerance: T::from(1e-10).unwrap(),
        }
    }
}

impl<T: Float> LMConfig<T> {
    /// Create a configuration with the given tolerance and iteration budget.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }
}

/// Result of a Levenberg-Marquardt optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult<T: Float> {
    /// Final parameters.
    pub params: Vec<T>,
    /// Final residual sum of squares.
    pub residual_ss: T,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether convergence was achieved.
    pub converged: bool,
    /// Final damping factor.
    pub final_lambda: T,
}

/// Damped nonlinear least-squares solver.
///
/// Solves `min_p ||F(p)||²` with finite-difference Jacobians and adaptive
/// damping. Running out of iterations returns the best iterate with
/// `converged == false` rather than an error.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver<T: Float> {
    config: LMConfig<T>,
}

impl<T: Float> LevenbergMarquardtSolver<T> {
    /// Create a new solver with the given configuration.
    pub fn new(config: LMConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: LMConfig::default(),
        }
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig<T> {
        &self.config
    }

    /// Solve the nonlinear least-squares problem.
    ///
    /// # Returns
    ///
    /// * `Ok(LMResult)` - final parameters with diagnostics
    /// * `Err(SolverError)` - empty parameter or residual vector
    pub fn solve<F>(&self, residuals: F, initial_params: Vec<T>) -> Result<LMResult<T>, SolverError>
    where
        F: Fn(&[T]) -> Vec<T>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "empty parameter vector".to_string(),
            ));
        }

        let mut params = initial_params;
        let mut lambda = self.config.initial_lambda;

        let mut r = residuals(&params);
        let n_residuals = r.len();
        if n_residuals == 0 {
            return Err(SolverError::NumericalInstability(
                "empty residual vector".to_string(),
            ));
        }

        let mut ss = sum_of_squares(&r);

        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance {
                return Ok(LMResult {
                    params,
                    residual_ss: ss,
                    iterations: iteration,
                    converged: true,
                    final_lambda: lambda,
                });
            }

            let jacobian = compute_jacobian(&residuals, &params, &r);

            // Solve (J^T J + λI) δ = -J^T r
            let delta = match self.solve_normal_equations(&jacobian, &r, lambda, n_params) {
                Some(delta) => delta,
                None => {
                    lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                    continue;
                }
            };

            // Relative parameter-change convergence
            let param_change = dot(&delta, &delta).sqrt();
            let param_norm = dot(&params, &params).sqrt().max(T::one());
            if param_change / param_norm < self.config.param_tolerance {
                return Ok(LMResult {
                    params,
                    residual_ss: ss,
                    iterations: iteration,
                    converged: true,
                    final_lambda: lambda,
                });
            }

            let new_params: Vec<T> = params.iter().zip(&delta).map(|(&p, &d)| p + d).collect();
            let new_r = residuals(&new_params);
            let new_ss = sum_of_squares(&new_r);

            if new_ss < ss {
                params = new_params;
                r = new_r;
                ss = new_ss;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
            } else {
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
            }
        }

        Ok(LMResult {
            params,
            residual_ss: ss,
            iterations: self.config.max_iterations,
            converged: false,
            final_lambda: lambda,
        })
    }

    /// Solve the damped normal equations `(J^T J + λI) δ = -J^T r`.
    fn solve_normal_equations(
        &self,
        jacobian: &[Vec<T>],
        residuals: &[T],
        lambda: T,
        n_params: usize,
    ) -> Option<Vec<T>> {
        let n_residuals = residuals.len();

        let mut jtj = vec![vec![T::zero(); n_params]; n_params];
        for i in 0..n_params {
            for j in 0..n_params {
                let mut sum = T::zero();
                for row in jacobian.iter().take(n_residuals) {
                    sum = sum + row[i] * row[j];
                }
                jtj[i][j] = sum;
            }
        }

        for (i, row) in jtj.iter_mut().enumerate() {
            row[i] = row[i] + lambda;
        }

        let mut jtr = vec![T::zero(); n_params];
        for (i, value) in jtr.iter_mut().enumerate() {
            let mut sum = T::zero();
            for (k, row) in jacobian.iter().enumerate().take(n_residuals) {
                sum = sum + row[i] * residuals[k];
            }
            *value = -sum; // Descent direction
        }

        solve_cholesky(&jtj, &jtr)
    }
}

/// Compute the residual Jacobian by forward differences.
fn compute_jacobian<T, F>(residuals: &F, params: &[T], r0: &[T]) -> Vec<Vec<T>>
where
    T: Float,
    F: Fn(&[T]) -> Vec<T>,
{
    let n_params = params.len();
    let n_residuals = r0.len();
    let eps = T::from(1e-8).unwrap();

    let mut jacobian = vec![vec![T::zero(); n_params]; n_residuals];

    for j in 0..n_params {
        let h = eps * params[j].abs().max(T::one());

        let mut params_plus = params.to_vec();
        params_plus[j] = params_plus[j] + h;

        let r_plus = residuals(&params_plus);

        for i in 0..n_residuals {
            jacobian[i][j] = (r_plus[i] - r0[i]) / h;
        }
    }

    jacobian
}

/// Sum of squares of a vector.
#[inline]
fn sum_of_squares<T: Float>(v: &[T]) -> T {
    v.iter().fold(T::zero(), |acc, &x| acc + x * x)
}

/// Dot product.
#[inline]
fn dot<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Solve `A x = b` by Cholesky decomposition (A symmetric positive definite).
fn solve_cholesky<T: Float>(a: &[Vec<T>], b: &[T]) -> Option<Vec<T>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let tiny = T::from(1e-30).unwrap();
    let mut l = vec![vec![T::zero(); n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum = sum - l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= T::zero() {
                    return None; // Not positive definite
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < tiny {
                    return None;
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![T::zero(); n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - l[i][j] * y[j];
        }
        if l[i][i].abs() < tiny {
            return None;
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L^T x = y
    let mut x = vec![T::zero(); n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum = sum - l[j][i] * x[j];
        }
        if l[i][i].abs() < tiny {
            return None;
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
