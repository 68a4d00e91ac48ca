//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Number of doublings attempted when expanding a seeded bracket.
const MAX_BRACKET_EXPANSIONS: usize = 16;

/// Brent's method root finder.
///
/// Derivative-free root finding on a sign-change bracket. Each iteration
/// proposes an inverse-quadratic (or secant) step from the last three
/// iterates and keeps it only when it lands well inside the bracket and
/// shrinks faster than bisection would; otherwise the iteration bisects.
/// The bracket width therefore decreases on every step and the method
/// cannot stall on a continuous function.
///
/// Callers that only have a starting guess can use
/// [`find_root_from_seed`](Self::find_root_from_seed), which grows a bracket
/// geometrically around the seed before running the bracketed iteration.
///
/// # Example
///
/// ```
/// use curve_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    /// Solver configuration
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// Requires that `f(a)` and `f(b)` have opposite signs. The bracket is
    /// maintained as a (contrapoint, best iterate) pair; interpolated steps
    /// are accepted only under the progress guards described on
    /// [`BrentSolver`], so every rejected proposal costs one bisection and
    /// nothing more.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - root where `|f(x)| < tolerance` or the bracket collapsed
    /// * `Err(SolverError::NoBracket)` - same sign at both endpoints
    /// * `Err(SolverError::MaxIterationsExceeded)` - failed to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let tol = self.config.tolerance;
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        let quarter = T::from(0.25).unwrap();

        let mut contra = a;
        let mut best = b;
        let mut f_contra = f(contra);
        let mut f_best = f(best);

        if f_contra * f_best > T::zero() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // The smaller residual lives at `best`, its partner at `contra`.
        if f_contra.abs() < f_best.abs() {
            std::mem::swap(&mut contra, &mut best);
            std::mem::swap(&mut f_contra, &mut f_best);
        }

        // Last two iterates, consulted by the progress guards.
        let mut prev = contra;
        let mut f_prev = f_contra;
        let mut prev2 = contra;
        let mut bisected = true;

        for _iteration in 0..self.config.max_iterations {
            if f_best.abs() < tol {
                return Ok(best);
            }
            if (best - contra).abs() / two <= tol {
                return Ok(best);
            }

            // Propose a step: inverse quadratic through the last three
            // iterates when their residuals are pairwise distinct, secant
            // through the bracket endpoints otherwise.
            let proposal = if f_contra != f_prev && f_best != f_prev {
                Some(
                    contra * f_best * f_prev / ((f_contra - f_best) * (f_contra - f_prev))
                        + best * f_contra * f_prev / ((f_best - f_contra) * (f_best - f_prev))
                        + prev * f_contra * f_best / ((f_prev - f_contra) * (f_prev - f_best)),
                )
            } else if f_best != f_contra {
                Some(best - f_best * (best - contra) / (f_best - f_contra))
            } else {
                None
            };

            // Accept the proposal only if it lands in the three-quarters
            // of the bracket nearest the best iterate and keeps halving
            // the distance covered two steps ago; anything else bisects.
            let inner_edge = (three * contra + best) * quarter;
            let step_history = if bisected {
                (best - prev).abs()
            } else {
                (prev - prev2).abs()
            };

            let candidate = match proposal {
                Some(s)
                    if (s - inner_edge) * (s - best) < T::zero()
                        && (s - best).abs() < step_history / two
                        && step_history > tol =>
                {
                    bisected = false;
                    s
                }
                _ => {
                    bisected = true;
                    (contra + best) / two
                }
            };

            let f_candidate = f(candidate);

            prev2 = prev;
            prev = best;
            f_prev = f_best;

            // The candidate replaces whichever endpoint keeps the sign
            // change inside the bracket.
            if f_contra * f_candidate < T::zero() {
                best = candidate;
                f_best = f_candidate;
            } else {
                contra = candidate;
                f_contra = f_candidate;
            }

            if f_contra.abs() < f_best.abs() {
                std::mem::swap(&mut contra, &mut best);
                std::mem::swap(&mut f_contra, &mut f_best);
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Find a root of `f` starting from a seed, expanding a bracket around
    /// it until a sign change is found.
    ///
    /// The initial half-width is `max(0.5, |seed| / 2)` and doubles on each
    /// attempt. Once a sign change is bracketed the standard bracketed
    /// iteration runs.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - root found inside the expanded bracket
    /// * `Err(SolverError::NoBracket)` - no sign change within the
    ///   expansion budget
    pub fn find_root_from_seed<F>(&self, f: F, seed: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let two = T::from(2.0).unwrap();
        let mut width = (seed.abs() / two).max(T::from(0.5).unwrap());

        let mut a = seed - width;
        let mut b = seed + width;

        for _attempt in 0..MAX_BRACKET_EXPANSIONS {
            let fa = f(a);
            let fb = f(b);

            if fa * fb <= T::zero() {
                return self.find_root(&f, a, b);
            }

            width = width * two;
            a = seed - width;
            b = seed + width;
        }

        Err(SolverError::NoBracket {
            a: a.to_f64().unwrap_or(f64::NAN),
            b: b.to_f64().unwrap_or(f64::NAN),
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
