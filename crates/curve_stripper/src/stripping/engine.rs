//! The staged dual-curve stripping engine.
//!
//! Pillar construction is strictly sequential: each pair's solve consumes
//! the pillars placed by every earlier pair. Per pair the engine
//!
//! 1. appends the paired date to the discounting pillar dates,
//! 2. appends the preceding leftovers' end dates and then the paired date
//!    to the index pillar dates,
//! 3. solves the square system that reprices the pair and its preceding
//!    leftovers to zero, and
//! 4. commits the solved abscissae to the growing vectors.
//!
//! After the last pair, each trailing leftover adds one index pillar solved
//! with a seeded one-dimensional root search against the now-fixed
//! discounting curve.

use curve_core::market_data::curves::CurvePair;
use curve_core::math::solvers::{
    BrentSolver, BroydenConfig, BroydenResult, BroydenSolver, LMConfig, LevenbergMarquardtSolver,
    SolverConfig,
};
use curve_core::types::time::Date;
use curve_core::types::SolverError;
use curve_instruments::traits::InstrumentHandle;
use num_traits::Float;
use std::sync::Arc;

use super::config::{FallbackPolicy, StripConfig};
use super::error::StripError;
use super::factory::DualCurveFactory;
use super::pairing::{make_pairs, PairingRecord};

/// Iteration budget for the least-squares fallback, mirroring the wider
/// budget the slower-but-robust path is allowed.
const FALLBACK_MAX_ITERATIONS: usize = 2000;

/// Result of a dual-curve strip.
///
/// Owns the final curve pair and the four pillar vectors that produced it.
/// For *n* pairs and *L* leftovers (preceding and trailing combined) the
/// vectors satisfy `disc.len() == n` and `idx.len() == n + L`.
#[derive(Debug, Clone)]
pub struct StripResult<T: Float> {
    /// The final discounting/index curve pair
    pub curves: CurvePair<T>,
    /// Discounting pillar dates, one per pair
    pub discounting_dates: Vec<Date>,
    /// Discounting abscissae aligned with `discounting_dates`
    pub discounting_abscissae: Vec<T>,
    /// Index pillar dates: paired dates plus every leftover's end date
    pub index_dates: Vec<Date>,
    /// Index abscissae aligned with `index_dates`
    pub index_abscissae: Vec<T>,
    /// Valuation date carried through for downstream consumers
    pub now_date: Date,
    /// Iterations used by each pair's coupled solve
    pub pair_iterations: Vec<usize>,
}

/// Strips a discounting curve and an index curve jointly from calibration
/// instruments.
///
/// Construction performs the pairing; [`strip`](Self::strip) runs the
/// staged solves. The stripper holds the instruments immutably and does not
/// retain any solver state between pairs.
///
/// # Example
///
/// ```rust,ignore
/// let factory = Arc::new(ZeroRateCurveFactory::new(now));
/// let stripper = DualCurveStripper::new(factory, instruments, now, StripConfig::default())?;
/// let result = stripper.strip()?;
/// assert_eq!(result.discounting_dates.len(), stripper.pairs().len());
/// ```
#[derive(Debug)]
pub struct DualCurveStripper<T: Float> {
    /// Curve factory shared with residual closures
    factory: Arc<dyn DualCurveFactory<T>>,
    /// Instrument pairs in paired-date order
    pairs: Vec<PairingRecord<T>>,
    /// Trailing leftovers in maturity order
    leftovers: Vec<InstrumentHandle<T>>,
    /// Valuation date
    now_date: Date,
    /// Stripping configuration
    config: StripConfig<T>,
}

impl<T: Float> DualCurveStripper<T> {
    /// Create a stripper, performing the maturity pairing.
    ///
    /// # Errors
    ///
    /// * `StripError::InsufficientInstruments` - fewer than two instruments
    /// * `StripError::InsufficientPairs` - pairing produced no pair
    pub fn new(
        factory: Arc<dyn DualCurveFactory<T>>,
        instruments: &[InstrumentHandle<T>],
        now_date: Date,
        config: StripConfig<T>,
    ) -> Result<Self, StripError> {
        let (pairs, leftovers) = make_pairs(instruments, config.pairing_distance)?;

        if pairs.is_empty() {
            return Err(StripError::InsufficientPairs);
        }

        Ok(Self {
            factory,
            pairs,
            leftovers,
            now_date,
            config,
        })
    }

    /// The instrument pairs, in paired-date order.
    pub fn pairs(&self) -> &[PairingRecord<T>] {
        &self.pairs
    }

    /// The trailing leftovers, in maturity order.
    pub fn leftovers(&self) -> &[InstrumentHandle<T>] {
        &self.leftovers
    }

    /// The stripping configuration.
    pub fn config(&self) -> &StripConfig<T> {
        &self.config
    }

    /// The valuation date.
    pub fn now_date(&self) -> Date {
        self.now_date
    }

    /// Run the staged strip and assemble the result.
    pub fn strip(&self) -> Result<StripResult<T>, StripError> {
        let mut disc_dates: Vec<Date> = Vec::with_capacity(self.pairs.len());
        let mut disc_abs: Vec<T> = Vec::with_capacity(self.pairs.len());
        let mut idx_dates: Vec<Date> = Vec::new();
        let mut idx_abs: Vec<T> = Vec::new();
        let mut pair_iterations: Vec<usize> = Vec::with_capacity(self.pairs.len());

        for (pair_index, pair) in self.pairs.iter().enumerate() {
            // The discounting curve gets a pillar for the pair only; the
            // index curve also gets one per preceding leftover.
            disc_dates.push(pair.paired_date());
            for date in pair.unpaired_dates() {
                idx_dates.push(date);
            }
            idx_dates.push(pair.paired_date());

            let n = pair.num_insts();
            let mut guess = vec![self.factory.index_initial_guess(); n];
            guess[0] = self.factory.discount_initial_guess();

            // Shape rejections (length mismatch, non-monotone dates) are
            // deterministic in the pillar layout, so surface them here
            // rather than as a poisoned solve.
            {
                let mut trial_disc = disc_abs.clone();
                trial_disc.push(guess[0]);
                let mut trial_idx = idx_abs.clone();
                trial_idx.extend_from_slice(&guess[1..]);
                self.factory
                    .new_curves(&disc_dates, &trial_disc, &idx_dates, &trial_idx)?;
            }

            let factory = self.factory.as_ref();
            let residual = |x: &[T]| -> Vec<T> {
                // Discounting gets the first point, the index curve all the
                // remaining ones, in pillar order.
                let mut trial_disc = disc_abs.clone();
                trial_disc.push(x[0]);
                let mut trial_idx = idx_abs.clone();
                trial_idx.extend_from_slice(&x[1..]);

                match factory.new_curves(&disc_dates, &trial_disc, &idx_dates, &trial_idx) {
                    Ok(curves) => {
                        let mut out = Vec::with_capacity(n);
                        pair.evaluate(&curves, &mut out);
                        out
                    }
                    // Value-dependent rejection: poison the residuals so
                    // the solver reports the failure.
                    Err(_) => vec![T::nan(); n],
                }
            };

            let solver = BroydenSolver::new(BroydenConfig::new(
                self.config.tolerance,
                self.config.max_iterations,
                self.config.fd_step,
            ));

            let (solved, iterations) = match solver.solve(&residual, guess.clone()) {
                Ok(result) if result.converged => (result.solution, result.iterations),
                outcome => self.solve_fallback(&residual, &guess, pair_index, outcome)?,
            };

            disc_abs.push(solved[0]);
            idx_abs.extend_from_slice(&solved[1..]);
            pair_iterations.push(iterations);
        }

        // Each trailing leftover adds one index pillar against the fixed
        // discounting curve.
        for (leftover_index, inst) in self.leftovers.iter().enumerate() {
            idx_dates.push(inst.end());

            let seed = idx_abs
                .last()
                .copied()
                .unwrap_or_else(|| self.factory.index_initial_guess());

            {
                let mut trial_idx = idx_abs.clone();
                trial_idx.push(seed);
                self.factory
                    .new_curves(&disc_dates, &disc_abs, &idx_dates, &trial_idx)?;
            }

            let factory = self.factory.as_ref();
            let residual = |u: T| -> T {
                let mut trial_idx = idx_abs.clone();
                trial_idx.push(u);
                match factory.new_curves(&disc_dates, &disc_abs, &idx_dates, &trial_idx) {
                    Ok(curves) => inst.value_diff(&curves),
                    Err(_) => T::nan(),
                }
            };

            let solver = BrentSolver::new(SolverConfig::new(
                self.config.tolerance,
                self.config.leftover_max_iterations,
            ));
            let root = solver
                .find_root_from_seed(&residual, seed)
                .map_err(|source| {
                    StripError::leftover_solve_failed(leftover_index, inst.end(), source)
                })?;

            idx_abs.push(root);
        }

        let curves = self
            .factory
            .new_curves(&disc_dates, &disc_abs, &idx_dates, &idx_abs)?;

        Ok(StripResult {
            curves,
            discounting_dates: disc_dates,
            discounting_abscissae: disc_abs,
            index_dates: idx_dates,
            index_abscissae: idx_abs,
            now_date: self.now_date,
            pair_iterations,
        })
    }

    /// Handle a stalled coupled solve according to the fallback policy.
    ///
    /// The least-squares path minimises the sum-of-squares surrogate of the
    /// same residual vector and accepts the result only if it meets the
    /// uniform termination criterion; otherwise the original failure is
    /// surfaced.
    fn solve_fallback<F>(
        &self,
        residual: &F,
        guess: &[T],
        pair_index: usize,
        outcome: Result<BroydenResult<T>, SolverError>,
    ) -> Result<(Vec<T>, usize), StripError>
    where
        F: Fn(&[T]) -> Vec<T>,
    {
        let original_failure = |outcome: Result<BroydenResult<T>, SolverError>| match outcome {
            Ok(result) => StripError::solver_did_not_converge(pair_index, &result.solution),
            Err(source) => StripError::Solver(source),
        };

        match self.config.fallback {
            FallbackPolicy::None => Err(original_failure(outcome)),
            FallbackPolicy::LeastSquares => {
                let solver = LevenbergMarquardtSolver::new(LMConfig::new(
                    self.config.tolerance,
                    FALLBACK_MAX_ITERATIONS,
                ));
                let fit = match solver.solve(residual, guess.to_vec()) {
                    Ok(fit) => fit,
                    Err(_) => return Err(original_failure(outcome)),
                };

                let residuals = residual(&fit.params);
                if residuals.iter().all(|r| r.abs() < self.config.tolerance) {
                    Ok((fit.params, fit.iterations))
                } else {
                    Err(original_failure(outcome))
                }
            }
        }
    }
}
