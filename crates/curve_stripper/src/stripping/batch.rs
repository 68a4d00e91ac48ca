//! Parallel stripping of independent instrument sets.
//!
//! Each job is a self-contained strip (one instrument set, one result), so
//! jobs parallelise trivially. With the `parallel` feature enabled the fan
//! out runs on rayon's work-stealing scheduler; without it the same API
//! compiles to a sequential loop.

use curve_core::types::time::Date;
use curve_instruments::traits::InstrumentHandle;
use num_traits::Float;
use std::sync::Arc;

use super::config::StripConfig;
use super::engine::{DualCurveStripper, StripResult};
use super::error::StripError;
use super::factory::DualCurveFactory;

/// Strips many independent instrument sets against a shared factory.
///
/// # Example
///
/// ```rust,ignore
/// let batch = BatchStripper::new(StripConfig::default());
/// let results = batch.strip_batch(factory, &jobs, now_date)?;
/// ```
#[derive(Debug, Clone)]
pub struct BatchStripper<T: Float> {
    /// Configuration shared across all jobs
    config: StripConfig<T>,
}

impl<T: Float> BatchStripper<T> {
    /// Create a batch stripper with the given configuration.
    pub fn new(config: StripConfig<T>) -> Self {
        Self { config }
    }

    /// Create a batch stripper with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: StripConfig::default(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &StripConfig<T> {
        &self.config
    }

    /// Strip every job in parallel, failing on the first error.
    ///
    /// Jobs are independent instrument sets; results come back in job
    /// order.
    #[cfg(feature = "parallel")]
    pub fn strip_batch(
        &self,
        factory: Arc<dyn DualCurveFactory<T>>,
        jobs: &[Vec<InstrumentHandle<T>>],
        now_date: Date,
    ) -> Result<Vec<StripResult<T>>, StripError>
    where
        T: Send + Sync,
    {
        use rayon::prelude::*;

        jobs.par_iter()
            .map(|instruments| {
                let stripper = DualCurveStripper::new(
                    Arc::clone(&factory),
                    instruments,
                    now_date,
                    self.config,
                )?;
                stripper.strip()
            })
            .collect()
    }

    /// Sequential fallback when the `parallel` feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn strip_batch(
        &self,
        factory: Arc<dyn DualCurveFactory<T>>,
        jobs: &[Vec<InstrumentHandle<T>>],
        now_date: Date,
    ) -> Result<Vec<StripResult<T>>, StripError> {
        jobs.iter()
            .map(|instruments| {
                let stripper = DualCurveStripper::new(
                    Arc::clone(&factory),
                    instruments,
                    now_date,
                    self.config,
                )?;
                stripper.strip()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_core::market_data::curves::CurvePair;
    use curve_core::types::time::Date;
    use curve_instruments::traits::CalibrationInstrument;

    use crate::stripping::factory::ZeroRateCurveFactory;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    struct IndexDfTarget {
        end: Date,
        target: f64,
    }

    impl CalibrationInstrument<f64> for IndexDfTarget {
        fn end(&self) -> Date {
            self.end
        }

        fn value_diff(&self, curves: &CurvePair<f64>) -> f64 {
            curves.index().df_at(self.end) - self.target
        }
    }

    struct DiscountDfTarget {
        end: Date,
        target: f64,
    }

    impl CalibrationInstrument<f64> for DiscountDfTarget {
        fn end(&self) -> Date {
            self.end
        }

        fn value_diff(&self, curves: &CurvePair<f64>) -> f64 {
            curves.discounting().df_at(self.end) - self.target
        }
    }

    fn job(disc_df: f64, idx_df: f64) -> Vec<InstrumentHandle<f64>> {
        vec![
            Arc::new(DiscountDfTarget {
                end: base().add_days(364),
                target: disc_df,
            }),
            Arc::new(IndexDfTarget {
                end: base().add_days(365),
                target: idx_df,
            }),
        ]
    }

    #[test]
    fn test_batch_matches_sequential() {
        let factory = Arc::new(ZeroRateCurveFactory::new(base()));
        let jobs = vec![job(0.97, 0.96), job(0.96, 0.95), job(0.98, 0.97)];

        let batch = BatchStripper::<f64>::with_defaults();
        let results = batch
            .strip_batch(factory.clone(), &jobs, base())
            .unwrap();

        assert_eq!(results.len(), 3);
        for (result, job) in results.iter().zip(&jobs) {
            let stripper = DualCurveStripper::new(
                factory.clone() as Arc<dyn DualCurveFactory<f64>>,
                job,
                base(),
                StripConfig::default(),
            )
            .unwrap();
            let sequential = stripper.strip().unwrap();
            assert!(
                (result.discounting_abscissae[0] - sequential.discounting_abscissae[0]).abs()
                    < 1e-12
            );
        }
    }

    #[test]
    fn test_batch_error_propagation() {
        let factory = Arc::new(ZeroRateCurveFactory::new(base()));
        let jobs = vec![job(0.97, 0.96), vec![]]; // Second job is empty

        let batch = BatchStripper::<f64>::with_defaults();
        let result = batch.strip_batch(factory, &jobs, base());

        assert!(result.is_err());
    }

    #[test]
    fn test_batch_empty_input() {
        let factory = Arc::new(ZeroRateCurveFactory::new(base()));
        let batch = BatchStripper::<f64>::with_defaults();
        let results = batch.strip_batch(factory, &[], base()).unwrap();
        assert!(results.is_empty());
    }
}
