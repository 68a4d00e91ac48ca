//! Stripping configuration.

use num_traits::Float;

/// Recovery strategy when a pair's coupled solve misses its termination
/// criterion.
///
/// # Variants
///
/// - `None`: surface the failure immediately
/// - `LeastSquares`: retry with a damped least-squares minimisation of the
///   sum-of-squares surrogate, accepting the result only if it meets the
///   same uniform termination criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FallbackPolicy {
    /// No fallback: a failed solve fails the strip.
    None,
    /// Retry with the damped least-squares solver (default).
    #[default]
    LeastSquares,
}

/// Configuration for dual-curve stripping.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Examples
///
/// ```
/// use curve_stripper::stripping::StripConfig;
///
/// let config: StripConfig<f64> = StripConfig::default();
/// assert_eq!(config.pairing_distance, 7);
///
/// let custom = StripConfig::<f64>::builder()
///     .pairing_distance(10)
///     .tolerance(1e-12)
///     .build();
/// assert_eq!(custom.pairing_distance, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripConfig<T: Float> {
    /// Maximum gap in days between adjacent maturities for two instruments
    /// to share a discounting pillar.
    ///
    /// Default: 7
    pub pairing_distance: u64,

    /// Uniform termination tolerance for the coupled solves: every residual
    /// component must fall below it.
    ///
    /// Default: 1e-9
    pub tolerance: T,

    /// Iteration budget per coupled solve.
    ///
    /// Default: 100
    pub max_iterations: usize,

    /// Forward-difference step used to seed the quasi-Newton Jacobian.
    ///
    /// Default: 1e-5
    pub fd_step: T,

    /// Iteration budget for each trailing-leftover one-dimensional solve.
    ///
    /// Default: 25
    pub leftover_max_iterations: usize,

    /// Recovery strategy when a coupled solve stalls.
    ///
    /// Default: `FallbackPolicy::LeastSquares`
    pub fallback: FallbackPolicy,
}

impl<T: Float> Default for StripConfig<T> {
    fn default() -> Self {
        Self {
            pairing_distance: 7,
            tolerance: T::from(1e-9).unwrap(),
            max_iterations: 100,
            fd_step: T::from(1e-5).unwrap(),
            leftover_max_iterations: 25,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl<T: Float> StripConfig<T> {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> StripConfigBuilder<T> {
        StripConfigBuilder::new()
    }

    /// Set the pairing distance in days.
    pub fn with_pairing_distance(mut self, days: u64) -> Self {
        self.pairing_distance = days;
        self
    }

    /// Set the termination tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Builder for [`StripConfig`].
#[derive(Debug, Clone)]
pub struct StripConfigBuilder<T: Float> {
    config: StripConfig<T>,
}

impl<T: Float> StripConfigBuilder<T> {
    /// Create a builder with default values.
    pub fn new() -> Self {
        Self {
            config: StripConfig::default(),
        }
    }

    /// Set the pairing distance in days.
    pub fn pairing_distance(mut self, days: u64) -> Self {
        self.config.pairing_distance = days;
        self
    }

    /// Set the termination tolerance.
    pub fn tolerance(mut self, tolerance: T) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the coupled-solve iteration budget.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the forward-difference step.
    pub fn fd_step(mut self, fd_step: T) -> Self {
        self.config.fd_step = fd_step;
        self
    }

    /// Set the leftover-solve iteration budget.
    pub fn leftover_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.leftover_max_iterations = max_iterations;
        self
    }

    /// Set the fallback policy.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.config.fallback = fallback;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> StripConfig<T> {
        self.config
    }
}

impl<T: Float> Default for StripConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
