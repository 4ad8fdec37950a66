// ============================================================================
// Calculator Factory
// Creates calculators with proper configuration
// ============================================================================

use crate::domain::{CalculationResult, CalculatorConfig};
use crate::engine::{BbpSeries, PiCalculator};
use crate::interfaces::{ConvergencePolicy, EventHandler, MagnitudeBelowLimit, Series};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a BBP calculator from configuration
///
/// # Arguments
/// * `config` - Calculator configuration
/// * `event_handler` - Handler for calculation events
///
/// # Example
/// ```
/// use bbp_pi::prelude::*;
/// use std::sync::Arc;
///
/// let config = CalculatorConfig::single_threaded();
/// let calculator = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(calculator.calculate(3).unwrap().to_string(), "3.142");
/// ```
pub fn create_from_config(
    config: CalculatorConfig,
    event_handler: Arc<dyn EventHandler>,
) -> CalculationResult<PiCalculator> {
    PiCalculator::new(
        config,
        Arc::new(BbpSeries),
        Arc::new(MagnitudeBelowLimit),
        event_handler,
    )
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating calculators with fluent API
///
/// # Example
/// ```
/// use bbp_pi::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let calculator = PiCalculatorBuilder::new()
///     .workers(2)
///     .timeout(Duration::from_secs(30))
///     .event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(calculator.config().workers, 2);
/// ```
pub struct PiCalculatorBuilder {
    config: CalculatorConfig,
    series: Arc<dyn Series>,
    policy: Arc<dyn ConvergencePolicy>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl PiCalculatorBuilder {
    /// Start from the default configuration and the BBP series
    pub fn new() -> Self {
        Self::from_config(CalculatorConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: CalculatorConfig) -> Self {
        Self {
            config,
            series: Arc::new(BbpSeries),
            policy: Arc::new(MagnitudeBelowLimit),
            event_handler: None,
        }
    }

    /// Set worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set overall timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set cancellation polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Pin workers to cores (effective with the `numa` feature)
    pub fn pin_workers(mut self, pin: bool) -> Self {
        self.config.pin_workers = pin;
        self
    }

    /// Replace the series being summed
    pub fn series(mut self, series: Arc<dyn Series>) -> Self {
        self.series = series;
        self
    }

    /// Replace the per-worker stopping predicate
    pub fn convergence_policy(mut self, policy: Arc<dyn ConvergencePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Set event handler
    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Validate and build. Without an event handler, events are dropped.
    pub fn build(self) -> CalculationResult<PiCalculator> {
        let handler = self
            .event_handler
            .unwrap_or_else(|| Arc::new(crate::interfaces::NoOpEventHandler));
        PiCalculator::new(self.config, self.series, self.policy, handler)
    }
}

impl Default for PiCalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CalculationError;
    use crate::interfaces::NoOpEventHandler;
    use crate::numeric::ScaledDecimal;

    /// Stops only once a term is exactly zero at the working precision.
    struct UntilZero;

    impl ConvergencePolicy for UntilZero {
        fn should_stop(&self, term: &ScaledDecimal, _limit: &ScaledDecimal) -> bool {
            term.is_zero()
        }

        fn name(&self) -> &str {
            "until-zero"
        }
    }

    #[test]
    fn test_create_from_config() {
        let calc =
            create_from_config(CalculatorConfig::new(2), Arc::new(NoOpEventHandler)).unwrap();
        assert_eq!(calc.config().workers, 2);
        assert_eq!(calc.calculate(2).unwrap().to_string(), "3.14");
    }

    #[test]
    fn test_create_from_invalid_config() {
        let result = create_from_config(CalculatorConfig::new(0), Arc::new(NoOpEventHandler));
        assert!(matches!(result, Err(CalculationError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder() {
        let calc = PiCalculatorBuilder::new()
            .workers(3)
            .timeout(Duration::from_secs(7))
            .poll_interval(Duration::from_millis(5))
            .pin_workers(true)
            .build()
            .unwrap();

        let config = calc.config();
        assert_eq!(config.workers, 3);
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert!(config.pin_workers);
        // Pinning falls back silently when unavailable
        assert_eq!(calc.calculate(4).unwrap().to_string(), "3.1416");
    }

    #[test]
    fn test_builder_custom_policy() {
        let calc = PiCalculatorBuilder::new()
            .workers(2)
            .convergence_policy(Arc::new(UntilZero))
            .build()
            .unwrap();

        // Summing further never changes the rounded digits
        assert_eq!(calc.calculate(8).unwrap().to_string(), "3.14159265");
    }

    #[test]
    fn test_builder_validates() {
        let result = PiCalculatorBuilder::new().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(CalculationError::InvalidConfig(_))));
    }
}
