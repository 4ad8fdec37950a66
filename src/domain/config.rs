// ============================================================================
// Calculator Configuration
// Worker pool sizing, timeout and scheduling options
// ============================================================================

use crate::utils::hardware_parallelism;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`PiCalculator`](crate::engine::PiCalculator).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalculatorConfig {
    /// Number of partition workers (one residue class each)
    pub workers: usize,

    /// Upper bound on the whole calculation; unmerged workers are discarded
    /// once it elapses
    pub timeout: Duration,

    /// How often the coordinator checks for external cancellation while
    /// waiting on workers
    pub poll_interval: Duration,

    /// Pin each worker thread to its own core (requires the `numa` feature)
    pub pin_workers: bool,
}

impl CalculatorConfig {
    /// Reference timeout for one calculation.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

    /// Default cancellation polling interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

    /// Create a configuration with an explicit worker count and the reference
    /// timeout.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            pin_workers: false,
        }
    }

    /// Builder method: Set worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder method: Set overall timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method: Set cancellation polling interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder method: Enable or disable core pinning
    pub fn with_pinned_workers(mut self, pin: bool) -> Self {
        self.pin_workers = pin;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Worker count must be at least 1".to_string());
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be positive".to_string());
        }

        if self.poll_interval.is_zero() {
            return Err("Poll interval must be positive".to_string());
        }

        Ok(())
    }
}

impl Default for CalculatorConfig {
    /// One worker per hardware execution unit, reference timeout.
    fn default() -> Self {
        Self::new(hardware_parallelism())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl CalculatorConfig {
    /// Reference setup
    /// - One worker per hardware thread
    /// - 10 minute timeout
    pub fn reference() -> Self {
        Self::default()
    }

    /// Single worker; the whole series runs on one thread
    pub fn single_threaded() -> Self {
        Self::new(1)
    }

    /// Hardware-sized pool with a custom timeout, for interactive use
    pub fn quick(timeout: Duration) -> Self {
        Self::default().with_timeout(timeout)
    }
}
