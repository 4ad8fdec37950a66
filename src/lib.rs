// ============================================================================
// BBP Pi Library
// Parallel arbitrary-precision evaluation of pi via the BBP series
// ============================================================================

//! # BBP Pi
//!
//! Computes π to any number of decimal places by summing the
//! Bailey–Borwein–Plouffe series across a pool of worker threads.
//!
//! ## Features
//!
//! - **Exact decimal arithmetic** on `num-bigint`, with explicit rounding modes
//! - **Residue-class partitioning**: worker `r` sums indices `r, r+N, r+2N, …`
//! - **Single atomic merge** per worker into a mutex-guarded accumulator
//! - **Bounded runtime**: a timeout yields a tagged, possibly incomplete result
//! - **Cooperative cancellation** through [`CancellationToken`](engine::CancellationToken)
//!
//! ## Example
//!
//! ```rust
//! use bbp_pi::prelude::*;
//!
//! let calculator = PiCalculator::with_config(CalculatorConfig::new(2))?;
//! let outcome = calculator.calculate(5)?;
//!
//! assert_eq!(outcome.to_string(), "3.14159");
//! assert!(!outcome.is_degraded());
//! # Ok::<(), bbp_pi::domain::CalculationError>(())
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod utils;

use domain::CalculationResult;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        CalculationError, CalculationOutcome, CalculationResult, CalculatorConfig,
        CompletionStatus, RequestedDigits, WorkingPrecision, GUARD_DIGITS, MAX_DIGITS,
    };
    pub use crate::engine::{
        create_from_config, BbpSeries, CancellationToken, PiCalculator, PiCalculatorBuilder,
    };
    pub use crate::interfaces::{
        CalculationEvent, ConvergencePolicy, EventHandler, LoggingEventHandler,
        MagnitudeBelowLimit, NoOpEventHandler, Series,
    };
    pub use crate::numeric::{RoundingMode, ScaledDecimal};
}

/// π with exactly `digits` fraction digits, using the default calculator.
///
/// A timed-out run is reported as `CalculationTimeout` rather than returning
/// a possibly incomplete string.
pub fn calculate(digits: i64) -> CalculationResult<String> {
    engine::PiCalculator::default()
        .calculate(digits)
        .and_then(domain::CalculationOutcome::require_complete)
        .map(|outcome| outcome.to_string())
}
