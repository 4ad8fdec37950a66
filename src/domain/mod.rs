// ============================================================================
// Domain Models Module
// Precision, configuration, outcomes and errors of a calculation
// ============================================================================

pub mod config;
pub mod error;
pub mod outcome;
pub mod precision;

pub use config::CalculatorConfig;
pub use error::{CalculationError, CalculationResult};
pub use outcome::{CalculationOutcome, CompletionStatus};
pub use precision::{RequestedDigits, WorkingPrecision, GUARD_DIGITS, MAX_DIGITS};
