// ============================================================================
// Calculation Errors
// Error taxonomy surfaced by the calculator
// ============================================================================

use crate::numeric::NumericError;
use std::fmt;

/// Errors returned by a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// Requested digit count was not a positive `u32`
    InvalidPrecision { requested: i64 },
    /// Calculator configuration failed validation
    InvalidConfig(String),
    /// Not every worker merged before the timeout elapsed
    CalculationTimeout {
        merged_workers: usize,
        total_workers: usize,
    },
    /// The caller cancelled the calculation
    Interrupted {
        merged_workers: usize,
        total_workers: usize,
    },
    /// A series term could not be evaluated
    Numeric(NumericError),
    /// The OS refused to start a worker thread
    WorkerSpawn(String),
    /// A worker thread panicked before reporting
    WorkerPanicked { residue: Option<u64> },
}

impl fmt::Display for CalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationError::InvalidPrecision { requested } => write!(
                f,
                "invalid precision: {} digits requested, at least 1 required",
                requested
            ),
            CalculationError::InvalidConfig(reason) => {
                write!(f, "invalid calculator configuration: {}", reason)
            },
            CalculationError::CalculationTimeout {
                merged_workers,
                total_workers,
            } => write!(
                f,
                "calculation timed out: {} of {} workers merged, result may be incomplete",
                merged_workers, total_workers
            ),
            CalculationError::Interrupted {
                merged_workers,
                total_workers,
            } => write!(
                f,
                "calculation interrupted: {} of {} workers merged",
                merged_workers, total_workers
            ),
            CalculationError::Numeric(err) => write!(f, "term evaluation failed: {}", err),
            CalculationError::WorkerSpawn(reason) => {
                write!(f, "failed to spawn worker thread: {}", reason)
            },
            CalculationError::WorkerPanicked { residue: Some(r) } => {
                write!(f, "worker for residue class {} panicked", r)
            },
            CalculationError::WorkerPanicked { residue: None } => {
                write!(f, "a worker panicked before reporting")
            },
        }
    }
}

impl std::error::Error for CalculationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalculationError::Numeric(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NumericError> for CalculationError {
    fn from(err: NumericError) -> Self {
        CalculationError::Numeric(err)
    }
}

/// Result type alias for calculations
pub type CalculationResult<T> = Result<T, CalculationError>;
