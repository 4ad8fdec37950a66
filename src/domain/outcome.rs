// ============================================================================
// Calculation Outcome
// Rounded result plus completion status and run statistics
// ============================================================================

use super::error::{CalculationError, CalculationResult};
use super::precision::RequestedDigits;
use crate::numeric::ScaledDecimal;
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether every worker contributed to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompletionStatus {
    /// All workers converged and merged
    Complete,
    /// Timeout elapsed first; the value is possibly incomplete
    TimedOut,
}

/// Result of one calculation.
///
/// `Display` prints the digit string, so `outcome.to_string()` is the value
/// with exactly `digits` fraction digits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalculationOutcome {
    pub digits: RequestedDigits,
    pub value: ScaledDecimal,
    pub status: CompletionStatus,
    /// Workers whose partial sum reached the accumulator
    pub merged_workers: usize,
    pub total_workers: usize,
    /// Terms summed by the merged workers
    pub terms_computed: u64,
    pub elapsed: Duration,
}

impl CalculationOutcome {
    /// True when the timeout fired before every worker merged.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.status == CompletionStatus::TimedOut
    }

    /// Reject a degraded outcome.
    ///
    /// # Errors
    /// `CalculationTimeout` when [`is_degraded`](Self::is_degraded) is true.
    pub fn require_complete(self) -> CalculationResult<Self> {
        match self.status {
            CompletionStatus::Complete => Ok(self),
            CompletionStatus::TimedOut => Err(CalculationError::CalculationTimeout {
                merged_workers: self.merged_workers,
                total_workers: self.total_workers,
            }),
        }
    }
}

impl fmt::Display for CalculationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: CompletionStatus, merged: usize) -> CalculationOutcome {
        CalculationOutcome {
            digits: RequestedDigits::new(2).unwrap(),
            value: "3.14".parse().unwrap(),
            status,
            merged_workers: merged,
            total_workers: 4,
            terms_computed: 3,
            elapsed: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_display_is_value() {
        assert_eq!(outcome(CompletionStatus::Complete, 4).to_string(), "3.14");
    }

    #[test]
    fn test_require_complete() {
        assert!(outcome(CompletionStatus::Complete, 4).require_complete().is_ok());

        let degraded = outcome(CompletionStatus::TimedOut, 1);
        assert!(degraded.is_degraded());
        assert_eq!(
            degraded.require_complete().unwrap_err(),
            CalculationError::CalculationTimeout {
                merged_workers: 1,
                total_workers: 4
            }
        );
    }
}
