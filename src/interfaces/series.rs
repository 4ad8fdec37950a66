// ============================================================================
// Series Interface
// Contract for evaluating one term of a convergent series
// ============================================================================

use crate::domain::WorkingPrecision;
use crate::numeric::{NumericResult, ScaledDecimal};

/// A series whose terms can be evaluated independently by index.
///
/// Implementations must be pure: the same `(k, precision)` always yields the
/// same value, regardless of which worker asks or in what order.
pub trait Series: Send + Sync {
    /// Value of the `k`-th term at `precision` fraction digits.
    fn term(&self, k: u64, precision: WorkingPrecision) -> NumericResult<ScaledDecimal>;

    /// Series name for logging
    fn name(&self) -> &str;
}
