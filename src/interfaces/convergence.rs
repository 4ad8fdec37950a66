// ============================================================================
// Convergence Policy
// Per-worker stopping predicate
// ============================================================================

use crate::numeric::ScaledDecimal;

/// Decides when a worker has summed enough terms.
///
/// Evaluated by each worker on its own most recent term only; there is no
/// shared convergence state between workers.
pub trait ConvergencePolicy: Send + Sync {
    fn should_stop(&self, term: &ScaledDecimal, limit: &ScaledDecimal) -> bool;

    /// Policy name for logging
    fn name(&self) -> &str;
}

/// Stop once `|term| < limit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagnitudeBelowLimit;

impl ConvergencePolicy for MagnitudeBelowLimit {
    #[inline]
    fn should_stop(&self, term: &ScaledDecimal, limit: &ScaledDecimal) -> bool {
        term.abs() < *limit
    }

    fn name(&self) -> &str {
        "magnitude-below-limit"
    }
}
