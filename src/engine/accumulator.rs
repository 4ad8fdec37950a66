// ============================================================================
// Global Accumulator
// The single shared sum that worker partial sums merge into
// ============================================================================

use crate::numeric::ScaledDecimal;
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct AccumulatorState {
    sum: ScaledDecimal,
    merges: usize,
    terms: u64,
    sealed: bool,
}

/// Point-in-time copy of the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatorSnapshot {
    pub sum: ScaledDecimal,
    /// Number of partial sums merged
    pub merges: usize,
    /// Terms behind the merged partial sums
    pub terms: u64,
}

/// Mutex-guarded running sum.
///
/// Each merge is one lock-held read-modify-write, so a partial sum is either
/// fully in the total or not at all. After [`seal`](Self::seal) every merge
/// is rejected, which freezes the value a timed-out coordinator returns.
#[derive(Debug, Default)]
pub struct GlobalAccumulator {
    state: Mutex<AccumulatorState>,
}

impl GlobalAccumulator {
    /// Accumulator at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one worker's partial sum. Returns `false` if the accumulator was
    /// already sealed and the partial sum was discarded.
    pub fn merge(&self, partial: &ScaledDecimal, terms: u64) -> bool {
        let mut state = self.state.lock();
        if state.sealed {
            return false;
        }
        state.sum += partial;
        state.merges += 1;
        state.terms += terms;
        true
    }

    /// Reject all further merges and return the final state.
    pub fn seal(&self) -> AccumulatorSnapshot {
        let mut state = self.state.lock();
        state.sealed = true;
        Self::snapshot_of(&state)
    }

    /// Current state without sealing.
    pub fn snapshot(&self) -> AccumulatorSnapshot {
        Self::snapshot_of(&self.state.lock())
    }

    pub fn is_sealed(&self) -> bool {
        self.state.lock().sealed
    }

    fn snapshot_of(state: &AccumulatorState) -> AccumulatorSnapshot {
        AccumulatorSnapshot {
            sum: state.sum.clone(),
            merges: state.merges,
            terms: state.terms,
        }
    }
}
