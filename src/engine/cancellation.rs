// ============================================================================
// Cancellation
// Cooperative stop signal shared between a caller, the coordinator and workers
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable one-way stop flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// The two tokens a worker watches: the coordinator's own halt signal and
/// the caller's cancellation.
#[derive(Debug, Clone)]
pub(crate) struct StopSignal {
    halt: CancellationToken,
    external: CancellationToken,
}

impl StopSignal {
    pub(crate) fn new(halt: CancellationToken, external: CancellationToken) -> Self {
        Self { halt, external }
    }

    #[inline]
    pub(crate) fn should_stop(&self) -> bool {
        self.halt.is_cancelled() || self.external.is_cancelled()
    }
}
