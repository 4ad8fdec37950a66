// ============================================================================
// Event Handler Interface
// Defines the contract for observing calculation progress
// ============================================================================

use chrono::{DateTime, Utc};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the calculator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalculationEvent {
    /// Precision derived, workers about to spawn
    CalculationStarted {
        digits: u32,
        working_precision: u32,
        workers: usize,
        timestamp: DateTime<Utc>,
    },

    /// A worker thread began its residue class
    WorkerStarted {
        residue: u64,
        timestamp: DateTime<Utc>,
    },

    /// A worker converged and its partial sum reached the accumulator
    WorkerMerged {
        residue: u64,
        terms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A worker stopped without merging (timeout, cancellation or failure)
    WorkerAbandoned {
        residue: u64,
        terms: u64,
        timestamp: DateTime<Utc>,
    },

    /// Timeout elapsed before every worker merged
    TimedOut {
        merged_workers: usize,
        total_workers: usize,
        timestamp: DateTime<Utc>,
    },

    /// The caller cancelled the calculation
    Interrupted {
        merged_workers: usize,
        total_workers: usize,
        timestamp: DateTime<Utc>,
    },

    /// Final value rounded and returned
    CalculationCompleted {
        digits: u32,
        elapsed: Duration,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing calculator events
/// Implementations can handle logging, metrics, progress display, etc.
///
/// Worker events are delivered from worker threads.
pub trait EventHandler: Send + Sync {
    /// Handle a calculation event
    fn on_event(&self, event: CalculationEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<CalculationEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: CalculationEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: CalculationEvent) {
        tracing::debug!("Calculator event: {:?}", event);
    }
}
