// ============================================================================
// Partition Worker
// Sums one residue class of series indices until its own terms converge
// ============================================================================

use super::accumulator::GlobalAccumulator;
use super::cancellation::StopSignal;
use crate::domain::WorkingPrecision;
use crate::interfaces::{CalculationEvent, ConvergencePolicy, EventHandler, Series};
use crate::numeric::{NumericError, ScaledDecimal};
use chrono::Utc;
use std::sync::Arc;

// ============================================================================
// Residue Class
// ============================================================================

/// Indices `k` with `k mod modulus == residue`.
///
/// The classes `0..modulus` of one modulus are pairwise disjoint and together
/// cover every index, so each term is summed by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueClass {
    residue: u64,
    modulus: u64,
}

impl ResidueClass {
    /// `None` unless `residue < modulus`.
    pub fn new(residue: u64, modulus: u64) -> Option<Self> {
        (residue < modulus).then_some(Self { residue, modulus })
    }

    /// Every class of `modulus`, in residue order.
    pub fn partition(modulus: u64) -> impl Iterator<Item = ResidueClass> {
        (0..modulus).map(move |residue| Self { residue, modulus })
    }

    #[inline]
    pub fn residue(&self) -> u64 {
        self.residue
    }

    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    #[inline]
    pub fn contains(&self, k: u64) -> bool {
        k % self.modulus == self.residue
    }

    /// `residue, residue + modulus, residue + 2·modulus, …` up to `u64::MAX`.
    pub fn indices(&self) -> impl Iterator<Item = u64> {
        let step = self.modulus;
        std::iter::successors(Some(self.residue), move |k| k.checked_add(step))
    }
}

// ============================================================================
// Worker Outcome
// ============================================================================

/// What a worker's summation loop ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// The convergence policy fired; `partial` includes the final term
    Converged { partial: ScaledDecimal, terms: u64 },
    /// Halted or cancelled before converging; partial work is dropped
    Stopped { terms: u64 },
    /// A term could not be evaluated
    Failed { error: NumericError, terms: u64 },
}

/// How a worker's run ended, as reported to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Merged,
    /// Converged, but the accumulator was already sealed
    Discarded,
    Stopped,
    Failed(NumericError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub residue: u64,
    pub terms: u64,
    pub status: WorkerStatus,
}

// ============================================================================
// Partition Worker
// ============================================================================

/// Owns one residue class for the lifetime of a calculation.
pub struct PartitionWorker {
    class: ResidueClass,
    precision: WorkingPrecision,
    limit: Arc<ScaledDecimal>,
    series: Arc<dyn Series>,
    policy: Arc<dyn ConvergencePolicy>,
    stop: StopSignal,
}

impl PartitionWorker {
    pub(crate) fn new(
        class: ResidueClass,
        precision: WorkingPrecision,
        limit: Arc<ScaledDecimal>,
        series: Arc<dyn Series>,
        policy: Arc<dyn ConvergencePolicy>,
        stop: StopSignal,
    ) -> Self {
        Self {
            class,
            precision,
            limit,
            series,
            policy,
            stop,
        }
    }

    #[inline]
    pub fn class(&self) -> ResidueClass {
        self.class
    }

    /// Sum this class's terms into a private partial sum.
    ///
    /// The stop signal is checked before every term; the convergence policy
    /// after every term.
    pub fn accumulate(&self) -> WorkerOutcome {
        let mut partial = ScaledDecimal::zero();
        let mut terms = 0u64;

        for k in self.class.indices() {
            if self.stop.should_stop() {
                return WorkerOutcome::Stopped { terms };
            }

            let term = match self.series.term(k, self.precision) {
                Ok(term) => term,
                Err(error) => return WorkerOutcome::Failed { error, terms },
            };
            partial += &term;
            terms += 1;

            if self.policy.should_stop(&term, &self.limit) {
                return WorkerOutcome::Converged { partial, terms };
            }
        }

        WorkerOutcome::Stopped { terms }
    }

    /// Accumulate, then merge once into `accumulator` if converged.
    pub fn run(&self, accumulator: &GlobalAccumulator, events: &dyn EventHandler) -> WorkerReport {
        let residue = self.class.residue();
        events.on_event(CalculationEvent::WorkerStarted {
            residue,
            timestamp: Utc::now(),
        });

        let (terms, status) = match self.accumulate() {
            WorkerOutcome::Converged { partial, terms } => {
                if accumulator.merge(&partial, terms) {
                    tracing::debug!(residue, terms, "partial sum merged");
                    (terms, WorkerStatus::Merged)
                } else {
                    tracing::debug!(residue, terms, "accumulator sealed, partial sum discarded");
                    (terms, WorkerStatus::Discarded)
                }
            },
            WorkerOutcome::Stopped { terms } => {
                tracing::debug!(residue, terms, "worker stopped before converging");
                (terms, WorkerStatus::Stopped)
            },
            WorkerOutcome::Failed { error, terms } => {
                tracing::error!(residue, terms, %error, "term evaluation failed");
                (terms, WorkerStatus::Failed(error))
            },
        };

        let event = if status == WorkerStatus::Merged {
            CalculationEvent::WorkerMerged {
                residue,
                terms,
                timestamp: Utc::now(),
            }
        } else {
            CalculationEvent::WorkerAbandoned {
                residue,
                terms,
                timestamp: Utc::now(),
            }
        };
        events.on_event(event);

        WorkerReport {
            residue,
            terms,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bbp::BbpSeries;
    use crate::engine::cancellation::CancellationToken;
    use crate::interfaces::{MagnitudeBelowLimit, NoOpEventHandler};
    use crate::numeric::NumericResult;
    use proptest::prelude::*;

    struct FailingSeries;

    impl Series for FailingSeries {
        fn term(&self, k: u64, _precision: WorkingPrecision) -> NumericResult<ScaledDecimal> {
            if k >= 2 {
                Err(NumericError::DivisionByZero)
            } else {
                Ok(ScaledDecimal::from_integer(1))
            }
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn worker(
        residue: u64,
        modulus: u64,
        digits: u32,
        series: Arc<dyn Series>,
        stop: StopSignal,
    ) -> PartitionWorker {
        PartitionWorker::new(
            ResidueClass::new(residue, modulus).unwrap(),
            WorkingPrecision::new(digits + 5),
            Arc::new(ScaledDecimal::ten_to_minus(digits)),
            series,
            Arc::new(MagnitudeBelowLimit),
            stop,
        )
    }

    fn running() -> StopSignal {
        StopSignal::new(CancellationToken::new(), CancellationToken::new())
    }

    #[test]
    fn test_residue_class_bounds() {
        assert!(ResidueClass::new(3, 4).is_some());
        assert!(ResidueClass::new(4, 4).is_none());
        assert!(ResidueClass::new(0, 0).is_none());
    }

    #[test]
    fn test_indices_step_by_modulus() {
        let class = ResidueClass::new(2, 5).unwrap();
        let first: Vec<u64> = class.indices().take(4).collect();
        assert_eq!(first, vec![2, 7, 12, 17]);
        assert!(first.iter().all(|&k| class.contains(k)));
    }

    #[test]
    fn test_indices_stop_at_u64_max() {
        let class = ResidueClass::new(0, u64::MAX).unwrap();
        let all: Vec<u64> = class.indices().collect();
        assert_eq!(all, vec![0, u64::MAX]);
    }

    #[test]
    fn test_partition_is_exhaustive_and_disjoint() {
        for modulus in 1..=8u64 {
            let mut owners = vec![0u32; 1000];
            for class in ResidueClass::partition(modulus) {
                for k in class.indices().take_while(|&k| k < 1000) {
                    owners[k as usize] += 1;
                }
            }
            assert!(
                owners.iter().all(|&count| count == 1),
                "modulus {} left a gap or overlap",
                modulus
            );
        }
    }

    proptest! {
        #[test]
        fn prop_each_index_has_one_owner(modulus in 1u64..64, k in 0u64..1_000_000) {
            let owners = ResidueClass::partition(modulus)
                .filter(|class| class.contains(k))
                .count();
            prop_assert_eq!(owners, 1);
        }
    }

    #[test]
    fn test_single_worker_converges_to_pi() {
        let w = worker(0, 1, 10, Arc::new(BbpSeries), running());
        match w.accumulate() {
            WorkerOutcome::Converged { partial, terms } => {
                let rounded = partial.with_scale(10, crate::numeric::RoundingMode::HalfDown);
                assert_eq!(rounded.to_string(), "3.1415926536");
                assert!(terms <= 12, "took {} terms", terms);
            },
            other => panic!("expected convergence, got {:?}", other),
        }
    }

    #[test]
    fn test_stopped_worker_merges_nothing() {
        let halt = CancellationToken::new();
        halt.cancel();
        let w = worker(1, 4, 20, Arc::new(BbpSeries), StopSignal::new(halt, CancellationToken::new()));

        assert_eq!(w.accumulate(), WorkerOutcome::Stopped { terms: 0 });

        let acc = GlobalAccumulator::new();
        let report = w.run(&acc, &NoOpEventHandler);
        assert_eq!(report.status, WorkerStatus::Stopped);
        assert_eq!(acc.snapshot().merges, 0);
    }

    #[test]
    fn test_failed_term_reports_error() {
        let w = worker(0, 1, 5, Arc::new(FailingSeries), running());
        assert_eq!(
            w.accumulate(),
            WorkerOutcome::Failed {
                error: NumericError::DivisionByZero,
                terms: 2
            }
        );

        let acc = GlobalAccumulator::new();
        let report = w.run(&acc, &NoOpEventHandler);
        assert_eq!(report.status, WorkerStatus::Failed(NumericError::DivisionByZero));
        assert!(acc.snapshot().sum.is_zero());
    }

    #[test]
    fn test_run_merges_exactly_once() {
        let acc = GlobalAccumulator::new();
        let w = worker(0, 2, 8, Arc::new(BbpSeries), running());
        let report = w.run(&acc, &NoOpEventHandler);

        assert_eq!(report.status, WorkerStatus::Merged);
        assert_eq!(report.residue, 0);
        let snap = acc.snapshot();
        assert_eq!(snap.merges, 1);
        assert_eq!(snap.terms, report.terms);
    }

    #[test]
    fn test_run_on_sealed_accumulator_discards() {
        let acc = GlobalAccumulator::new();
        acc.seal();
        let w = worker(0, 1, 3, Arc::new(BbpSeries), running());
        let report = w.run(&acc, &NoOpEventHandler);

        assert_eq!(report.status, WorkerStatus::Discarded);
        assert!(acc.snapshot().sum.is_zero());
    }
}
