// ============================================================================
// Merge Coordinator
// Spawns partition workers, waits with a deadline, rounds the merged sum
// ============================================================================

use super::accumulator::{AccumulatorSnapshot, GlobalAccumulator};
use super::bbp::BbpSeries;
use super::cancellation::{CancellationToken, StopSignal};
use super::partition::{PartitionWorker, ResidueClass, WorkerReport, WorkerStatus};
use crate::domain::{
    CalculationError, CalculationOutcome, CalculationResult, CalculatorConfig, CompletionStatus,
    RequestedDigits, WorkingPrecision,
};
use crate::interfaces::{
    CalculationEvent, ConvergencePolicy, EventHandler, MagnitudeBelowLimit, NoOpEventHandler,
    Series,
};
use crate::numeric::{NumericError, RoundingMode, ScaledDecimal};
use crate::utils::{pin_current_thread_to_core, recommend_core_assignment};
use chrono::Utc;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Rounding applied to the merged sum.
const RESULT_ROUNDING: RoundingMode = RoundingMode::HalfDown;

/// Parallel series evaluator.
///
/// One [`PartitionWorker`] per residue class runs on its own OS thread. Each
/// merges its partial sum into a shared [`GlobalAccumulator`] exactly once;
/// the coordinator rounds the total once all workers have reported.
///
/// On timeout the accumulator is sealed and whatever had merged so far is
/// returned with [`CompletionStatus::TimedOut`]: a possibly incomplete result.
/// Outstanding workers are signalled to stop and left to exit on their own.
pub struct PiCalculator {
    config: CalculatorConfig,
    series: Arc<dyn Series>,
    policy: Arc<dyn ConvergencePolicy>,
    event_handler: Arc<dyn EventHandler>,
}

/// How waiting for worker reports ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wait {
    AllReported,
    Cancelled,
    DeadlinePassed,
    Failed(NumericError),
    Disconnected,
}

struct SpawnedWorker {
    residue: u64,
    handle: JoinHandle<()>,
}

impl PiCalculator {
    /// Create a calculator from explicit parts.
    ///
    /// # Errors
    /// `InvalidConfig` if `config` fails validation.
    pub fn new(
        config: CalculatorConfig,
        series: Arc<dyn Series>,
        policy: Arc<dyn ConvergencePolicy>,
        event_handler: Arc<dyn EventHandler>,
    ) -> CalculationResult<Self> {
        config.validate().map_err(CalculationError::InvalidConfig)?;
        Ok(Self {
            config,
            series,
            policy,
            event_handler,
        })
    }

    /// BBP series with the default convergence policy and no event handler.
    pub fn with_config(config: CalculatorConfig) -> CalculationResult<Self> {
        Self::new(
            config,
            Arc::new(BbpSeries),
            Arc::new(MagnitudeBelowLimit),
            Arc::new(NoOpEventHandler),
        )
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Compute π with exactly `digits` digits after the decimal point.
    ///
    /// # Errors
    /// - `InvalidPrecision` if `digits < 1`
    /// - `Numeric` if a term fails to evaluate
    /// - `WorkerSpawn` / `WorkerPanicked` on thread failures
    ///
    /// A timeout is not an error; check [`CalculationOutcome::is_degraded`].
    pub fn calculate(&self, digits: i64) -> CalculationResult<CalculationOutcome> {
        self.calculate_with_cancel(digits, &CancellationToken::new())
    }

    /// Like [`calculate`](Self::calculate), stopping early with
    /// `Interrupted` once `cancel` fires.
    pub fn calculate_with_cancel(
        &self,
        digits: i64,
        cancel: &CancellationToken,
    ) -> CalculationResult<CalculationOutcome> {
        let started = Instant::now();
        let digits = RequestedDigits::new(digits)?;
        let precision = digits.working_precision();
        let limit = Arc::new(digits.convergence_limit());
        let total = self.config.workers;

        tracing::info!(
            digits = digits.get(),
            working_precision = precision.digits(),
            workers = total,
            series = self.series.name(),
            policy = self.policy.name(),
            "starting calculation"
        );
        self.event_handler.on_event(CalculationEvent::CalculationStarted {
            digits: digits.get(),
            working_precision: precision.digits(),
            workers: total,
            timestamp: Utc::now(),
        });

        let accumulator = Arc::new(GlobalAccumulator::new());
        let halt = CancellationToken::new();
        let (tx, rx) = channel::unbounded::<WorkerReport>();

        let workers = match self.spawn_workers(precision, &limit, &accumulator, &halt, cancel, tx) {
            Ok(workers) => workers,
            Err(err) => {
                halt.cancel();
                accumulator.seal();
                return Err(err);
            },
        };

        let deadline = started + self.config.timeout;
        match self.await_reports(&rx, total, deadline, cancel) {
            Wait::AllReported => {},
            Wait::Cancelled => {
                halt.cancel();
                return Err(self.interrupted(accumulator.seal(), total));
            },
            Wait::DeadlinePassed => {
                halt.cancel();
                let snapshot = accumulator.seal();
                return Ok(self.timed_out(digits, snapshot, total, started.elapsed()));
            },
            Wait::Failed(err) => {
                halt.cancel();
                accumulator.seal();
                return Err(err.into());
            },
            Wait::Disconnected => {
                // Every sender is gone but some worker never reported
                halt.cancel();
                accumulator.seal();
                return Err(CalculationError::WorkerPanicked {
                    residue: Self::find_panicked(workers),
                });
            },
        }

        for worker in workers {
            worker
                .handle
                .join()
                .map_err(|_| CalculationError::WorkerPanicked {
                    residue: Some(worker.residue),
                })?;
        }

        let snapshot = accumulator.seal();
        if snapshot.merges < total {
            // Only cancellation makes a worker stop without merging here
            return Err(self.interrupted(snapshot, total));
        }

        let elapsed = started.elapsed();
        tracing::info!(
            digits = digits.get(),
            terms = snapshot.terms,
            elapsed_ms = elapsed.as_millis() as u64,
            "calculation complete"
        );
        self.event_handler.on_event(CalculationEvent::CalculationCompleted {
            digits: digits.get(),
            elapsed,
            timestamp: Utc::now(),
        });

        Ok(Self::outcome(
            digits,
            snapshot,
            total,
            CompletionStatus::Complete,
            elapsed,
        ))
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn spawn_workers(
        &self,
        precision: WorkingPrecision,
        limit: &Arc<ScaledDecimal>,
        accumulator: &Arc<GlobalAccumulator>,
        halt: &CancellationToken,
        cancel: &CancellationToken,
        tx: Sender<WorkerReport>,
    ) -> CalculationResult<Vec<SpawnedWorker>> {
        let total = self.config.workers;
        let cores = if self.config.pin_workers {
            recommend_core_assignment(total)
        } else {
            Vec::new()
        };

        let mut spawned = Vec::with_capacity(total);
        for (index, class) in ResidueClass::partition(total as u64).enumerate() {
            let worker = PartitionWorker::new(
                class,
                precision,
                Arc::clone(limit),
                Arc::clone(&self.series),
                Arc::clone(&self.policy),
                StopSignal::new(halt.clone(), cancel.clone()),
            );
            let accumulator = Arc::clone(accumulator);
            let events = Arc::clone(&self.event_handler);
            let tx = tx.clone();
            let core = cores.get(index).copied();

            let handle = thread::Builder::new()
                .name(format!("bbp-worker-{}", class.residue()))
                .spawn(move || {
                    if let Some(core) = core {
                        if !pin_current_thread_to_core(core) {
                            tracing::debug!(core, "core pinning unavailable");
                        }
                    }
                    let report = worker.run(&accumulator, events.as_ref());
                    // The coordinator may have stopped listening after a timeout
                    let _ = tx.send(report);
                })
                .map_err(|e| CalculationError::WorkerSpawn(e.to_string()))?;

            spawned.push(SpawnedWorker {
                residue: class.residue(),
                handle,
            });
        }

        Ok(spawned)
    }

    /// Collect one report per worker until `deadline`.
    ///
    /// Past the deadline, reports already queued are still drained; the run
    /// times out only if the queue empties before every worker has reported.
    fn await_reports(
        &self,
        rx: &Receiver<WorkerReport>,
        total: usize,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Wait {
        let mut reported = 0usize;

        while reported < total {
            if cancel.is_cancelled() {
                return Wait::Cancelled;
            }

            let now = Instant::now();
            let received = if now >= deadline {
                match rx.try_recv() {
                    Ok(report) => Ok(report),
                    Err(TryRecvError::Empty) => return Wait::DeadlinePassed,
                    Err(TryRecvError::Disconnected) => Err(RecvTimeoutError::Disconnected),
                }
            } else {
                rx.recv_timeout((deadline - now).min(self.config.poll_interval))
            };

            match received {
                Ok(report) => {
                    reported += 1;
                    if let WorkerStatus::Failed(err) = report.status {
                        return Wait::Failed(err);
                    }
                },
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => return Wait::Disconnected,
            }
        }

        Wait::AllReported
    }

    /// Only called once every sender is dropped, so each thread is exiting.
    fn find_panicked(workers: Vec<SpawnedWorker>) -> Option<u64> {
        workers
            .into_iter()
            .find_map(|w| w.handle.join().is_err().then_some(w.residue))
    }

    fn timed_out(
        &self,
        digits: RequestedDigits,
        snapshot: AccumulatorSnapshot,
        total: usize,
        elapsed: Duration,
    ) -> CalculationOutcome {
        tracing::warn!(
            merged_workers = snapshot.merges,
            total_workers = total,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "calculation timed out, result may be incomplete"
        );
        self.event_handler.on_event(CalculationEvent::TimedOut {
            merged_workers: snapshot.merges,
            total_workers: total,
            timestamp: Utc::now(),
        });

        Self::outcome(digits, snapshot, total, CompletionStatus::TimedOut, elapsed)
    }

    fn interrupted(&self, snapshot: AccumulatorSnapshot, total: usize) -> CalculationError {
        tracing::warn!(
            merged_workers = snapshot.merges,
            total_workers = total,
            "calculation interrupted"
        );
        self.event_handler.on_event(CalculationEvent::Interrupted {
            merged_workers: snapshot.merges,
            total_workers: total,
            timestamp: Utc::now(),
        });

        CalculationError::Interrupted {
            merged_workers: snapshot.merges,
            total_workers: total,
        }
    }

    fn outcome(
        digits: RequestedDigits,
        snapshot: AccumulatorSnapshot,
        total: usize,
        status: CompletionStatus,
        elapsed: Duration,
    ) -> CalculationOutcome {
        CalculationOutcome {
            digits,
            value: snapshot.sum.with_scale(digits.get(), RESULT_ROUNDING),
            status,
            merged_workers: snapshot.merges,
            total_workers: total,
            terms_computed: snapshot.terms,
            elapsed,
        }
    }
}

impl Default for PiCalculator {
    /// Hardware-sized pool, reference timeout, BBP series.
    fn default() -> Self {
        Self {
            config: CalculatorConfig::default(),
            series: Arc::new(BbpSeries),
            policy: Arc::new(MagnitudeBelowLimit),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }
}

#[cfg(feature = "async")]
impl PiCalculator {
    /// Run [`calculate`](Self::calculate) on tokio's blocking pool.
    pub async fn calculate_async(
        self: Arc<Self>,
        digits: i64,
    ) -> CalculationResult<CalculationOutcome> {
        tokio::task::spawn_blocking(move || self.calculate(digits))
            .await
            .map_err(|_| CalculationError::WorkerPanicked { residue: None })?
    }
}
