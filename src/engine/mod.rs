// ============================================================================
// Engine Module
// Term evaluation, partition workers and the merge coordinator
// ============================================================================

mod accumulator;
mod bbp;
mod cancellation;
mod coordinator;
mod partition;

pub mod factory;

pub use accumulator::{AccumulatorSnapshot, GlobalAccumulator};
pub use bbp::BbpSeries;
pub use cancellation::CancellationToken;
pub use coordinator::PiCalculator;
pub use factory::{create_from_config, PiCalculatorBuilder};
pub use partition::{PartitionWorker, ResidueClass, WorkerOutcome, WorkerReport, WorkerStatus};
