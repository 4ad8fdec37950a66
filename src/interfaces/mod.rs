// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod convergence;
mod event_handler;
mod series;

pub use convergence::{ConvergencePolicy, MagnitudeBelowLimit};
pub use event_handler::{CalculationEvent, EventHandler, LoggingEventHandler, NoOpEventHandler};
pub use series::Series;
