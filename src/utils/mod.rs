// ============================================================================
// Utilities Module
// Worker pool sizing and thread placement helpers
// ============================================================================

mod affinity;

pub use affinity::{
    available_cores, hardware_parallelism, pin_current_thread_to_core, recommend_core_assignment,
};
