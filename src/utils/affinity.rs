// ============================================================================
// Hardware Parallelism and CPU Affinity
// Sizing the worker pool and optionally pinning workers to cores
// ============================================================================
//
// Series workers are CPU-bound and never block, so one worker per hardware
// thread is the natural pool size. Pinning keeps each worker's big-integer
// buffers in one core's cache; it is only available with the `numa` feature.
//
// # Usage
//
// ```ignore
// use bbp_pi::utils::{hardware_parallelism, pin_current_thread_to_core};
//
// let workers = hardware_parallelism();
// pin_current_thread_to_core(0);
// ```
// ============================================================================

/// Number of hardware execution units, falling back to 1 when unknown.
pub fn hardware_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// Core IDs for `worker_count` workers, round-robin over the available cores.
pub fn recommend_core_assignment(worker_count: usize) -> Vec<usize> {
    let cores = available_cores();
    if cores.is_empty() {
        return Vec::new();
    }

    (0..worker_count).map(|i| cores[i % cores.len()]).collect()
}

/// Pin the current thread to a specific CPU core.
///
/// # Returns
/// * `true` if pinning succeeded
/// * `false` if the core doesn't exist or pinning failed
#[cfg(feature = "numa")]
pub fn pin_current_thread_to_core(core_id: usize) -> bool {
    let core_ids = core_affinity::get_core_ids().unwrap_or_default();

    core_ids
        .into_iter()
        .find(|id| id.id == core_id)
        .map(core_affinity::set_for_current)
        .unwrap_or(false)
}

/// Get all available core IDs on this system.
#[cfg(feature = "numa")]
pub fn available_cores() -> Vec<usize> {
    core_affinity::get_core_ids()
        .unwrap_or_default()
        .into_iter()
        .map(|id| id.id)
        .collect()
}

// ============================================================================
// Stub implementations when numa feature is disabled
// ============================================================================

/// Pin the current thread to a specific CPU core.
///
/// **Note:** This is a no-op stub. Enable the `numa` feature for actual CPU pinning.
#[cfg(not(feature = "numa"))]
pub fn pin_current_thread_to_core(_core_id: usize) -> bool {
    false
}

/// Get all available core IDs on this system.
///
/// **Note:** This is a stub. Enable the `numa` feature for actual core detection.
#[cfg(not(feature = "numa"))]
pub fn available_cores() -> Vec<usize> {
    (0..hardware_parallelism()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_parallelism_positive() {
        assert!(hardware_parallelism() >= 1);
    }

    #[test]
    fn test_recommend_core_assignment() {
        let cores = available_cores();
        let assignment = recommend_core_assignment(cores.len() * 2 + 1);

        if cores.is_empty() {
            assert!(assignment.is_empty());
        } else {
            assert_eq!(assignment.len(), cores.len() * 2 + 1);
            assert!(assignment.iter().all(|c| cores.contains(c)));
            assert_eq!(assignment[0], assignment[cores.len()]);
        }
    }

    #[test]
    fn test_recommend_zero_workers() {
        assert!(recommend_core_assignment(0).is_empty());
    }

    #[cfg(not(feature = "numa"))]
    #[test]
    fn test_pin_stub_reports_failure() {
        assert!(!pin_current_thread_to_core(0));
    }

    #[cfg(all(feature = "numa", target_os = "linux"))]
    #[test]
    fn test_pin_to_core() {
        let cores = available_cores();
        if let Some(&core) = cores.first() {
            assert!(pin_current_thread_to_core(core));
        }
    }
}
