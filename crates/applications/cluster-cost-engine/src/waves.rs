//! Wave scheduling
//!
//! A workload with more tasks than the parallelism limit runs in several
//! sequential batches ("waves"). The last wave may be partially filled.

use cluster_cost_core::{Result, ensure_positive_count};

/// Minimum number of sequential waves needed to run `task_count` tasks
/// when at most `max_parallel_tasks` run at once, i.e. `ceil(t / p)`.
///
/// Always at least 1 for valid input.
pub fn wave_count(task_count: u32, max_parallel_tasks: u32) -> Result<u32> {
    let task_count = ensure_positive_count("task_count", task_count)?;
    let max_parallel_tasks = ensure_positive_count("max_parallel_tasks", max_parallel_tasks)?;
    Ok(task_count.div_ceil(max_parallel_tasks))
}
