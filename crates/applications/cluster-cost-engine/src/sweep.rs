//! Parameter sweeps over task counts
//!
//! Each point is an independent estimate of the same scenario, so points can
//! be evaluated in any order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cluster_cost_core::{CostError, Result};

use crate::estimate::Estimate;
use crate::scenario::Scenario;

/// Upper bound on the number of points in one sweep
pub const MAX_SWEEP_POINTS: usize = 10_000;

/// One evaluated point of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub task_count: u32,
    pub estimate: Estimate,
}

/// Price `scenario` once per entry of `task_counts`, in the given order.
///
/// Fails on the first invalid point; no partial sweep is returned.
pub fn sweep_task_counts(scenario: &Scenario, task_counts: &[u32]) -> Result<Vec<SweepPoint>> {
    if task_counts.is_empty() {
        return Err(CostError::invalid("task_counts", "sweep needs at least one task count"));
    }
    if task_counts.len() > MAX_SWEEP_POINTS {
        return Err(CostError::invalid(
            "task_counts",
            format!("{} points exceeds the limit of {MAX_SWEEP_POINTS}", task_counts.len()),
        ));
    }

    debug!("Sweeping {} task counts for {}", task_counts.len(), scenario.instance);

    task_counts
        .iter()
        .map(|&task_count| {
            let estimate = scenario.with_task_count(task_count).estimate()?;
            Ok(SweepPoint { task_count, estimate })
        })
        .collect()
}

/// Evenly spaced task counts from `start` to `end` inclusive
pub fn task_count_range(start: u32, end: u32, step: u32) -> Result<Vec<u32>> {
    if step == 0 {
        return Err(CostError::invalid("step", "must be at least 1"));
    }
    if start == 0 || start > end {
        return Err(CostError::invalid(
            "start",
            format!("must be in 1..={end}, got {start}"),
        ));
    }
    let points = u64::from(end - start) / u64::from(step) + 1;
    if points > MAX_SWEEP_POINTS as u64 {
        return Err(CostError::invalid(
            "step",
            format!("range {start}..={end} by {step} has {points} points, limit is {MAX_SWEEP_POINTS}"),
        ));
    }
    Ok((start..=end).step_by(step as usize).collect())
}
