//! Reduce the two cost breakdowns to a verdict

use cluster_cost_core::{ClusterKind, CostBreakdown, Verdict};

/// Pick the cheaper and the faster option.
///
/// Ties resolve to the all-purpose cluster, for cost and for time alike.
pub fn compare(job: &CostBreakdown, all_purpose: &CostBreakdown) -> Verdict {
    let cheaper = if job.total_cost < all_purpose.total_cost {
        ClusterKind::Job
    } else {
        ClusterKind::AllPurpose
    };
    let faster = if job.active_time_min < all_purpose.active_time_min {
        ClusterKind::Job
    } else {
        ClusterKind::AllPurpose
    };

    let savings_absolute = (job.total_cost - all_purpose.total_cost).abs();
    let most_expensive = job.total_cost.max(all_purpose.total_cost);
    let savings_percent = if most_expensive > 0.0 {
        savings_absolute / most_expensive * 100.0
    } else {
        0.0
    };

    Verdict {
        cheaper,
        savings_absolute,
        savings_percent,
        faster,
        time_saved_min: (job.active_time_min - all_purpose.active_time_min).abs(),
    }
}
