//! Cost models for the two billing modes
//!
//! Both models share the wave count but charge startup overhead differently:
//! - Job: the ephemeral cluster spins up again for every wave
//! - All-purpose: the cluster is already warm, overhead is paid once

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cluster_cost_core::{
    BillingRates, ClusterConfig, ClusterKind, CostBreakdown, CostError, HourlyCost, Result,
    WorkloadSpec,
};

use crate::waves::wave_count;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Cost model trait
pub trait CostModel {
    /// Billing mode this model prices
    fn kind(&self) -> ClusterKind;

    /// Price `workload` on a cluster shaped like `config`
    fn compute(
        &self,
        config: &ClusterConfig<'_>,
        workload: &WorkloadSpec,
        rates: &BillingRates,
    ) -> Result<CostBreakdown>;
}

/// How the job model bills DBUs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum JobDbuConvention {
    /// Execution time of one task only, not scaled by wave count
    #[default]
    ExecutionOnly,
    /// Execution DBU cost multiplied by the wave count.
    /// Unconfirmed variant, opt-in only.
    PerWave,
}

/// Ephemeral per-job cluster
#[derive(Debug, Clone, Copy, Default)]
pub struct JobClusterCostModel {
    pub dbu_convention: JobDbuConvention,
}

impl JobClusterCostModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_convention(dbu_convention: JobDbuConvention) -> Self {
        JobClusterCostModel { dbu_convention }
    }
}

impl CostModel for JobClusterCostModel {
    fn kind(&self) -> ClusterKind {
        ClusterKind::Job
    }

    fn compute(
        &self,
        config: &ClusterConfig<'_>,
        workload: &WorkloadSpec,
        rates: &BillingRates,
    ) -> Result<CostBreakdown> {
        let waves = wave_count(workload.task_count(), config.max_parallel_tasks())?;
        let exec_min = workload.exec_time_per_task_min();

        // Every wave pays its own spin-up
        let active_time_min = f64::from(waves) * (config.startup_overhead_min() + exec_min);
        let vm_cost = (active_time_min / MINUTES_PER_HOUR) * config.vm_cost_per_hour();

        // Startup overhead is never billed as DBU time
        let execution_dbu_cost = (exec_min / MINUTES_PER_HOUR) * config.total_dbus() * rates.dbu_rate_job();
        let dbu_cost = match self.dbu_convention {
            JobDbuConvention::ExecutionOnly => execution_dbu_cost,
            JobDbuConvention::PerWave => execution_dbu_cost * f64::from(waves),
        };

        let total_cost = vm_cost + dbu_cost;
        let cost_per_task = total_cost / f64::from(workload.task_count());

        debug!(
            "Job cluster: {} waves, {:.2} min active, vm {:.4} + dbu {:.4} = {:.4} ({:?})",
            waves, active_time_min, vm_cost, dbu_cost, total_cost, self.dbu_convention
        );

        ensure_finite(CostBreakdown {
            kind: ClusterKind::Job,
            wave_count: waves,
            active_time_min,
            vm_cost,
            dbu_cost,
            total_cost,
            cost_per_task: Some(cost_per_task),
            hourly: None,
        })
    }
}

/// Persistent always-on cluster
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPurposeClusterCostModel;

impl AllPurposeClusterCostModel {
    pub fn new() -> Self {
        AllPurposeClusterCostModel
    }
}

impl CostModel for AllPurposeClusterCostModel {
    fn kind(&self) -> ClusterKind {
        ClusterKind::AllPurpose
    }

    fn compute(
        &self,
        config: &ClusterConfig<'_>,
        workload: &WorkloadSpec,
        rates: &BillingRates,
    ) -> Result<CostBreakdown> {
        let waves = wave_count(workload.task_count(), config.max_parallel_tasks())?;

        // Overhead once, execution accumulates per wave
        let active_time_min =
            config.startup_overhead_min() + f64::from(waves) * workload.exec_time_per_task_min();

        let vm_cost_per_hour = config.vm_cost_per_hour();
        let dbu_cost_per_hour = config.total_dbus() * rates.dbu_rate_all_purpose();
        let hours = active_time_min / MINUTES_PER_HOUR;

        let vm_cost = hours * vm_cost_per_hour;
        let dbu_cost = hours * dbu_cost_per_hour;
        let total_cost = vm_cost + dbu_cost;

        debug!(
            "All-purpose cluster: {} waves, {:.2} min active, {:.4}/h vm + {:.4}/h dbu, total {:.4}",
            waves, active_time_min, vm_cost_per_hour, dbu_cost_per_hour, total_cost
        );

        ensure_finite(CostBreakdown {
            kind: ClusterKind::AllPurpose,
            wave_count: waves,
            active_time_min,
            vm_cost,
            dbu_cost,
            total_cost,
            cost_per_task: None,
            hourly: Some(HourlyCost {
                vm_cost_per_hour,
                dbu_cost_per_hour,
                total_cost_per_hour: vm_cost_per_hour + dbu_cost_per_hour,
            }),
        })
    }
}

/// Reject breakdowns whose time or money overflowed f64.
///
/// Inputs are finite, but their products need not be.
fn ensure_finite(breakdown: CostBreakdown) -> Result<CostBreakdown> {
    let quantities = [
        ("active_time_min", breakdown.active_time_min),
        ("vm_cost", breakdown.vm_cost),
        ("dbu_cost", breakdown.dbu_cost),
        ("total_cost", breakdown.total_cost),
    ];
    for (name, value) in quantities {
        if !value.is_finite() {
            return Err(CostError::invalid(
                name,
                format!("{} cluster estimate overflows ({value})", breakdown.kind),
            ));
        }
    }
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    const EPS: f64 = 1e-9;

    fn workload(tasks: u32) -> WorkloadSpec {
        WorkloadSpec::new(tasks, 10.0).unwrap()
    }

    #[test]
    fn test_job_model_reference_numbers() {
        let vm = catalog::resolve("D4A_V4").unwrap();
        let config = ClusterConfig::new(vm, vm, 1, 35, 2.5).unwrap();
        let rates = BillingRates::default();

        let result = JobClusterCostModel::new().compute(&config, &workload(100), &rates).unwrap();

        assert_eq!(result.kind, ClusterKind::Job);
        assert_eq!(result.wave_count, 3);
        assert!((result.active_time_min - 37.5).abs() < EPS);
        assert!((result.vm_cost - 0.275875).abs() < EPS);
        assert!((result.dbu_cost - 0.072).abs() < EPS);
        assert!((result.total_cost - 0.347875).abs() < EPS);
        assert_eq!(result.total_cost, result.vm_cost + result.dbu_cost);
        assert!((result.cost_per_task.unwrap() - 0.00347875).abs() < EPS);
        assert!(result.hourly.is_none());
    }

    #[test]
    fn test_job_model_per_wave_variant() {
        let vm = catalog::resolve("D4A_V4").unwrap();
        let config = ClusterConfig::new(vm, vm, 1, 35, 2.5).unwrap();
        let rates = BillingRates::default();

        let canonical = JobClusterCostModel::new().compute(&config, &workload(100), &rates).unwrap();
        let variant = JobClusterCostModel::with_convention(JobDbuConvention::PerWave)
            .compute(&config, &workload(100), &rates)
            .unwrap();

        assert_eq!(variant.vm_cost, canonical.vm_cost);
        assert!((variant.dbu_cost - 3.0 * canonical.dbu_cost).abs() < EPS);
        assert_eq!(variant.total_cost, variant.vm_cost + variant.dbu_cost);
    }

    #[test]
    fn test_job_model_single_wave() {
        let vm = catalog::resolve("D4DS_V5").unwrap();
        let config = ClusterConfig::new(vm, vm, 2, 35, 2.5).unwrap();

        let result = JobClusterCostModel::new()
            .compute(&config, &workload(35), &BillingRates::default())
            .unwrap();

        assert_eq!(result.wave_count, 1);
        assert!((result.active_time_min - 12.5).abs() < EPS);
    }

    #[test]
    fn test_all_purpose_reference_numbers() {
        let vm = catalog::resolve("D4A_V4").unwrap();
        let config = ClusterConfig::new(vm, vm, 1, 35, 2.5).unwrap();
        let rates = BillingRates::default();

        let result = AllPurposeClusterCostModel::new().compute(&config, &workload(100), &rates).unwrap();

        assert_eq!(result.kind, ClusterKind::AllPurpose);
        assert_eq!(result.wave_count, 3);
        assert!((result.active_time_min - 32.5).abs() < EPS);

        let hourly = result.hourly.unwrap();
        assert!((hourly.vm_cost_per_hour - 0.4414).abs() < EPS);
        assert!((hourly.dbu_cost_per_hour - 1.5 * 0.528).abs() < EPS);
        assert!((hourly.total_cost_per_hour - (0.4414 + 0.792)).abs() < EPS);

        let expected_total = (32.5 / 60.0) * (0.4414 + 0.792);
        assert!((result.total_cost - expected_total).abs() < EPS);
        assert_eq!(result.total_cost, result.vm_cost + result.dbu_cost);
        assert!(result.cost_per_task.is_none());
    }

    #[test]
    fn test_overhead_scaling_differs_between_models() {
        let vm = catalog::resolve("E4DS_V5").unwrap();
        let rates = BillingRates::default();
        let no_overhead = ClusterConfig::new(vm, vm, 4, 4, 0.0).unwrap();
        let with_overhead = ClusterConfig::new(vm, vm, 4, 4, 5.0).unwrap();
        let work = workload(20); // 5 waves

        let job_delta = JobClusterCostModel::new().compute(&with_overhead, &work, &rates).unwrap().active_time_min
            - JobClusterCostModel::new().compute(&no_overhead, &work, &rates).unwrap().active_time_min;
        let ap_delta = AllPurposeClusterCostModel::new().compute(&with_overhead, &work, &rates).unwrap().active_time_min
            - AllPurposeClusterCostModel::new().compute(&no_overhead, &work, &rates).unwrap().active_time_min;

        assert!((job_delta - 25.0).abs() < EPS);
        assert!((ap_delta - 5.0).abs() < EPS);
    }

    #[test]
    fn test_total_cost_monotonic_in_task_count() {
        let vm = catalog::resolve("DS4_V2").unwrap();
        let config = ClusterConfig::new(vm, vm, 3, 3, 2.5).unwrap();
        let rates = BillingRates::default();
        let models: [&dyn CostModel; 2] = [&JobClusterCostModel::new(), &AllPurposeClusterCostModel::new()];

        for model in models {
            let mut previous = 0.0;
            for tasks in 1..=50 {
                let total = model.compute(&config, &workload(tasks), &rates).unwrap().total_cost;
                assert!(total >= previous, "{} decreased at {tasks} tasks", model.kind());
                previous = total;
            }
        }
    }

    #[test]
    fn test_overflowing_products_are_rejected() {
        let vm = catalog::resolve("D4A_V4").unwrap();
        let config = ClusterConfig::new(vm, vm, 1, 1, 0.0).unwrap();
        let huge = WorkloadSpec::new(2, 1.0e308).unwrap();
        let rates = BillingRates::default();

        let models: [&dyn CostModel; 2] = [&JobClusterCostModel::new(), &AllPurposeClusterCostModel::new()];
        for model in models {
            assert!(
                matches!(
                    model.compute(&config, &huge, &rates),
                    Err(CostError::InvalidParameter { name: "active_time_min", .. })
                ),
                "{} accepted an infinite active time",
                model.kind()
            );
        }

        // Active time stays finite, the hourly price pushes the cost past f64::MAX
        let wide = ClusterConfig::new(vm, vm, 500_000_000, 1, 0.0).unwrap();
        let long = WorkloadSpec::new(1, 1.0e307).unwrap();
        for model in models {
            assert!(matches!(
                model.compute(&wide, &long, &rates),
                Err(CostError::InvalidParameter { name: "vm_cost", .. })
            ));
        }
    }

    #[test]
    fn test_dbu_convention_wire_names() {
        let parsed: JobDbuConvention = serde_json::from_str("\"per_wave\"").unwrap();
        assert_eq!(parsed, JobDbuConvention::PerWave);
        assert_eq!(JobDbuConvention::default(), JobDbuConvention::ExecutionOnly);
    }
}
