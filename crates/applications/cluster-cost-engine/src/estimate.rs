//! Full estimate: price both billing models and compare them

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cluster_cost_core::{BillingRates, ClusterConfig, CostBreakdown, Result, Verdict, WorkloadSpec};

use crate::comparison::compare;
use crate::models::{AllPurposeClusterCostModel, CostModel, JobClusterCostModel, JobDbuConvention};

/// Both breakdowns and the verdict for one workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub job: CostBreakdown,
    pub all_purpose: CostBreakdown,
    pub verdict: Verdict,
}

/// Prices one workload on both billing models with a fixed set of rates
#[derive(Debug, Clone, Copy)]
pub struct Estimator {
    rates: BillingRates,
    job_model: JobClusterCostModel,
    all_purpose_model: AllPurposeClusterCostModel,
}

impl Estimator {
    pub fn new(rates: BillingRates) -> Self {
        Self::with_convention(rates, JobDbuConvention::default())
    }

    pub fn with_convention(rates: BillingRates, dbu_convention: JobDbuConvention) -> Self {
        if !rates.job_is_discounted() {
            warn!(
                "Job DBU rate {} is not below the all-purpose rate {}",
                rates.dbu_rate_job(),
                rates.dbu_rate_all_purpose()
            );
        }
        if dbu_convention != JobDbuConvention::default() {
            warn!("Using unconfirmed job DBU convention: {:?}", dbu_convention);
        }

        Estimator {
            rates,
            job_model: JobClusterCostModel::with_convention(dbu_convention),
            all_purpose_model: AllPurposeClusterCostModel::new(),
        }
    }

    pub fn rates(&self) -> &BillingRates {
        &self.rates
    }

    pub fn dbu_convention(&self) -> JobDbuConvention {
        self.job_model.dbu_convention
    }

    /// Price `workload` on the job cluster and on the all-purpose cluster.
    ///
    /// Either both breakdowns are produced or an error is returned.
    pub fn estimate(
        &self,
        job_config: &ClusterConfig<'_>,
        all_purpose_config: &ClusterConfig<'_>,
        workload: &WorkloadSpec,
    ) -> Result<Estimate> {
        let job = self.job_model.compute(job_config, workload, &self.rates)?;
        let all_purpose = self.all_purpose_model.compute(all_purpose_config, workload, &self.rates)?;
        let verdict = compare(&job, &all_purpose);

        debug!(
            "Estimate for {} tasks: {} cheaper by {:.4} ({:.2}%)",
            workload.task_count(),
            verdict.cheaper,
            verdict.savings_absolute,
            verdict.savings_percent
        );

        Ok(Estimate { job, all_purpose, verdict })
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(BillingRates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use cluster_cost_core::ClusterKind;

    #[test]
    fn test_estimate_reference_scenario() {
        let vm = catalog::resolve("D4A_V4").unwrap();
        let config = ClusterConfig::new(vm, vm, 1, 35, 2.5).unwrap();
        let workload = WorkloadSpec::new(100, 10.0).unwrap();

        let estimate = Estimator::default().estimate(&config, &config, &workload).unwrap();

        assert_eq!(estimate.job.wave_count, 3);
        assert_eq!(estimate.all_purpose.wave_count, 3);
        assert!((estimate.job.total_cost - 0.347875).abs() < 1e-9);
        // 32.5 min at 1.2334/h is about 0.668, so the job cluster wins
        assert_eq!(estimate.verdict.cheaper, ClusterKind::Job);
        assert_eq!(estimate.verdict.faster, ClusterKind::AllPurpose);
        assert!((estimate.verdict.time_saved_min - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_verdict_matches_argmin() {
        let vm = catalog::resolve("DS4_V2").unwrap();
        let workload = WorkloadSpec::new(40, 3.0).unwrap();
        let estimator = Estimator::default();

        for workers in 1..=10 {
            let job_config = ClusterConfig::new(vm, vm, 1, workers, 2.5).unwrap();
            let ap_config = ClusterConfig::new(vm, vm, workers, workers, 2.5).unwrap();
            let estimate = estimator.estimate(&job_config, &ap_config, &workload).unwrap();

            let expected = if estimate.job.total_cost < estimate.all_purpose.total_cost {
                ClusterKind::Job
            } else {
                ClusterKind::AllPurpose
            };
            assert_eq!(estimate.verdict.cheaper, expected, "workers={workers}");
        }
    }

    #[test]
    fn test_estimator_keeps_convention() {
        let estimator = Estimator::with_convention(BillingRates::default(), JobDbuConvention::PerWave);
        assert_eq!(estimator.dbu_convention(), JobDbuConvention::PerWave);
        assert_eq!(Estimator::default().dbu_convention(), JobDbuConvention::ExecutionOnly);
    }
}
