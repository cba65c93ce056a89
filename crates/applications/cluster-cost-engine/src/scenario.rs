//! Scenario: one workload priced on a job cluster and an all-purpose cluster
//! built from catalog instances.
//!
//! A scenario is the serializable form of a caller's input. Instance names
//! are resolved through the catalog and every number goes through the
//! validating constructors of the core types before anything is priced.

use serde::{Deserialize, Serialize};

use cluster_cost_core::{
    BillingRates, ClusterConfig, CostError, Result, VmInstance, WorkloadSpec, ensure_positive_count,
};

use crate::catalog;
use crate::estimate::{Estimate, Estimator};
use crate::models::JobDbuConvention;

/// Minutes a cluster spends spinning up before it can run tasks
pub const DEFAULT_STARTUP_OVERHEAD_MIN: f64 = 2.5;
pub const DEFAULT_ALL_PURPOSE_WORKERS: u32 = 5;
pub const DEFAULT_JOB_WORKERS: u32 = 1;
pub const DEFAULT_TASKS_PER_WORKER: u32 = 1;

fn default_all_purpose_workers() -> u32 {
    DEFAULT_ALL_PURPOSE_WORKERS
}

fn default_job_workers() -> u32 {
    DEFAULT_JOB_WORKERS
}

fn default_tasks_per_worker() -> u32 {
    DEFAULT_TASKS_PER_WORKER
}

fn default_startup_overhead_min() -> f64 {
    DEFAULT_STARTUP_OVERHEAD_MIN
}

fn default_dbu_rate_job() -> f64 {
    BillingRates::DEFAULT_DBU_RATE_JOB
}

fn default_dbu_rate_all_purpose() -> f64 {
    BillingRates::DEFAULT_DBU_RATE_ALL_PURPOSE
}

/// Caller input for one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Catalog name used for every worker (and the driver, unless overridden)
    pub instance: String,

    /// Catalog name of the driver, if different from the workers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_instance: Option<String>,

    pub task_count: u32,
    pub exec_time_per_task_min: f64,

    #[serde(default = "default_job_workers")]
    pub job_workers: u32,

    #[serde(default = "default_all_purpose_workers")]
    pub all_purpose_workers: u32,

    #[serde(default = "default_tasks_per_worker")]
    pub tasks_per_worker: u32,

    /// Overrides `job_workers * tasks_per_worker`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_max_parallel_tasks: Option<u32>,

    /// Overrides `all_purpose_workers * tasks_per_worker`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_purpose_max_parallel_tasks: Option<u32>,

    #[serde(default = "default_startup_overhead_min")]
    pub startup_overhead_min: f64,

    #[serde(default = "default_dbu_rate_job")]
    pub dbu_rate_job: f64,

    #[serde(default = "default_dbu_rate_all_purpose")]
    pub dbu_rate_all_purpose: f64,

    #[serde(default)]
    pub dbu_convention: JobDbuConvention,
}

impl Scenario {
    /// Scenario with every optional setting at its default
    pub fn new(instance: impl Into<String>, task_count: u32, exec_time_per_task_min: f64) -> Self {
        Scenario {
            instance: instance.into(),
            driver_instance: None,
            task_count,
            exec_time_per_task_min,
            job_workers: DEFAULT_JOB_WORKERS,
            all_purpose_workers: DEFAULT_ALL_PURPOSE_WORKERS,
            tasks_per_worker: DEFAULT_TASKS_PER_WORKER,
            job_max_parallel_tasks: None,
            all_purpose_max_parallel_tasks: None,
            startup_overhead_min: DEFAULT_STARTUP_OVERHEAD_MIN,
            dbu_rate_job: BillingRates::DEFAULT_DBU_RATE_JOB,
            dbu_rate_all_purpose: BillingRates::DEFAULT_DBU_RATE_ALL_PURPOSE,
            dbu_convention: JobDbuConvention::default(),
        }
    }

    /// Same scenario with a different number of tasks
    pub fn with_task_count(&self, task_count: u32) -> Self {
        Scenario {
            task_count,
            ..self.clone()
        }
    }

    /// Resolve (driver, worker) through the catalog
    pub fn instances(&self) -> Result<(&'static VmInstance, &'static VmInstance)> {
        let worker = catalog::resolve(&self.instance)?;
        let driver = match &self.driver_instance {
            Some(name) => catalog::resolve(name)?,
            None => worker,
        };
        Ok((driver, worker))
    }

    pub fn job_parallelism(&self) -> Result<u32> {
        match self.job_max_parallel_tasks {
            Some(limit) => Ok(limit),
            None => self.parallelism("job_workers", self.job_workers),
        }
    }

    pub fn all_purpose_parallelism(&self) -> Result<u32> {
        match self.all_purpose_max_parallel_tasks {
            Some(limit) => Ok(limit),
            None => self.parallelism("all_purpose_workers", self.all_purpose_workers),
        }
    }

    fn parallelism(&self, name: &'static str, workers: u32) -> Result<u32> {
        let workers = ensure_positive_count(name, workers)?;
        let per_worker = ensure_positive_count("tasks_per_worker", self.tasks_per_worker)?;
        workers
            .checked_mul(per_worker)
            .ok_or_else(|| CostError::invalid("tasks_per_worker", "parallelism overflows u32"))
    }

    pub fn rates(&self) -> Result<BillingRates> {
        BillingRates::new(self.dbu_rate_job, self.dbu_rate_all_purpose)
    }

    pub fn workload(&self) -> Result<WorkloadSpec> {
        WorkloadSpec::new(self.task_count, self.exec_time_per_task_min)
    }

    /// Validated configuration of the ephemeral cluster
    pub fn job_config(&self) -> Result<ClusterConfig<'static>> {
        let (driver, worker) = self.instances()?;
        ClusterConfig::new(
            driver,
            worker,
            self.job_workers,
            self.job_parallelism()?,
            self.startup_overhead_min,
        )
    }

    /// Validated configuration of the persistent cluster
    pub fn all_purpose_config(&self) -> Result<ClusterConfig<'static>> {
        let (driver, worker) = self.instances()?;
        ClusterConfig::new(
            driver,
            worker,
            self.all_purpose_workers,
            self.all_purpose_parallelism()?,
            self.startup_overhead_min,
        )
    }

    pub fn estimator(&self) -> Result<Estimator> {
        Ok(Estimator::with_convention(self.rates()?, self.dbu_convention))
    }

    /// Validate everything, then price both clusters
    pub fn estimate(&self) -> Result<Estimate> {
        let job_config = self.job_config()?;
        let all_purpose_config = self.all_purpose_config()?;
        let workload = self.workload()?;
        self.estimator()?.estimate(&job_config, &all_purpose_config, &workload)
    }
}
