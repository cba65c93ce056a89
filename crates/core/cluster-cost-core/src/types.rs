//! Core types shared across the estimation engine and its callers

use serde::{Deserialize, Serialize};

use crate::error::{CostError, Result, ensure_non_negative, ensure_positive, ensure_positive_count};

/// Billing model of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterKind {
    /// Ephemeral cluster provisioned per batch
    Job,
    /// Persistent, always-on cluster
    AllPurpose,
}

impl std::fmt::Display for ClusterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterKind::Job => write!(f, "job"),
            ClusterKind::AllPurpose => write!(f, "all-purpose"),
        }
    }
}

/// Machine specification from the instance catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmInstance {
    pub name: &'static str,
    pub vcpus: u32,
    /// Billing units consumed per hour
    pub dbus: f64,
    /// Raw machine price, currency per hour
    pub cost_per_hour: f64,
    pub ram_gb: f64,
}

/// Shape of one cluster: driver and worker machines plus scheduling limits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterConfig<'a> {
    driver: &'a VmInstance,
    worker: &'a VmInstance,
    worker_count: u32,
    max_parallel_tasks: u32,
    startup_overhead_min: f64,
}

impl<'a> ClusterConfig<'a> {
    pub fn new(
        driver: &'a VmInstance,
        worker: &'a VmInstance,
        worker_count: u32,
        max_parallel_tasks: u32,
        startup_overhead_min: f64,
    ) -> Result<Self> {
        let worker_count = ensure_positive_count("worker_count", worker_count)?;

        // Node and vCPU totals must stay representable
        let fits = worker_count.checked_add(1).is_some()
            && worker_count
                .checked_mul(worker.vcpus)
                .and_then(|vcpus| vcpus.checked_add(driver.vcpus))
                .is_some();
        if !fits {
            return Err(CostError::invalid(
                "worker_count",
                format!("{worker_count} workers overflow the cluster totals"),
            ));
        }

        Ok(ClusterConfig {
            driver,
            worker,
            worker_count,
            max_parallel_tasks: ensure_positive_count("max_parallel_tasks", max_parallel_tasks)?,
            startup_overhead_min: ensure_non_negative("startup_overhead_min", startup_overhead_min)?,
        })
    }

    pub fn driver(&self) -> &'a VmInstance {
        self.driver
    }

    pub fn worker(&self) -> &'a VmInstance {
        self.worker
    }

    pub fn worker_count(&self) -> u32 {
        self.worker_count
    }

    /// Capacity of one wave
    pub fn max_parallel_tasks(&self) -> u32 {
        self.max_parallel_tasks
    }

    pub fn startup_overhead_min(&self) -> f64 {
        self.startup_overhead_min
    }

    /// Driver plus workers
    pub fn node_count(&self) -> u32 {
        1 + self.worker_count
    }

    pub fn total_vcpus(&self) -> u32 {
        self.driver.vcpus + self.worker_count * self.worker.vcpus
    }

    pub fn total_ram_gb(&self) -> f64 {
        self.driver.ram_gb + f64::from(self.worker_count) * self.worker.ram_gb
    }

    /// Billing units consumed per hour by the whole cluster
    pub fn total_dbus(&self) -> f64 {
        self.driver.dbus + f64::from(self.worker_count) * self.worker.dbus
    }

    /// Raw machine price of the whole cluster, currency per hour
    pub fn vm_cost_per_hour(&self) -> f64 {
        self.driver.cost_per_hour + f64::from(self.worker_count) * self.worker.cost_per_hour
    }
}

/// The batch to run: how many tasks and how long each takes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkloadSpec {
    task_count: u32,
    exec_time_per_task_min: f64,
}

impl WorkloadSpec {
    pub fn new(task_count: u32, exec_time_per_task_min: f64) -> Result<Self> {
        Ok(WorkloadSpec {
            task_count: ensure_positive_count("task_count", task_count)?,
            exec_time_per_task_min: ensure_positive("exec_time_per_task_min", exec_time_per_task_min)?,
        })
    }

    pub fn task_count(&self) -> u32 {
        self.task_count
    }

    pub fn exec_time_per_task_min(&self) -> f64 {
        self.exec_time_per_task_min
    }
}

/// DBU prices, currency per DBU-hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BillingRates {
    dbu_rate_job: f64,
    dbu_rate_all_purpose: f64,
}

impl BillingRates {
    pub const DEFAULT_DBU_RATE_JOB: f64 = 0.288;
    pub const DEFAULT_DBU_RATE_ALL_PURPOSE: f64 = 0.528;

    pub fn new(dbu_rate_job: f64, dbu_rate_all_purpose: f64) -> Result<Self> {
        Ok(BillingRates {
            dbu_rate_job: ensure_positive("dbu_rate_job", dbu_rate_job)?,
            dbu_rate_all_purpose: ensure_positive("dbu_rate_all_purpose", dbu_rate_all_purpose)?,
        })
    }

    pub fn dbu_rate_job(&self) -> f64 {
        self.dbu_rate_job
    }

    pub fn dbu_rate_all_purpose(&self) -> f64 {
        self.dbu_rate_all_purpose
    }

    /// Ephemeral clusters are normally billed at a discount
    pub fn job_is_discounted(&self) -> bool {
        self.dbu_rate_job < self.dbu_rate_all_purpose
    }
}

impl Default for BillingRates {
    fn default() -> Self {
        BillingRates {
            dbu_rate_job: Self::DEFAULT_DBU_RATE_JOB,
            dbu_rate_all_purpose: Self::DEFAULT_DBU_RATE_ALL_PURPOSE,
        }
    }
}

/// Per-hour price of a running persistent cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyCost {
    pub vm_cost_per_hour: f64,
    pub dbu_cost_per_hour: f64,
    pub total_cost_per_hour: f64,
}

/// Cost and time of running a workload on one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub kind: ClusterKind,
    pub wave_count: u32,
    pub active_time_min: f64,
    pub vm_cost: f64,
    pub dbu_cost: f64,
    /// Always `vm_cost + dbu_cost`
    pub total_cost: f64,
    /// Job model only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cost_per_task: Option<f64>,
    /// All-purpose model only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hourly: Option<HourlyCost>,
}

/// Outcome of comparing the two billing models
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub cheaper: ClusterKind,
    pub savings_absolute: f64,
    /// Savings relative to the more expensive option, in percent
    pub savings_percent: f64,
    pub faster: ClusterKind,
    pub time_saved_min: f64,
}
