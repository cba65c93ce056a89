//! Cluster Cost Engine
//!
//! Estimates the cost and active time of a batch workload on an ephemeral
//! job cluster and on a persistent all-purpose cluster, then reports which
//! billing model is cheaper.
//!
//! Flow:
//!
//! ```text
//! Scenario ── catalog ──► ClusterConfig ×2 + WorkloadSpec
//!                              │
//!                        waves (ceil(t / p))
//!                              │
//!            JobClusterCostModel   AllPurposeClusterCostModel
//!                              │
//!                        comparison ──► Verdict
//! ```
//!
//! Everything here is pure and synchronous. The only shared state is the
//! read-only [`catalog::CATALOG`].

pub mod catalog;
pub mod waves;
pub mod models;
pub mod comparison;
pub mod estimate;
pub mod scenario;
pub mod sweep;

pub use cluster_cost_core::*;

pub use comparison::compare;
pub use estimate::{Estimate, Estimator};
pub use models::{AllPurposeClusterCostModel, CostModel, JobClusterCostModel, JobDbuConvention};
pub use scenario::Scenario;
pub use sweep::{MAX_SWEEP_POINTS, SweepPoint, sweep_task_counts, task_count_range};
pub use waves::wave_count;
