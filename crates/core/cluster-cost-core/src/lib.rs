//! Cluster Cost Core - Shared types and errors
//!
//! This crate defines the value objects exchanged with the estimation engine:
//! - Catalog machine specs (`VmInstance`)
//! - Validated inputs (`ClusterConfig`, `WorkloadSpec`, `BillingRates`)
//! - Outputs (`CostBreakdown`, `Verdict`)
//! - Error types
//!
//! Inputs are validated by their constructors, so anything the engine
//! receives is already inside its documented domain.

pub mod types;
pub mod error;

pub use types::*;
pub use error::*;
