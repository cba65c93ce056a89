//! Error types for cost estimation

use thiserror::Error;

/// Result type for estimation operations
pub type Result<T> = std::result::Result<T, CostError>;

/// Core error type for cost estimation.
///
/// Every variant is a deterministic function of the caller's input: the
/// same arguments always produce the same error. Nothing here is transient,
/// so callers should never retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    /// The requested instance name is not in the catalog
    #[error("Unknown instance: {0}")]
    UnknownInstance(String),

    /// A numeric input is outside its documented domain
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl CostError {
    /// Create an unknown-instance error
    pub fn unknown_instance(name: impl Into<String>) -> Self {
        Self::UnknownInstance(name.into())
    }

    /// Create an invalid-parameter error
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Reject zero counts.
pub fn ensure_positive_count(name: &'static str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(CostError::invalid(name, "must be at least 1"));
    }
    Ok(value)
}

/// Reject NaN, infinities and values `<= 0`.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(CostError::invalid(name, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(CostError::invalid(name, format!("must be > 0, got {value}")));
    }
    Ok(value)
}

/// Reject NaN, infinities and negative values. Zero is allowed.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(CostError::invalid(name, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(CostError::invalid(name, format!("must be >= 0, got {value}")));
    }
    Ok(value)
}
