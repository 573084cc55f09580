use thiserror::Error;

/// The sum a probability table must reach before it may be sampled from.
pub const MIN_TABLE_TOTAL: f64 = 0.9999;

/// Error type for constructing and advancing a ratchet simulation.
///
/// Every variant is fatal for the current run: parameters are checked once at
/// construction and numerical failures indicate a broken model state rather
/// than a transient condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A model or execution parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The population reached a state that cannot be advanced, such as a
    /// mean fitness of exactly zero.
    #[error("Degenerate population state: {0}")]
    DegenerateState(String),

    /// A probability table did not sum to (approximately) one.
    #[error(
        "Multinomial sampling failed: probabilities sum to {total} (expected at least {min})",
        min = MIN_TABLE_TOTAL
    )]
    SamplingIntegrity {
        /// Accumulated probability of the whole table
        total: f64,
    },
}

impl SimulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimulationError::invalid("selection must be in [0, 1], got 1.5");
        assert_eq!(
            err.to_string(),
            "Invalid parameter: selection must be in [0, 1], got 1.5"
        );

        let err = SimulationError::SamplingIntegrity { total: 0.5 };
        assert!(err.to_string().contains("0.5"));
        assert!(err.to_string().contains("0.9999"));
    }
}
