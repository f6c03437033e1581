//! Tabular inputs shared by every engine, feature tables and survival labels.

pub mod dataset;
pub mod labels;

pub use dataset::Dataset;
pub use labels::{SurvivalLabel, SurvivalLabels};

use crate::error::{ExplainError, Result};

/// Check that evaluation times are non-empty, finite and strictly increasing.
pub fn validate_eval_times(times: &[f64]) -> Result<()> {
    if times.is_empty() {
        return Err(ExplainError::invalid_input(
            "evaluation times must not be empty",
        ));
    }
    if let Some(bad) = times.iter().find(|t| !t.is_finite()) {
        return Err(ExplainError::invalid_input(format!(
            "evaluation time {bad} is not finite"
        )));
    }
    if let Some(w) = times.windows(2).find(|w| w[1] <= w[0]) {
        return Err(ExplainError::invalid_input(format!(
            "evaluation times must be strictly increasing ({} then {})",
            w[0], w[1]
        )));
    }
    Ok(())
}
