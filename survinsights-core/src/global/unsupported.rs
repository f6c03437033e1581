//! Entry points for global explanations that are not available yet.

use crate::error::{ExplainError, Result};
use crate::explainer::Explainer;

/// Feature interaction strength. Always fails with
/// [`ExplainError::UnsupportedCapability`].
pub fn feature_interaction(explainer: &dyn Explainer) -> Result<()> {
    Err(ExplainError::unsupported_capability(format!(
        "feature interaction is not supported yet (model {})",
        explainer.label()
    )))
}

/// Functional decomposition. Always fails with
/// [`ExplainError::UnsupportedCapability`].
pub fn functional_decomposition(explainer: &dyn Explainer) -> Result<()> {
    Err(ExplainError::unsupported_capability(format!(
        "functional decomposition is not supported yet (model {})",
        explainer.label()
    )))
}
