//! The explainer capability consumed by every engine.
//!
//! An explainer bundles a fitted survival model with the reference data it
//! is explained against. The engines only ever read from it.

use ndarray::Array2;

use crate::data::{Dataset, SurvivalLabels};
use crate::error::{ExplainError, Result};

/// Survival probabilities are clamped to this floor before taking logs.
pub const MIN_SURVIVAL: f64 = 1e-12;

/// A fitted model able to predict time-indexed survival quantities.
pub trait SurvivalModel {
    /// Survival probabilities `S(t | x)`, shape `(data.n_rows(), times.len())`.
    fn predict_survival(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>>;

    /// Cumulative hazard `Λ(t | x)`. Defaults to `-ln S(t | x)`.
    fn predict_cumulative_hazard(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>> {
        let surv = self.predict_survival(data, times)?;
        Ok(surv.mapv(|s| -s.max(MIN_SURVIVAL).ln()))
    }
}

/// Read-only view of a model together with its reference data.
pub trait Explainer {
    /// Display name of the explained model.
    fn label(&self) -> &str;

    fn dataset(&self) -> &Dataset;

    fn labels(&self) -> &SurvivalLabels;

    fn predict_survival(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>>;

    fn predict_cumulative_hazard(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>>;
}

/// Standard [`Explainer`] over any [`SurvivalModel`].
#[derive(Debug, Clone)]
pub struct ModelExplainer<M> {
    model: M,
    data: Dataset,
    labels: SurvivalLabels,
    label: String,
}

impl<M: SurvivalModel> ModelExplainer<M> {
    pub fn new(
        model: M,
        data: Dataset,
        labels: SurvivalLabels,
        label: impl Into<String>,
    ) -> Result<Self> {
        if data.n_rows() != labels.len() {
            return Err(ExplainError::dataset(format!(
                "{} data rows but {} labels",
                data.n_rows(),
                labels.len()
            )));
        }
        Ok(Self {
            model,
            data,
            labels,
            label: label.into(),
        })
    }
}

impl<M: SurvivalModel> Explainer for ModelExplainer<M> {
    fn label(&self) -> &str {
        &self.label
    }

    fn dataset(&self) -> &Dataset {
        &self.data
    }

    fn labels(&self) -> &SurvivalLabels {
        &self.labels
    }

    fn predict_survival(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>> {
        self.model.predict_survival(data, times)
    }

    fn predict_cumulative_hazard(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>> {
        self.model.predict_cumulative_hazard(data, times)
    }
}
