//! Prediction adapter: flattens model output into `(row, time, pred)` records.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::Dataset;
use crate::error::{ExplainError, Result};
use crate::explainer::Explainer;

/// Which time-indexed quantity to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    /// Survival probability `S(t)`.
    #[default]
    Survival,
    /// Cumulative failure probability `1 - S(t)`.
    Risk,
    /// Cumulative hazard `Λ(t)`.
    Chf,
}

impl OutputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Survival => "survival",
            Self::Risk => "risk",
            Self::Chf => "chf",
        }
    }

    /// Whether predictions of this type are probabilities in `[0, 1]`.
    pub fn is_probability(&self) -> bool {
        !matches!(self, Self::Chf)
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "survival" => Ok(Self::Survival),
            "risk" => Ok(Self::Risk),
            "chf" => Ok(Self::Chf),
            other => Err(ExplainError::unsupported_option("output type", other)),
        }
    }
}

/// One predicted value for one row at one time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub row: usize,
    pub time: f64,
    pub pred: f64,
}

/// Rows × times prediction matrix for `data`.
pub fn predict_matrix(
    explainer: &dyn Explainer,
    data: &Dataset,
    times: &[f64],
    output_type: OutputType,
) -> Result<Array2<f64>> {
    let matrix = match output_type {
        OutputType::Survival => explainer.predict_survival(data, times)?,
        OutputType::Risk => explainer.predict_survival(data, times)?.mapv(|s| 1.0 - s),
        OutputType::Chf => explainer.predict_cumulative_hazard(data, times)?,
    };
    let expected = (data.n_rows(), times.len());
    if matrix.dim() != expected {
        return Err(ExplainError::model(format!(
            "model {} returned {:?} predictions, expected {:?}",
            explainer.label(),
            matrix.dim(),
            expected
        )));
    }
    Ok(matrix)
}

/// Predict `output_type` for every row of `data` at `times`.
///
/// Records are emitted row-major: all times of row 0, then row 1, and so on.
pub fn predict(
    explainer: &dyn Explainer,
    data: &Dataset,
    times: &[f64],
    output_type: OutputType,
) -> Result<Vec<PredictionRecord>> {
    let matrix = predict_matrix(explainer, data, times, output_type)?;
    Ok(matrix
        .indexed_iter()
        .map(|((row, k), &pred)| PredictionRecord {
            row,
            time: times[k],
            pred,
        })
        .collect())
}
