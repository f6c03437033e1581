//! Performance evaluator: time-dependent loss of an explainer's model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::{Dataset, SurvivalLabels, validate_eval_times};
use crate::error::{ExplainError, Result};
use crate::explainer::Explainer;
use crate::prediction::{OutputType, predict_matrix};
use crate::stats::KaplanMeier;

/// Supported time-dependent metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// IPCW Brier score (Graf et al., 1999). Lower is better.
    #[default]
    BrierScore,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrierScore => "brier_score",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "brier_score" => Ok(Self::BrierScore),
            other => Err(ExplainError::unsupported_option("metric", other)),
        }
    }
}

/// Loss value at one evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub time: f64,
    pub perf: f64,
}

/// Evaluate `metric` for the explainer's model on `features` against `labels`.
pub fn evaluate(
    explainer: &dyn Explainer,
    features: &Dataset,
    labels: &SurvivalLabels,
    times: &[f64],
    metric: Metric,
) -> Result<Vec<PerformanceRecord>> {
    validate_eval_times(times)?;
    if features.n_rows() != labels.len() {
        return Err(ExplainError::invalid_input(format!(
            "{} feature rows but {} labels",
            features.n_rows(),
            labels.len()
        )));
    }
    if labels.is_empty() {
        return Err(ExplainError::invalid_input("cannot evaluate on zero rows"));
    }

    match metric {
        Metric::BrierScore => brier_score(explainer, features, labels, times),
    }
}

fn brier_score(
    explainer: &dyn Explainer,
    features: &Dataset,
    labels: &SurvivalLabels,
    times: &[f64],
) -> Result<Vec<PerformanceRecord>> {
    let surv = predict_matrix(explainer, features, times, OutputType::Survival)?;

    // Censoring distribution: censoring is the "event" here.
    let censored: Vec<bool> = labels.iter().map(|l| !l.event).collect();
    let censoring = KaplanMeier::fit(&labels.times(), &censored)?;

    let n = labels.len() as f64;
    let records = times
        .iter()
        .enumerate()
        .map(|(k, &t)| {
            let g_t = censoring.survival_at(t);
            let total: f64 = labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let s = surv[[i, k]];
                    if label.time <= t && label.event {
                        let g = censoring.survival_before(label.time);
                        if g > 0.0 { s * s / g } else { 0.0 }
                    } else if label.time > t {
                        if g_t > 0.0 { (1.0 - s).powi(2) / g_t } else { 0.0 }
                    } else {
                        0.0
                    }
                })
                .sum();
            PerformanceRecord {
                time: t,
                perf: total / n,
            }
        })
        .collect();
    Ok(records)
}
