//! Right-censored survival outcomes.

use serde::{Deserialize, Serialize};

use crate::error::{ExplainError, Result};

/// Observed time and event indicator for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalLabel {
    /// Event time if `event`, otherwise censoring time.
    pub time: f64,
    pub event: bool,
}

/// Per-row survival outcomes aligned with a [`Dataset`](super::Dataset).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurvivalLabels {
    labels: Vec<SurvivalLabel>,
}

impl SurvivalLabels {
    pub fn new(times: Vec<f64>, events: Vec<bool>) -> Result<Self> {
        if times.len() != events.len() {
            return Err(ExplainError::dataset(format!(
                "{} times but {} event indicators",
                times.len(),
                events.len()
            )));
        }
        if let Some(bad) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(ExplainError::dataset(format!(
                "observed time {bad} must be finite and non-negative"
            )));
        }
        Ok(Self {
            labels: times
                .into_iter()
                .zip(events)
                .map(|(time, event)| SurvivalLabel { time, event })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurvivalLabel> {
        self.labels.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.labels.iter().map(|l| l.time).collect()
    }

    /// Sorted distinct observed times, censored or not.
    pub fn unique_times(&self) -> Vec<f64> {
        let mut times = self.times();
        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }
}
