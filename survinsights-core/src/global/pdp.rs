//! Partial dependence (PDP): ICE curves averaged over observations.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use crate::error::Result;
use crate::explainer::Explainer;
use crate::global::grouping::GroupedMean;
use crate::local::ice::{IceOptions, individual_conditional_expectation};
use crate::prediction::OutputType;

/// Parameters of a PDP computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdpOptions {
    pub n_sel_samples: usize,
    pub n_grid_points: usize,
    pub output_type: OutputType,
    /// Evaluation times; the explainer's unique observed times when `None`.
    pub eval_times: Option<Vec<f64>>,
    pub seed: u64,
}

impl Default for PdpOptions {
    fn default() -> Self {
        let ice = IceOptions::default();
        Self {
            n_sel_samples: ice.n_sel_samples,
            n_grid_points: ice.n_grid_points,
            output_type: ice.output_type,
            eval_times: ice.eval_times,
            seed: ice.seed,
        }
    }
}

impl From<&PdpOptions> for IceOptions {
    fn from(opts: &PdpOptions) -> Self {
        Self {
            n_sel_samples: opts.n_sel_samples,
            n_grid_points: opts.n_grid_points,
            output_type: opts.output_type,
            eval_times: opts.eval_times.clone(),
            seed: opts.seed,
        }
    }
}

/// Mean prediction at one grid value and time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdpRow {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "times")]
    pub time: f64,
    pub pred: f64,
}

/// PDP result, ordered by grid value then time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdpTable {
    pub feature: String,
    pub output_type: OutputType,
    pub rows: Vec<PdpRow>,
}

impl PdpTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct evaluation times, ascending.
    pub fn times(&self) -> Vec<f64> {
        distinct_sorted(self.rows.iter().map(|r| r.time))
    }

    /// Distinct grid values, ascending.
    pub fn grid(&self) -> Vec<f64> {
        distinct_sorted(self.rows.iter().map(|r| r.x))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub(crate) fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

/// Partial dependence of the explainer's predictions on `selected_feature`.
#[tracing::instrument(skip(explainer, options), fields(model = explainer.label()))]
pub fn compute_pdp(
    explainer: &dyn Explainer,
    selected_feature: &str,
    options: &PdpOptions,
) -> Result<PdpTable> {
    let started = Instant::now();
    let ice = individual_conditional_expectation(explainer, selected_feature, &options.into())?;

    let mut groups = GroupedMean::new();
    for rec in &ice.records {
        groups.add((rec.grid_index, rec.time_index), rec.pred);
    }
    let rows: Vec<PdpRow> = groups
        .finish()
        .into_iter()
        .map(|((g, k), pred, _)| PdpRow {
            x: ice.grid[g],
            time: ice.times[k],
            pred,
        })
        .collect();

    info!(
        feature = selected_feature,
        rows = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "PDP computed"
    );
    Ok(PdpTable {
        feature: selected_feature.to_string(),
        output_type: options.output_type,
        rows,
    })
}
