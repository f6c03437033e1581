//! Accumulated local effects (ALE).
//!
//! The feature is cut into decile bins. Every observation is moved to the
//! lower and to the upper edge of its bin, and the difference between the two
//! predictions is its local effect. Local effects are averaged per bin and
//! time. Summing them across bins into the accumulated curve is left to the
//! consumer (see [`crate::render::accumulate_ale`]).

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{ExplainError, Result};
use crate::explainer::Explainer;
use crate::global::grouping::GroupedMean;
use crate::global::pdp::distinct_sorted;
use crate::prediction::{OutputType, predict_matrix};
use crate::stats::quantiles;

/// Number of quantile bins; breakpoints sit at levels `0.0, 0.1, ..., 1.0`.
pub const N_BINS: usize = 10;

/// Parameters of an ALE computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AleOptions {
    /// First index into the sorted unique observed times.
    pub time_offset: usize,
    /// Step between selected unique observed times.
    pub time_stride: usize,
}

impl Default for AleOptions {
    fn default() -> Self {
        Self {
            time_offset: 10,
            time_stride: 100,
        }
    }
}

impl AleOptions {
    /// Evaluation times drawn from sorted unique observed times.
    pub fn select_times(&self, unique_times: &[f64]) -> Result<Vec<f64>> {
        if self.time_stride == 0 {
            return Err(ExplainError::invalid_input("time_stride must be positive"));
        }
        let times: Vec<f64> = unique_times
            .iter()
            .skip(self.time_offset)
            .step_by(self.time_stride)
            .copied()
            .collect();
        if times.is_empty() {
            return Err(ExplainError::invalid_input(format!(
                "only {} unique observed times; at least {} needed for ALE evaluation times",
                unique_times.len(),
                self.time_offset + 1
            )));
        }
        Ok(times)
    }
}

/// Assignment of observations to quantile bins.
#[derive(Debug, Clone, PartialEq)]
pub struct AleBinning {
    /// `N_BINS + 1` breakpoints, non-decreasing.
    pub breakpoints: Vec<f64>,
    /// Bin of every observation, in `0..N_BINS`.
    pub bins: Vec<usize>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl AleBinning {
    /// Bin each value by its nearest breakpoint, capped at the last bin.
    pub fn quantile_bins(values: &[f64]) -> Result<Self> {
        let levels: Vec<f64> = (0..=N_BINS).map(|i| i as f64 / N_BINS as f64).collect();
        let breakpoints = quantiles(values, &levels)?;

        let bins: Vec<usize> = values
            .iter()
            .map(|&v| nearest_index(&breakpoints, v).min(N_BINS - 1))
            .collect();
        let lower = bins.iter().map(|&b| breakpoints[b]).collect();
        let upper = bins.iter().map(|&b| breakpoints[b + 1]).collect();
        Ok(Self {
            breakpoints,
            bins,
            lower,
            upper,
        })
    }
}

/// Index of the breakpoint closest to `v`; the first one on ties.
fn nearest_index(breakpoints: &[f64], v: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, bp) in breakpoints.iter().enumerate() {
        let dist = (bp - v).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Mean local effect of one bin at one time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AleRow {
    #[serde(rename = "groups")]
    pub group: usize,
    #[serde(rename = "times")]
    pub time: f64,
    pub pred: f64,
    /// Lower breakpoint of the bin.
    pub group_value: f64,
}

/// ALE result, ordered by bin then time. Values are per-bin local effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AleTable {
    pub feature: String,
    pub output_type: OutputType,
    pub breakpoints: Vec<f64>,
    pub rows: Vec<AleRow>,
}

impl AleTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        distinct_sorted(self.rows.iter().map(|r| r.time))
    }

    /// Distinct bin indices present, ascending.
    pub fn groups(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.rows.iter().map(|r| r.group).collect();
        out.dedup();
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// ALE of `selected_feature` with the default evaluation-time subsampling.
pub fn compute_ale(
    explainer: &dyn Explainer,
    selected_feature: &str,
    output_type: OutputType,
) -> Result<AleTable> {
    compute_ale_with(
        explainer,
        selected_feature,
        output_type,
        &AleOptions::default(),
    )
}

/// ALE of `selected_feature`.
#[tracing::instrument(skip(explainer, options), fields(model = explainer.label()))]
pub fn compute_ale_with(
    explainer: &dyn Explainer,
    selected_feature: &str,
    output_type: OutputType,
    options: &AleOptions,
) -> Result<AleTable> {
    let started = Instant::now();
    if !matches!(output_type, OutputType::Survival | OutputType::Chf) {
        return Err(ExplainError::unsupported_option(
            "ALE output type",
            output_type.as_str(),
        ));
    }

    let data = explainer.dataset().sorted_by(selected_feature)?;
    if data.n_rows() == 0 {
        return Err(ExplainError::invalid_input("explainer dataset has no rows"));
    }
    let values = data.column(selected_feature)?.to_vec();
    let binning = AleBinning::quantile_bins(&values)?;
    debug!(breakpoints = ?binning.breakpoints, "quantile breakpoints");

    let data_lower = data.with_column(selected_feature, &binning.lower)?;
    let data_upper = data.with_column(selected_feature, &binning.upper)?;

    let times = options.select_times(&explainer.labels().unique_times())?;
    let lower_pred = predict_matrix(explainer, &data_lower, &times, output_type)?;
    let upper_pred = predict_matrix(explainer, &data_upper, &times, output_type)?;
    let diff = upper_pred - lower_pred;

    let mut groups = GroupedMean::new();
    for ((row, k), &effect) in diff.indexed_iter() {
        groups.add((binning.bins[row], k), effect);
    }
    let rows: Vec<AleRow> = groups
        .finish()
        .into_iter()
        .map(|((group, k), pred, _)| AleRow {
            group,
            time: times[k],
            pred,
            group_value: binning.breakpoints[group],
        })
        .collect();

    let n_groups = rows.len() / times.len();
    if n_groups < N_BINS {
        warn!(
            feature = selected_feature,
            n_groups, "some quantile bins hold no observations"
        );
    }
    info!(
        feature = selected_feature,
        rows = rows.len(),
        n_times = times.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ALE computed"
    );
    Ok(AleTable {
        feature: selected_feature.to_string(),
        output_type,
        breakpoints: binning.breakpoints,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::uniform_explainer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_times_offset_and_stride() {
        let unique: Vec<f64> = (0..250).map(|i| i as f64).collect();
        let times = AleOptions::default().select_times(&unique).unwrap();
        assert_eq!(times, vec![10.0, 110.0, 210.0]);
        assert!(AleOptions::default().select_times(&unique[..10]).is_err());
    }

    #[test]
    fn test_bins_of_uniform_grid() {
        let values: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let binning = AleBinning::quantile_bins(&values).unwrap();
        assert_eq!(binning.breakpoints.len(), N_BINS + 1);
        assert_eq!(binning.bins[0], 0);
        assert_eq!(binning.bins[4], 0);
        // 6 is nearer to 10 than to 0.
        assert_eq!(binning.bins[6], 1);
        // The maximum sits on the last breakpoint but is capped to the last bin.
        assert_eq!(binning.bins[100], N_BINS - 1);
        assert_eq!(binning.upper[100], 100.0);
    }

    #[test]
    fn test_ties_pick_lower_breakpoint() {
        assert_eq!(nearest_index(&[0.0, 10.0], 5.0), 0);
    }

    #[test]
    fn test_ale_shape_and_group_values() {
        let explainer = uniform_explainer(400, vec![0.2, -0.1], 13);
        let table = compute_ale(&explainer, "x0", OutputType::Survival).unwrap();
        let n_times = table.times().len();
        assert_eq!(n_times, 4); // indices 10, 110, 210, 310
        assert_eq!(table.len(), N_BINS * n_times);
        assert_eq!(table.groups(), (0..N_BINS).collect::<Vec<_>>());
        for row in &table.rows {
            assert_eq!(row.group_value, table.breakpoints[row.group]);
        }
    }

    #[test]
    fn test_positive_coefficient_lowers_survival() {
        let explainer = uniform_explainer(300, vec![0.3], 17);
        let table = compute_ale(&explainer, "x0", OutputType::Survival).unwrap();
        assert!(table.rows.iter().all(|r| r.pred <= 0.0));
        let chf = compute_ale(&explainer, "x0", OutputType::Chf).unwrap();
        assert!(chf.rows.iter().all(|r| r.pred >= 0.0));
    }

    #[test]
    fn test_risk_is_unsupported() {
        let explainer = uniform_explainer(50, vec![0.3], 17);
        assert!(matches!(
            compute_ale(&explainer, "x0", OutputType::Risk),
            Err(ExplainError::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_missing_feature() {
        let explainer = uniform_explainer(50, vec![0.3], 17);
        assert!(matches!(
            compute_ale(&explainer, "x9", OutputType::Survival),
            Err(ExplainError::FeatureNotFound(_))
        ));
    }
}
