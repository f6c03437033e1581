//! Individual conditional expectation (ICE) curves.
//!
//! For a chosen feature, a sample of reference observations is swept over a
//! grid of feature values and the model is queried at every evaluation time.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::data::validate_eval_times;
use crate::error::{ExplainError, Result};
use crate::explainer::Explainer;
use crate::prediction::{OutputType, predict_matrix};
use crate::stats::linspace;

/// Parameters of an ICE sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceOptions {
    /// Upper bound on the number of reference observations used.
    pub n_sel_samples: usize,
    /// Number of grid values spanning the feature's observed range.
    pub n_grid_points: usize,
    pub output_type: OutputType,
    /// Evaluation times; the explainer's unique observed times when `None`.
    pub eval_times: Option<Vec<f64>>,
    /// Seed for the observation subsample.
    pub seed: u64,
}

impl Default for IceOptions {
    fn default() -> Self {
        Self {
            n_sel_samples: 100,
            n_grid_points: 50,
            output_type: OutputType::Survival,
            eval_times: None,
            seed: 42,
        }
    }
}

/// Prediction for one sampled observation at one grid value and time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IceRecord {
    pub grid_index: usize,
    /// Grid value the feature was set to.
    pub x: f64,
    pub time_index: usize,
    pub time: f64,
    /// Row of the explainer's dataset this curve belongs to.
    pub sample: usize,
    pub pred: f64,
}

/// All ICE curves of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceTable {
    pub feature: String,
    pub output_type: OutputType,
    pub grid: Vec<f64>,
    pub times: Vec<f64>,
    /// Sampled rows, ascending.
    pub samples: Vec<usize>,
    /// Ordered grid-major, then sample, then time.
    pub records: Vec<IceRecord>,
}

/// Compute ICE curves for `feature`.
#[tracing::instrument(skip(explainer, options), fields(model = explainer.label()))]
pub fn individual_conditional_expectation(
    explainer: &dyn Explainer,
    feature: &str,
    options: &IceOptions,
) -> Result<IceTable> {
    let started = Instant::now();
    let data = explainer.dataset();
    let column = data.column(feature)?;

    if options.n_grid_points == 0 {
        return Err(ExplainError::invalid_input("n_grid_points must be positive"));
    }
    if options.n_sel_samples == 0 {
        return Err(ExplainError::invalid_input("n_sel_samples must be positive"));
    }
    if data.n_rows() == 0 {
        return Err(ExplainError::invalid_input("explainer dataset has no rows"));
    }

    let times = match &options.eval_times {
        Some(times) => times.clone(),
        None => explainer.labels().unique_times(),
    };
    validate_eval_times(&times)?;

    let (min, max) = column
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let grid = linspace(min, max, options.n_grid_points);
    if grid.len() < options.n_grid_points {
        warn!(feature, value = min, "feature is constant; grid collapses to one point");
    }

    let samples = select_samples(data.n_rows(), options.n_sel_samples, options.seed);
    let subset = data.select_rows(&samples)?;
    debug!(
        feature,
        n_samples = samples.len(),
        n_grid = grid.len(),
        n_times = times.len(),
        "sweeping grid"
    );

    let mut records = Vec::with_capacity(grid.len() * samples.len() * times.len());
    for (g, &x) in grid.iter().enumerate() {
        let perturbed = subset.with_constant(feature, x)?;
        let preds = predict_matrix(explainer, &perturbed, &times, options.output_type)?;
        for ((s, k), &pred) in preds.indexed_iter() {
            records.push(IceRecord {
                grid_index: g,
                x,
                time_index: k,
                time: times[k],
                sample: samples[s],
                pred,
            });
        }
    }

    info!(
        feature,
        records = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ICE curves computed"
    );
    Ok(IceTable {
        feature: feature.to_string(),
        output_type: options.output_type,
        grid,
        times,
        samples,
        records,
    })
}

/// `n` distinct rows out of `n_rows`, ascending; every row when `n >= n_rows`.
fn select_samples(n_rows: usize, n: usize, seed: u64) -> Vec<usize> {
    if n >= n_rows {
        return (0..n_rows).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, n_rows, n).into_vec();
    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::uniform_explainer;

    fn options(n_sel: usize, n_grid: usize, times: Vec<f64>) -> IceOptions {
        IceOptions {
            n_sel_samples: n_sel,
            n_grid_points: n_grid,
            eval_times: Some(times),
            ..IceOptions::default()
        }
    }

    #[test]
    fn test_record_count_and_order() {
        let explainer = uniform_explainer(30, vec![0.1, -0.2], 11);
        let table =
            individual_conditional_expectation(&explainer, "x1", &options(10, 4, vec![1.0, 2.0, 3.0]))
                .unwrap();
        assert_eq!(table.records.len(), 4 * 10 * 3);
        assert_eq!(table.samples.len(), 10);
        assert!(table.samples.windows(2).all(|w| w[0] < w[1]));
        let first = &table.records[0];
        assert_eq!((first.grid_index, first.time_index), (0, 0));
        let last = table.records.last().unwrap();
        assert_eq!((last.grid_index, last.time_index), (3, 2));
    }

    #[test]
    fn test_grid_spans_observed_range() {
        let explainer = uniform_explainer(50, vec![0.1], 2);
        let col = explainer.dataset().column("x0").unwrap();
        let min = col.iter().copied().fold(f64::INFINITY, f64::min);
        let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let table =
            individual_conditional_expectation(&explainer, "x0", &options(5, 6, vec![1.0])).unwrap();
        assert_eq!(table.grid.len(), 6);
        assert_eq!(table.grid[0], min);
        assert_eq!(table.grid[5], max);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        assert_eq!(select_samples(100, 10, 9), select_samples(100, 10, 9));
        assert_eq!(select_samples(5, 10, 9), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_missing_feature() {
        let explainer = uniform_explainer(10, vec![0.1], 2);
        let err = individual_conditional_expectation(&explainer, "nope", &IceOptions::default());
        assert!(matches!(err, Err(ExplainError::FeatureNotFound(_))));
    }

    #[test]
    fn test_default_times_are_unique_label_times() {
        let explainer = uniform_explainer(12, vec![0.1], 4);
        let opts = IceOptions {
            n_grid_points: 2,
            ..IceOptions::default()
        };
        let table = individual_conditional_expectation(&explainer, "x0", &opts).unwrap();
        assert_eq!(table.times, explainer.labels().unique_times());
    }
}
