//! Permutation feature importance (PFI).
//!
//! Each feature column is shuffled `n_perm` times on a fresh copy of the
//! feature table; the per-time loss averaged over the repeats is compared
//! against the loss on the untouched table.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::data::{Dataset, SurvivalLabels, validate_eval_times};
use crate::error::{ExplainError, Result};
use crate::explainer::Explainer;
use crate::global::pdp::distinct_sorted;
use crate::performance::{Metric, evaluate};

/// How baseline and permuted losses are combined into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    /// `baseline / permuted`. With a lower-is-better loss, values below 1
    /// mean shuffling the feature hurt the model.
    #[default]
    Ratio,
}

impl ScoringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
        }
    }

    fn score(&self, baseline: f64, permuted: f64) -> f64 {
        match self {
            Self::Ratio => baseline / permuted,
        }
    }
}

impl fmt::Display for ScoringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringType {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ratio" => Ok(Self::Ratio),
            other => Err(ExplainError::unsupported_option("scoring type", other)),
        }
    }
}

/// Parameters of a PFI computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfiOptions {
    /// Independent shuffles per feature.
    pub n_perm: usize,
    pub loss: Metric,
    pub scoring: ScoringType,
}

impl Default for PfiOptions {
    fn default() -> Self {
        Self {
            n_perm: 10,
            loss: Metric::BrierScore,
            scoring: ScoringType::Ratio,
        }
    }
}

/// Importance of one feature at one time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfiRow {
    #[serde(rename = "feat")]
    pub feature: String,
    #[serde(rename = "times")]
    pub time: f64,
    pub perf: f64,
}

/// PFI result, ordered by feature (dataset column order) then time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfiTable {
    pub loss: Metric,
    pub scoring: ScoringType,
    pub rows: Vec<PfiRow>,
}

impl PfiTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        distinct_sorted(self.rows.iter().map(|r| r.time))
    }

    /// Features in first-appearance order.
    pub fn features(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if out.last() != Some(&row.feature.as_str()) {
                out.push(&row.feature);
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Permutation importance of every column of `features`, using the thread RNG.
pub fn compute_pfi(
    explainer: &dyn Explainer,
    features: &Dataset,
    labels: &SurvivalLabels,
    eval_times: &[f64],
    options: &PfiOptions,
) -> Result<PfiTable> {
    compute_pfi_with_rng(
        explainer,
        features,
        labels,
        eval_times,
        options,
        &mut rand::thread_rng(),
    )
}

/// As [`compute_pfi`], drawing permutations from `rng`.
#[tracing::instrument(skip_all, fields(model = explainer.label(), n_perm = options.n_perm))]
pub fn compute_pfi_with_rng<R: Rng + ?Sized>(
    explainer: &dyn Explainer,
    features: &Dataset,
    labels: &SurvivalLabels,
    eval_times: &[f64],
    options: &PfiOptions,
    rng: &mut R,
) -> Result<PfiTable> {
    let started = Instant::now();
    validate_eval_times(eval_times)?;
    if options.n_perm == 0 {
        return Err(ExplainError::invalid_input("n_perm must be positive"));
    }

    let baseline: Vec<f64> = evaluate(explainer, features, labels, eval_times, options.loss)?
        .into_iter()
        .map(|r| r.perf)
        .collect();
    debug!(?baseline, "baseline loss");

    let n_times = eval_times.len();
    let weight = 1.0 / options.n_perm as f64;
    let mut rows = Vec::with_capacity(features.n_features() * n_times);

    for name in features.columns() {
        let original = features.column(name)?.to_vec();
        let mut permuted_loss = vec![0.0; n_times];
        for _ in 0..options.n_perm {
            let mut shuffled = original.clone();
            shuffled.shuffle(rng);
            let perturbed = features.with_column(name, &shuffled)?;
            let perf = evaluate(explainer, &perturbed, labels, eval_times, options.loss)?;
            for (acc, rec) in permuted_loss.iter_mut().zip(&perf) {
                *acc += weight * rec.perf;
            }
        }

        if permuted_loss.iter().any(|&l| l == 0.0) {
            warn!(feature = %name, "permuted loss is zero at some time; ratio is not finite");
        }
        for ((&time, &base), &perm) in eval_times.iter().zip(&baseline).zip(&permuted_loss) {
            rows.push(PfiRow {
                feature: name.clone(),
                time,
                perf: options.scoring.score(base, perm),
            });
        }
    }

    info!(
        features = features.n_features(),
        rows = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "PFI computed"
    );
    Ok(PfiTable {
        loss: options.loss,
        scoring: options.scoring,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::uniform_explainer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_option_parsing() {
        assert_eq!("ratio".parse::<ScoringType>().unwrap(), ScoringType::Ratio);
        assert!(matches!(
            "difference".parse::<ScoringType>(),
            Err(ExplainError::UnsupportedOption { option: "scoring type", .. })
        ));
    }

    #[test]
    fn test_shape_and_order() {
        let explainer = uniform_explainer(60, vec![0.3, 0.0], 8);
        let times = [5.0, 10.0, 15.0];
        let table = compute_pfi_with_rng(
            &explainer,
            explainer.dataset(),
            explainer.labels(),
            &times,
            &PfiOptions {
                n_perm: 3,
                ..PfiOptions::default()
            },
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(table.len(), 2 * 3);
        assert_eq!(table.features(), vec!["x0", "x1"]);
        assert_eq!(table.times(), times.to_vec());
        assert!(table.rows.iter().all(|r| r.perf.is_finite()));
    }

    #[test]
    fn test_irrelevant_feature_scores_one() {
        // x1 has a zero coefficient, so shuffling it cannot change any prediction.
        let explainer = uniform_explainer(50, vec![0.3, 0.0], 4);
        let table = compute_pfi_with_rng(
            &explainer,
            explainer.dataset(),
            explainer.labels(),
            &[4.0, 12.0],
            &PfiOptions::default(),
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();
        for row in table.rows.iter().filter(|r| r.feature == "x1") {
            assert!((row.perf - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let explainer = uniform_explainer(20, vec![0.3], 4);
        let features = explainer.dataset().clone();
        compute_pfi(&explainer, &features, explainer.labels(), &[5.0], &PfiOptions::default())
            .unwrap();
        assert_eq!(&features, explainer.dataset());
    }

    #[test]
    fn test_rejects_empty_times_and_zero_perm() {
        let explainer = uniform_explainer(10, vec![0.3], 4);
        let data = explainer.dataset();
        let labels = explainer.labels();
        assert!(compute_pfi(&explainer, data, labels, &[], &PfiOptions::default()).is_err());
        let zero = PfiOptions {
            n_perm: 0,
            ..PfiOptions::default()
        };
        assert!(compute_pfi(&explainer, data, labels, &[1.0], &zero).is_err());
    }
}
