//! Property-based tests for binning, grouping and partial dependence.

mod common;

use proptest::prelude::*;

use survinsights_core::global::{AleBinning, GroupedMean, N_BINS};
use survinsights_core::local::{IceOptions, individual_conditional_expectation};
use survinsights_core::{PdpOptions, compute_pdp};

use common::uniform_explainer;

// --- ALE binning ---

proptest! {
    #[test]
    fn ale_bins_stay_in_range(values in prop::collection::vec(-1e6f64..1e6, 1..300)) {
        let binning = AleBinning::quantile_bins(&values).unwrap();
        prop_assert_eq!(binning.breakpoints.len(), N_BINS + 1);
        prop_assert_eq!(binning.bins.len(), values.len());
        for ((&bin, &lo), &hi) in binning.bins.iter().zip(&binning.lower).zip(&binning.upper) {
            prop_assert!(bin < N_BINS);
            prop_assert!(lo <= hi);
        }
    }

    #[test]
    fn ale_bins_with_heavy_ties(value in -10.0f64..10.0, n in 1usize..50) {
        let binning = AleBinning::quantile_bins(&vec![value; n]).unwrap();
        prop_assert!(binning.bins.iter().all(|&b| b == 0));
        prop_assert!(binning.lower.iter().zip(&binning.upper).all(|(lo, hi)| lo == hi));
    }
}

// --- Grouped mean ---

proptest! {
    #[test]
    fn grouped_mean_matches_naive_mean(
        entries in prop::collection::vec((0usize..4, 0usize..3, -100.0f64..100.0), 1..200),
    ) {
        let mut groups = GroupedMean::new();
        for &(a, b, v) in &entries {
            groups.add((a, b), v);
        }
        for ((a, b), mean, count) in groups.finish() {
            let members: Vec<f64> = entries
                .iter()
                .filter(|e| e.0 == a && e.1 == b)
                .map(|e| e.2)
                .collect();
            prop_assert_eq!(count, members.len());
            let naive = members.iter().sum::<f64>() / members.len() as f64;
            prop_assert!((mean - naive).abs() < 1e-9);
        }
    }
}

// --- Partial dependence ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn pdp_rows_are_grid_times_times(
        n_grid in 1usize..8,
        n_sel in 1usize..30,
        n_times in 1usize..5,
        seed in 0u64..1000,
    ) {
        let explainer = uniform_explainer(40, vec![0.1, 0.3], seed);
        let times: Vec<f64> = (1..=n_times).map(|k| k as f64 * 3.0).collect();
        let options = PdpOptions {
            n_sel_samples: n_sel,
            n_grid_points: n_grid,
            eval_times: Some(times.clone()),
            seed,
            ..PdpOptions::default()
        };
        let pdp = compute_pdp(&explainer, "x1", &options).unwrap();
        prop_assert_eq!(pdp.len(), n_grid * n_times);

        let ice_options = IceOptions {
            n_sel_samples: n_sel,
            n_grid_points: n_grid,
            eval_times: Some(times),
            seed,
            ..IceOptions::default()
        };
        let ice = individual_conditional_expectation(&explainer, "x1", &ice_options).unwrap();
        for row in &pdp.rows {
            let members: Vec<f64> = ice
                .records
                .iter()
                .filter(|r| r.x == row.x && r.time == row.time)
                .map(|r| r.pred)
                .collect();
            prop_assert_eq!(members.len(), n_sel.min(40));
            let mean = members.iter().sum::<f64>() / members.len() as f64;
            prop_assert!((row.pred - mean).abs() < 1e-12);
        }
    }
}
