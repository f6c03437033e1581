//! Small numerical helpers: grids, quantiles and the Kaplan–Meier estimator.

use crate::error::{ExplainError, Result};

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// A degenerate range (`start == end`) collapses to a single value.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 || start == end {
        return vec![start];
    }
    let step = (end - start) / (n as f64 - 1.0);
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
        .collect()
}

/// Quantile of already-sorted values with linear interpolation between
/// closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(ExplainError::invalid_input("quantile of empty sample"));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(ExplainError::invalid_input(format!(
            "quantile level {q} outside [0, 1]"
        )));
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    // Bounded by the two neighbours so rounding never breaks monotonicity.
    let value = sorted[lo] + (sorted[hi] - sorted[lo]) * frac;
    Ok(value.max(sorted[lo]).min(sorted[hi]))
}

/// Quantiles of `values` at every level in `levels`.
pub fn quantiles(values: &[f64], levels: &[f64]) -> Result<Vec<f64>> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    levels.iter().map(|&q| quantile_sorted(&sorted, q)).collect()
}

/// Product-limit estimate of a survival function from right-censored data.
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeier {
    /// Distinct times at which at least one event occurred.
    times: Vec<f64>,
    /// Survival just after each entry of `times`.
    survival: Vec<f64>,
}

impl KaplanMeier {
    /// Fit on `(time, event)` pairs; `event == true` counts as a failure.
    pub fn fit(times: &[f64], events: &[bool]) -> Result<Self> {
        if times.len() != events.len() {
            return Err(ExplainError::invalid_input(format!(
                "{} times but {} event indicators",
                times.len(),
                events.len()
            )));
        }
        let mut obs: Vec<(f64, bool)> = times
            .iter()
            .copied()
            .zip(events.iter().copied())
            .collect();
        obs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut at_risk = obs.len();
        let mut s = 1.0;
        let mut km_times = Vec::new();
        let mut km_surv = Vec::new();
        let mut i = 0;
        while i < obs.len() {
            let t = obs[i].0;
            let mut deaths = 0usize;
            let mut leaving = 0usize;
            while i < obs.len() && obs[i].0 == t {
                if obs[i].1 {
                    deaths += 1;
                }
                leaving += 1;
                i += 1;
            }
            if deaths > 0 {
                s *= 1.0 - deaths as f64 / at_risk as f64;
                km_times.push(t);
                km_surv.push(s);
            }
            at_risk -= leaving;
        }
        Ok(Self {
            times: km_times,
            survival: km_surv,
        })
    }

    /// `S(t)`, right-continuous: events at `t` are already counted.
    pub fn survival_at(&self, t: f64) -> f64 {
        let n = self.times.partition_point(|&x| x <= t);
        if n == 0 { 1.0 } else { self.survival[n - 1] }
    }

    /// `S(t-)`, the left limit: events at `t` are not yet counted.
    pub fn survival_before(&self, t: f64) -> f64 {
        let n = self.times.partition_point(|&x| x < t);
        if n == 0 { 1.0 } else { self.survival[n - 1] }
    }
}
