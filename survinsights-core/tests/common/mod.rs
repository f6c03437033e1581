//! Test fixtures shared by the unit tests in `src/` and the integration tests.

#![allow(dead_code)]

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use survinsights_core::{Dataset, ModelExplainer, Result, SurvivalLabels, SurvivalModel};

/// Proportional hazards with a constant baseline: `S(t | x) = exp(-h0 t exp(beta · x))`.
#[derive(Debug, Clone)]
pub struct ExponentialModel {
    pub base_hazard: f64,
    pub coefficients: Vec<f64>,
}

impl ExponentialModel {
    pub fn new(base_hazard: f64, coefficients: Vec<f64>) -> Self {
        Self {
            base_hazard,
            coefficients,
        }
    }

    pub fn hazard(&self, row: &[f64]) -> f64 {
        let eta: f64 = row.iter().zip(&self.coefficients).map(|(x, b)| x * b).sum();
        self.base_hazard * eta.exp()
    }
}

impl SurvivalModel for ExponentialModel {
    fn predict_survival(&self, data: &Dataset, times: &[f64]) -> Result<Array2<f64>> {
        let mut out = Array2::zeros((data.n_rows(), times.len()));
        for (i, row) in data.values().rows().into_iter().enumerate() {
            let h = self.hazard(&row.to_vec());
            for (k, t) in times.iter().enumerate() {
                out[[i, k]] = (-h * t).exp();
            }
        }
        Ok(out)
    }
}

/// Features `x0..` uniform on `[0, 10]`, exponential event times, uniform censoring.
pub fn uniform_explainer(
    n_rows: usize,
    coefficients: Vec<f64>,
    seed: u64,
) -> ModelExplainer<ExponentialModel> {
    let mut rng = StdRng::seed_from_u64(seed);
    let columns: Vec<(String, Vec<f64>)> = (0..coefficients.len())
        .map(|j| {
            let values = (0..n_rows).map(|_| rng.gen_range(0.0..10.0)).collect();
            (format!("x{j}"), values)
        })
        .collect();
    let data = Dataset::from_columns(columns).unwrap();
    let model = ExponentialModel::new(0.05, coefficients);

    let mut times = Vec::with_capacity(n_rows);
    let mut events = Vec::with_capacity(n_rows);
    for row in data.values().rows() {
        let h = model.hazard(&row.to_vec());
        let u: f64 = rng.gen_range(f64::EPSILON..1.0);
        let event_time = -u.ln() / h;
        let censor_time = rng.gen_range(0.0..60.0);
        times.push(event_time.min(censor_time));
        events.push(event_time <= censor_time);
    }
    let labels = SurvivalLabels::new(times, events).unwrap();
    ModelExplainer::new(model, data, labels, "exponential").unwrap()
}

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("survinsights_core=debug")
        .try_init();
}
