//! # survinsights-core — global explanations for survival models
//!
//! Model-agnostic diagnostics of how features drive predicted survival,
//! risk or cumulative-hazard curves over time:
//!
//! - [`global::compute_pdp`] — partial dependence, ICE curves averaged per grid value and time
//! - [`global::compute_pfi`] — permutation feature importance against a time-dependent loss
//! - [`global::compute_ale`] — accumulated local effects over decile bins
//!
//! Models are plugged in through the [`Explainer`] trait (or a
//! [`SurvivalModel`] wrapped in [`ModelExplainer`]). Result tables feed the
//! [`render`] layer, which builds line charts and hands them to a
//! [`render::ChartSink`].

// Lets the shared test fixtures name this crate by its public path.
#[cfg(test)]
extern crate self as survinsights_core;

// Foundation
pub mod config;
pub mod error;

// Inputs and collaborators
pub mod data;
pub mod explainer;
pub mod performance;
pub mod prediction;
pub mod stats;

// Explanations
pub mod global;
pub mod local;

// Output
pub mod render;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod testing;

// Re-exports
pub use config::{ExplainConfig, load_config};
pub use data::{Dataset, SurvivalLabel, SurvivalLabels};
pub use error::{ExplainError, Result};
pub use explainer::{Explainer, ModelExplainer, SurvivalModel};
pub use global::{
    AleOptions, AleTable, PdpOptions, PdpTable, PfiOptions, PfiTable, ScoringType, compute_ale,
    compute_pdp, compute_pfi, feature_interaction, functional_decomposition,
};
pub use performance::Metric;
pub use prediction::OutputType;
