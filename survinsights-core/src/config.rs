//! Configuration for explanation runs.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/survinsights/config.toml` and/or
//! `.survinsights/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::global::{AleOptions, PdpOptions, PfiOptions};
use crate::prediction::OutputType;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplainConfig {
    #[serde(default)]
    pub pdp: PdpConfig,
    #[serde(default)]
    pub pfi: PfiConfig,
    #[serde(default)]
    pub ale: AleConfig,
}

/// Partial dependence defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdpConfig {
    /// Reference observations averaged per grid point.
    #[serde(default = "default_n_sel_samples")]
    pub n_sel_samples: usize,
    /// Grid resolution over the feature range.
    #[serde(default = "default_n_grid_points")]
    pub n_grid_points: usize,
    /// One of "survival", "risk", "chf".
    #[serde(default = "default_output_type")]
    pub output_type: String,
    /// Seed for the observation subsample.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for PdpConfig {
    fn default() -> Self {
        Self {
            n_sel_samples: default_n_sel_samples(),
            n_grid_points: default_n_grid_points(),
            output_type: default_output_type(),
            seed: default_seed(),
        }
    }
}

fn default_n_sel_samples() -> usize {
    100
}

fn default_n_grid_points() -> usize {
    50
}

fn default_output_type() -> String {
    "survival".to_string()
}

fn default_seed() -> u64 {
    42
}

/// Permutation importance defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfiConfig {
    #[serde(default = "default_n_perm")]
    pub n_perm: usize,
    /// Only "brier_score".
    #[serde(default = "default_loss")]
    pub loss: String,
    /// Only "ratio".
    #[serde(default = "default_scoring")]
    pub scoring: String,
}

impl Default for PfiConfig {
    fn default() -> Self {
        Self {
            n_perm: default_n_perm(),
            loss: default_loss(),
            scoring: default_scoring(),
        }
    }
}

fn default_n_perm() -> usize {
    10
}

fn default_loss() -> String {
    "brier_score".to_string()
}

fn default_scoring() -> String {
    "ratio".to_string()
}

/// Accumulated local effects defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AleConfig {
    /// One of "survival", "chf".
    #[serde(default = "default_output_type")]
    pub output_type: String,
    #[serde(default = "default_time_offset")]
    pub time_offset: usize,
    #[serde(default = "default_time_stride")]
    pub time_stride: usize,
}

impl Default for AleConfig {
    fn default() -> Self {
        Self {
            output_type: default_output_type(),
            time_offset: default_time_offset(),
            time_stride: default_time_stride(),
        }
    }
}

fn default_time_offset() -> usize {
    10
}

fn default_time_stride() -> usize {
    100
}

impl PdpConfig {
    pub fn to_options(&self) -> Result<PdpOptions> {
        Ok(PdpOptions {
            n_sel_samples: self.n_sel_samples,
            n_grid_points: self.n_grid_points,
            output_type: self.output_type.parse()?,
            eval_times: None,
            seed: self.seed,
        })
    }
}

impl PfiConfig {
    pub fn to_options(&self) -> Result<PfiOptions> {
        Ok(PfiOptions {
            n_perm: self.n_perm,
            loss: self.loss.parse()?,
            scoring: self.scoring.parse()?,
        })
    }
}

impl AleConfig {
    /// Output type and subsampling options; the output type is parsed but
    /// its ALE-specific restriction is checked by the engine.
    pub fn to_options(&self) -> Result<(OutputType, AleOptions)> {
        Ok((
            self.output_type.parse()?,
            AleOptions {
                time_offset: self.time_offset,
                time_stride: self.time_stride,
            },
        ))
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `SURVINSIGHTS_`)
/// 3. Workspace-local config (`.survinsights/config.toml`)
/// 4. User config (`~/.config/survinsights/config.toml`)
/// 5. Built-in defaults
///
/// Only override fields that differ from the built-in defaults are applied,
/// so an override cannot reset a file or environment value to its default.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ExplainConfig>,
) -> Result<ExplainConfig> {
    let mut figment = Figment::from(Serialized::defaults(ExplainConfig::default()));

    // User-level config
    if let Some(dirs) = directories::ProjectDirs::from("org", "survinsights", "survinsights") {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".survinsights").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (SURVINSIGHTS_PDP__N_GRID_POINTS, SURVINSIGHTS_PFI__N_PERM, etc.)
    figment = figment.merge(Env::prefixed("SURVINSIGHTS_").split("__"));

    if let Some(overrides) = overrides {
        let defaults = serde_json::to_value(ExplainConfig::default())?;
        let changed = changed_fields(serde_json::to_value(overrides)?, &defaults);
        figment = figment.merge(Serialized::defaults(changed));
    }

    let config: ExplainConfig = figment.extract().map_err(Box::new)?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// Strip the entries of `value` that equal the matching entry of `base`.
fn changed_fields(value: serde_json::Value, base: &serde_json::Value) -> serde_json::Value {
    match (value, base) {
        (serde_json::Value::Object(map), serde_json::Value::Object(base)) => map
            .into_iter()
            .filter_map(|(key, v)| match base.get(&key) {
                Some(b) if *b == v => None,
                Some(b) => Some((key, changed_fields(v, b))),
                None => Some((key, v)),
            })
            .collect::<serde_json::Map<_, _>>()
            .into(),
        (value, _) => value,
    }
}
