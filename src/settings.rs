//! # Settings Module
//!
//! ## Purpose
//! Holds every numerical policy of the twin that is not physics: iteration caps and
//! tolerances of the stage and circuit solvers, the bounds and tolerances of the
//! operating-point optimizer, the sensitivity perturbation policy and the defaults used
//! for keys missing from a request.
//!
//! ## Configuration Format
//! Every section is optional; missing fields take the defaults below.
//! ```json
//! {
//!   "stage": { "max_iterations": 25, "tolerance": 1e-9 },
//!   "circuit": { "outer_passes": 5, "backward_pass": "StageResolve" },
//!   "optimizer": { "lower": 1.0, "upper": 100.0,
//!                  "tolerance": 1e-9, "max_iterations": 500,
//!                  "ratio_tolerance": 0.001, "failure_penalty": 1e9 },
//!   "sensitivity": { "perturbation": 0.05, "threshold": 0.1 },
//!   "defaults": { "efficiency_pct": 95.0, "oa_ratio": 1.0, "target_stripping_ratio": 85.0 }
//! }
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use SimSX::settings::SolverSettings;
//! let settings = SolverSettings::load_or_default("sx_settings.json");
//! settings.save("sx_settings_copy.json")?;
//! ```

use crate::Circuit::cascade::BackwardPassKind;
use crate::errors::{SxError, SxResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// fixed-point iteration of one mixer-settler stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSettings {
    pub max_iterations: usize,
    /// both outlet deltas must fall below this value
    pub tolerance: f64,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerance: 1e-9,
        }
    }
}

/// outer forward/backward sweeps of the cascade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitSettings {
    pub outer_passes: usize,
    pub backward_pass: BackwardPassKind,
}

impl Default for CircuitSettings {
    fn default() -> Self {
        Self {
            outer_passes: 5,
            backward_pass: BackwardPassKind::StageResolve,
        }
    }
}

/// bounded search for the extractant volume fraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// lower bound of v/v%
    pub lower: f64,
    /// upper bound of v/v%
    pub upper: f64,
    /// absolute tolerance on v/v%
    pub tolerance: f64,
    pub max_iterations: usize,
    /// accepted mismatch between achieved and target stripping ratio, percentage points
    pub ratio_tolerance: f64,
    /// objective value returned when a trial simulation fails
    pub failure_penalty: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            lower: 1.0,
            upper: 100.0,
            tolerance: 1e-9,
            max_iterations: 500,
            ratio_tolerance: 1e-3,
            failure_penalty: 1e9,
        }
    }
}

/// perturbation policy of the recommendation engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivitySettings {
    /// relative step applied to each tracked parameter (0.05 = +5%)
    pub perturbation: f64,
    /// minimal change of extraction recovery worth reporting, percentage points
    pub threshold: f64,
}

impl Default for SensitivitySettings {
    fn default() -> Self {
        Self {
            perturbation: 0.05,
            threshold: 0.1,
        }
    }
}

/// values used for keys absent from the request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub efficiency_pct: f64,
    pub oa_ratio: f64,
    pub target_stripping_ratio: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            efficiency_pct: 95.0,
            oa_ratio: 1.0,
            target_stripping_ratio: 85.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub stage: StageSettings,
    pub circuit: CircuitSettings,
    pub optimizer: OptimizerSettings,
    pub sensitivity: SensitivitySettings,
    pub defaults: InputDefaults,
}

impl SolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from a JSON file and validates them.
    pub fn load<P: AsRef<Path>>(path: P) -> SxResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: SolverSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        info!("solver settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Like [`SolverSettings::load`] but falls back to defaults when the file is
    /// missing or broken.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "failed to load settings from {}: {}; using defaults",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> SxResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> SxResult<()> {
        if self.stage.max_iterations == 0 {
            return Err(SxError::InvalidInput(
                "stage.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.circuit.outer_passes == 0 {
            return Err(SxError::InvalidInput(
                "circuit.outer_passes must be at least 1".to_string(),
            ));
        }
        if !(self.stage.tolerance > 0.0 && self.optimizer.tolerance > 0.0) {
            return Err(SxError::InvalidInput(
                "tolerances must be positive".to_string(),
            ));
        }
        let opt = &self.optimizer;
        if !(opt.lower > 0.0 && opt.lower < opt.upper) {
            return Err(SxError::InvalidInput(format!(
                "optimizer bounds [{}, {}] are not a positive interval",
                opt.lower, opt.upper
            )));
        }
        if opt.max_iterations == 0 || !(opt.ratio_tolerance > 0.0) {
            return Err(SxError::InvalidInput(
                "optimizer.max_iterations and optimizer.ratio_tolerance must be positive"
                    .to_string(),
            ));
        }
        if !(self.sensitivity.perturbation != 0.0 && self.sensitivity.threshold >= 0.0) {
            return Err(SxError::InvalidInput(
                "sensitivity perturbation must be nonzero and threshold non-negative".to_string(),
            ));
        }
        if !(self.defaults.oa_ratio > 0.0) {
            return Err(SxError::InvalidInput(
                "default O/A ratio must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
