//! Recommendation engine: how much does extraction recovery move when a key operating
//! parameter is raised by a small step?
use super::orchestrator::{SimulationResult, run_simulation};
use super::scenarios::StageCounts;
use crate::process_inputs::{OA_RATIO, PLS_CU, ProcessInputs};
use crate::settings::SolverSettings;
use log::{debug, warn};

/// parameters perturbed by the analysis, with their display names
pub const TRACKED_PARAMETERS: [(&str, &str); 2] = [
    (OA_RATIO, "extraction O/A ratio"),
    (PLS_CU, "primary PLS copper concentration"),
];

pub const STABLE_PROCESS_MESSAGE: &str = "The process is in a stable state and shows low sensitivity to small changes in the main parameters.";

/// response of extraction recovery to one perturbed parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterResponse {
    pub key: String,
    pub name: String,
    /// relative step applied, 0.05 = +5%
    pub step: f64,
    /// change of extraction recovery, percentage points
    pub recovery_change: f64,
}

impl ParameterResponse {
    pub fn recommendation(&self) -> String {
        let direction = if self.recovery_change > 0.0 {
            "increase"
        } else {
            "decrease"
        };
        format!(
            "Recommendation: a {:.0}% increase in '{}' would {} extraction recovery by about {:.2}%.",
            self.step * 100.0,
            self.name,
            direction,
            self.recovery_change.abs()
        )
    }
}

/// Reruns the plant with each tracked parameter scaled by `1 + perturbation`.
/// Parameters that are absent or zero, and perturbed runs that fail, are skipped.
pub fn parameter_responses(
    base_inputs: &ProcessInputs,
    base_result: &SimulationResult,
    volume_fraction: f64,
    counts: StageCounts,
    settings: &SolverSettings,
) -> Vec<ParameterResponse> {
    let step = settings.sensitivity.perturbation;
    let mut responses = Vec::new();
    for (key, name) in TRACKED_PARAMETERS.iter() {
        match base_inputs.get(key) {
            Some(value) if value != 0.0 => {}
            _ => continue,
        }
        let perturbed = base_inputs.scaled(key, 1.0 + step);
        match run_simulation(&perturbed, volume_fraction, counts, settings) {
            Ok(res) => {
                let change = res.extraction_recovery - base_result.extraction_recovery;
                debug!("sensitivity of extraction recovery to {}: {:+.4}", key, change);
                responses.push(ParameterResponse {
                    key: key.to_string(),
                    name: name.to_string(),
                    step,
                    recovery_change: change,
                });
            }
            Err(e) => warn!("perturbed run for '{}' failed: {}", key, e),
        }
    }
    responses
}

/// Qualitative recommendations for the operating point `base_result`; a single
/// stability statement when no parameter moves recovery beyond the threshold.
pub fn analyze_sensitivity(
    base_inputs: &ProcessInputs,
    base_result: &SimulationResult,
    volume_fraction: f64,
    counts: StageCounts,
    settings: &SolverSettings,
) -> Vec<String> {
    let threshold = settings.sensitivity.threshold;
    let mut recommendations: Vec<String> =
        parameter_responses(base_inputs, base_result, volume_fraction, counts, settings)
            .iter()
            .filter(|r| r.recovery_change.abs() > threshold)
            .map(|r| r.recommendation())
            .collect();
    if recommendations.is_empty() {
        recommendations.push(STABLE_PROCESS_MESSAGE.to_string());
    }
    recommendations
}
