//! # Simulation API
//!
//! ## Purpose
//! Entry point used by the CLI and by embedding hosts. A request names a scenario,
//! an operation mode and a flat parameter map; the answer is either a complete
//! response (metrics, chart samples, recommendations) or a single error message.
//!
//! ## Flow
//! 1. scenario code -> stage counts
//! 2. mode "1": search v/v% for the target stripping ratio; otherwise use `v_v`
//! 3. steady-state run at that volume fraction
//! 4. sensitivity recommendations around the run
//! 5. presentation
//!
//! Every failure stops the flow; [`run_request`] turns it into the `error` field.
//!
//! ## Usage
//! ```rust,ignore
//! use SimSX::api::run_request;
//! use SimSX::settings::SolverSettings;
//! let json = r#"{"inputs": {"plsCu": 4.0, "v_v": 20}, "scenario": "C", "option": "0"}"#;
//! let response = run_request(json, &SolverSettings::default());
//! println!("{}", response.to_json()?);
//! ```
use crate::Circuit::cascade::CircuitResult;
use crate::Simulation::operating_point::{OperatingPoint, solve_volume_fraction};
use crate::Simulation::orchestrator::{SimulationResult, run_simulation_with_profile};
use crate::Simulation::scenarios::{StageCounts, stage_counts};
use crate::Simulation::sensitivity::analyze_sensitivity;
use crate::Utils::report::SimulationResponse;
use crate::Utils::request::{OperationMode, SimulationRequest};
use crate::errors::SxResult;
use crate::settings::SolverSettings;
use log::{error, info};

/// everything a successful request produced
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub counts: StageCounts,
    /// set when the volume fraction was searched for
    pub operating_point: Option<OperatingPoint>,
    pub result: SimulationResult,
    pub circuit: CircuitResult,
    pub recommendations: Vec<String>,
}

impl SimulationOutcome {
    pub fn response(&self) -> SimulationResponse {
        SimulationResponse::success(
            &self.result,
            self.operating_point.is_some(),
            self.recommendations.clone(),
        )
    }
}

/// Runs a parsed request. Errors are returned typed, not folded into a response.
pub fn simulate(request: &SimulationRequest, settings: &SolverSettings) -> SxResult<SimulationOutcome> {
    let counts = stage_counts(&request.scenario)?;
    let inputs = &request.inputs;
    info!(
        "scenario {}: {} stripping / {} extraction stages, mode {:?}",
        request.scenario, counts.strip, counts.extraction, request.mode
    );

    let (volume_fraction, operating_point) = match request.mode {
        OperationMode::SolveVolumeFraction => {
            let point = solve_volume_fraction(inputs, counts, settings)?;
            (point.volume_fraction, Some(point))
        }
        // a missing v_v is reported by the simulation as a non-positive volume fraction
        OperationMode::Analyze => (inputs.volume_fraction().unwrap_or(0.0), None),
    };

    let (result, circuit) = run_simulation_with_profile(inputs, volume_fraction, counts, settings)?;
    let recommendations = analyze_sensitivity(inputs, &result, volume_fraction, counts, settings);
    Ok(SimulationOutcome {
        counts,
        operating_point,
        result,
        circuit,
        recommendations,
    })
}

/// Parses `json`, runs it and returns the response document. Never fails: any error
/// is logged and becomes the response's only field.
pub fn run_request(json: &str, settings: &SolverSettings) -> SimulationResponse {
    match SimulationRequest::from_json(json).and_then(|req| simulate(&req, settings)) {
        Ok(outcome) => outcome.response(),
        Err(e) => {
            error!("simulation request failed: {}", e);
            SimulationResponse::failure(&e)
        }
    }
}
