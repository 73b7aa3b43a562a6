//! One steady-state run of the SX plant at a given extractant volume fraction.
use super::scenarios::StageCounts;
use crate::Circuit::cascade::{CircuitResult, solve_circuit};
use crate::Circuit::isotherm::max_organic_loading;
use crate::errors::{SxError, SxResult};
use crate::process_inputs::{MAX_FEED_STREAMS, PLS_CU, ProcessInputs, StageRole, pls_cu_key};
use crate::settings::{InputDefaults, SolverSettings};
use log::debug;
use serde::{Deserialize, Serialize};

/// fraction of the organic copper removed by a stripping stage of 100% efficiency
pub const STRIP_STAGE_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// extractant volume fraction, %v/v
    pub volume_fraction: f64,
    /// AML, g/L
    pub max_loading: f64,
    /// ML, g/L
    pub loaded_organic_cu: f64,
    /// ML / AML, %
    pub stripping_ratio: f64,
    pub extraction_recovery: f64,
    pub stripping_recovery: f64,
    /// (ML - stripped organic) per %v/v, g/L/%
    pub net_transfer: f64,
    pub raffinate_cu: f64,
    pub stripped_organic_cu: f64,
    pub avg_feed_cu: f64,
}

fn clamp_pct(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

/// Copper left on the organic after stripping, starting from `AML * sr / 100` and
/// scaling by `1 - 0.8 * E/100` for every stripping stage, last stage first.
pub fn stripped_organic_cu(
    inputs: &ProcessInputs,
    max_loading: f64,
    strip_stages: usize,
    defaults: &InputDefaults,
) -> f64 {
    let mut organic = max_loading * inputs.target_stripping_ratio(defaults) / 100.0;
    for stage_number in (1..=strip_stages).rev() {
        let efficiency = inputs.efficiency(stage_number, StageRole::Stripping, defaults);
        organic *= 1.0 - STRIP_STAGE_FACTOR * efficiency / 100.0;
    }
    organic.max(0.0)
}

/// Checks that do not depend on the volume fraction: at least one extraction stage,
/// PLS copper present, a positive finite O/A ratio. A zero O/A is reported as
/// `UnexpectedComputation`, every other failure as `InvalidInput`.
pub fn check_plant_inputs(
    inputs: &ProcessInputs,
    counts: StageCounts,
    defaults: &InputDefaults,
) -> SxResult<()> {
    if counts.extraction == 0 {
        return Err(SxError::InvalidInput(
            "the extraction circuit needs at least one stage".to_string(),
        ));
    }
    let has_feed =
        inputs.contains(PLS_CU) || (1..=MAX_FEED_STREAMS).any(|i| inputs.contains(&pls_cu_key(i)));
    if !has_feed {
        return Err(SxError::InvalidInput(
            "PLS copper concentration is missing".to_string(),
        ));
    }
    let oa = inputs.oa_ratio(defaults);
    if oa == 0.0 {
        return Err(SxError::UnexpectedComputation(
            "division by zero: extraction O/A ratio is 0".to_string(),
        ));
    }
    if !(oa > 0.0) || !oa.is_finite() {
        return Err(SxError::InvalidInput(format!(
            "extraction O/A ratio must be positive, got {}",
            oa
        )));
    }
    Ok(())
}

/// Runs the plant and also returns the converged cascade (stage profiles, residuals).
pub fn run_simulation_with_profile(
    inputs: &ProcessInputs,
    volume_fraction: f64,
    counts: StageCounts,
    settings: &SolverSettings,
) -> SxResult<(SimulationResult, CircuitResult)> {
    let defaults = &settings.defaults;
    if !(volume_fraction > 0.0) || !volume_fraction.is_finite() {
        return Err(SxError::InvalidInput("v/v% must be positive.".to_string()));
    }
    check_plant_inputs(inputs, counts, defaults)?;
    let oa_ratio = inputs.oa_ratio(defaults);

    let aml = max_organic_loading(volume_fraction);
    let so_cu = stripped_organic_cu(inputs, aml, counts.strip, defaults);
    let circuit = solve_circuit(inputs, so_cu, aml, oa_ratio, counts.extraction, settings);
    let ml = circuit.loaded_organic_cu;
    let raffinate = circuit.raffinate_cu;
    let avg_feed = circuit.avg_feed_cu;

    let stripping_ratio = if aml > 0.0 { ml / aml * 100.0 } else { 0.0 };
    let extraction_recovery = if avg_feed > 0.0 {
        clamp_pct((avg_feed - raffinate) / avg_feed * 100.0)
    } else {
        0.0
    };
    let stripping_recovery = if ml > 0.0 {
        clamp_pct((ml - so_cu) / ml * 100.0)
    } else {
        0.0
    };
    let net_transfer = (ml - so_cu) / volume_fraction;

    let result = SimulationResult {
        volume_fraction,
        max_loading: aml,
        loaded_organic_cu: ml,
        stripping_ratio,
        extraction_recovery,
        stripping_recovery,
        net_transfer,
        raffinate_cu: raffinate,
        stripped_organic_cu: so_cu,
        avg_feed_cu: avg_feed,
    };
    let all_finite = [
        aml,
        ml,
        stripping_ratio,
        extraction_recovery,
        stripping_recovery,
        net_transfer,
        raffinate,
        so_cu,
        avg_feed,
    ]
    .iter()
    .all(|x| x.is_finite());
    if !all_finite {
        return Err(SxError::UnexpectedComputation(format!(
            "non-finite result at v/v% = {}: {:?}",
            volume_fraction, result
        )));
    }
    debug!(
        "v/v {:.4}: ML={:.4} SR={:.3}% raffinate={:.4} (pass change {:e}, balance {:e})",
        volume_fraction,
        ml,
        stripping_ratio,
        raffinate,
        circuit.pass_change,
        circuit.balance_error
    );
    Ok((result, circuit))
}

/// Steady state of the plant at `volume_fraction` %v/v.
///
/// Fails with `InvalidInput` for a non-positive volume fraction, a cascade without
/// extraction stages or a request without PLS copper, and with
/// `UnexpectedComputation` for a zero O/A ratio or non-finite arithmetic.
pub fn run_simulation(
    inputs: &ProcessInputs,
    volume_fraction: f64,
    counts: StageCounts,
    settings: &SolverSettings,
) -> SxResult<SimulationResult> {
    run_simulation_with_profile(inputs, volume_fraction, counts, settings).map(|(r, _)| r)
}
