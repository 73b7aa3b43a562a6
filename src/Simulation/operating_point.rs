//! Extractant dosing: the volume fraction at which the plant runs at the target
//! stripping ratio.
//!
//! The objective `(SR(v) - SR_target)^2` is minimized over `[lower, upper]` with
//! argmin's `BrentOpt` (golden-section steps combined with parabolic interpolation,
//! no derivatives). The search starts from the golden-section point of the bracket. A
//! trial point where the simulation fails scores the configured penalty so the search
//! can move on; inputs that fail regardless of the volume fraction are rejected
//! before the search starts.
use super::orchestrator::{check_plant_inputs, run_simulation};
use super::scenarios::StageCounts;
use crate::errors::{SxError, SxResult};
use crate::process_inputs::ProcessInputs;
use crate::settings::SolverSettings;
use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentOpt;
use log::{info, warn};

/// outcome of a bounded scalar minimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedMinimum {
    pub x: f64,
    pub fx: f64,
    pub evaluations: usize,
    /// the bracket shrank below the tolerance within the iteration budget
    pub converged: bool,
}

/// scalar objective handed to argmin
struct ScalarObjective<F> {
    f: F,
}

impl<F> CostFunction for ScalarObjective<F>
where
    F: Fn(f64) -> f64,
{
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        Ok((self.f)(*x))
    }
}

/// Brent's bounded minimization of `f` on `[lower, upper]` (argmin `BrentOpt`).
///
/// `xtol` is the absolute tolerance on `x`; `max_iterations` caps the solver
/// iterations. Errors raised by argmin itself become `SxError::Optimizer`.
pub fn minimize_bounded<F>(
    f: F,
    lower: f64,
    upper: f64,
    xtol: f64,
    max_iterations: usize,
) -> SxResult<BoundedMinimum>
where
    F: Fn(f64) -> f64,
{
    let solver = BrentOpt::new(lower, upper).set_tolerance(f64::EPSILON.sqrt(), xtol);
    let res = Executor::new(ScalarObjective { f }, solver)
        .configure(|state| state.max_iters(max_iterations as u64))
        .run()?;
    let state = res.state();
    let x = state
        .get_best_param()
        .copied()
        .ok_or_else(|| SxError::Optimizer("no iterate was evaluated".to_string()))?;
    let converged = matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    let evaluations = state
        .get_func_counts()
        .get("cost_count")
        .copied()
        .unwrap_or(0) as usize;
    Ok(BoundedMinimum {
        x,
        fx: state.get_best_cost(),
        evaluations,
        converged,
    })
}

/// the volume fraction found by [`solve_volume_fraction`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub volume_fraction: f64,
    pub target_ratio: f64,
    pub achieved_ratio: f64,
    pub evaluations: usize,
}

/// Finds the extractant volume fraction whose stripping ratio equals the `sr` input.
///
/// Input errors that do not depend on the volume fraction (no feed, zero or negative
/// O/A, no extraction stage) are returned as they are.
/// Returns `SxError::Convergence` when the search does not close its bracket within
/// the iteration budget or when the best point misses the target by more than
/// `optimizer.ratio_tolerance` (a target outside what `[lower, upper]` can reach).
pub fn solve_volume_fraction(
    inputs: &ProcessInputs,
    counts: StageCounts,
    settings: &SolverSettings,
) -> SxResult<OperatingPoint> {
    let opt = &settings.optimizer;
    check_plant_inputs(inputs, counts, &settings.defaults)?;
    let target = inputs.target_stripping_ratio(&settings.defaults);
    let objective = |v: f64| match run_simulation(inputs, v, counts, settings) {
        Ok(res) => (res.stripping_ratio - target).powi(2),
        Err(_) => opt.failure_penalty,
    };
    let min = minimize_bounded(objective, opt.lower, opt.upper, opt.tolerance, opt.max_iterations)?;

    let achieved = match run_simulation(inputs, min.x, counts, settings) {
        Ok(res) => res.stripping_ratio,
        Err(e) => {
            warn!("simulation failed at the optimizer's best point: {}", e);
            f64::NAN
        }
    };
    if !min.converged || !((achieved - target).abs() <= opt.ratio_tolerance) {
        warn!(
            "v/v% search failed: target SR {:.3}%, best SR {:.3}% at v/v {:.4} ({} evaluations, bracket closed: {})",
            target, achieved, min.x, min.evaluations, min.converged
        );
        return Err(SxError::Convergence {
            target,
            achieved,
            evaluations: min.evaluations,
        });
    }
    info!(
        "v/v% = {:.4} gives SR {:.4}% (target {:.4}%) after {} evaluations",
        min.x, achieved, target, min.evaluations
    );
    Ok(OperatingPoint {
        volume_fraction: min.x,
        target_ratio: target,
        achieved_ratio: achieved,
        evaluations: min.evaluations,
    })
}
