//! Counter-current extraction cascade.
//!
//! The cascade is converged by alternating sweeps over a fixed number of passes:
//! - the forward sweep walks the organic from stage 0 to stage N-1, solving every stage
//!   with the aqueous inlet profile of the previous backward sweep (on the very first
//!   pass, a co-current running estimate that starts from the blended feed);
//! - the backward sweep walks the aqueous from the feed stage N-1 to stage 0, computing
//!   every aqueous inlet as `feed - sum(transfer of stages i+1..N-1) / (O/A)` and
//!   producing the raffinate.
//!
//! Two backward sweeps are available. `StageResolve` solves each stage again on its
//! recomputed inlet and takes the raffinate from stage 0; `ClosedForm` takes it
//! directly from the overall copper balance. Both reach the same raffinate once the
//! organic profile stops moving; with few passes `StageResolve` keeps the raffinate in
//! local equilibrium with stage 0 and is the default.
use super::stage::{StageSolution, solve_stage};
use crate::process_inputs::{FeedStream, ProcessInputs, StageRole};
use crate::settings::{SolverSettings, StageSettings};
use enum_dispatch::enum_dispatch;
use log::debug;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// which backward sweep the cascade uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackwardPassKind {
    #[default]
    StageResolve,
    ClosedForm,
}

/// Flow-weighted copper concentration of the PLS streams with positive flow.
/// Returns 0 when no stream carries flow.
pub fn blend_feed(streams: &[FeedStream]) -> f64 {
    let (copper, flow) = streams
        .iter()
        .filter(|s| s.flow > 0.0)
        .fold((0.0, 0.0), |(c, f), s| (c + s.cu * s.flow, f + s.flow));
    if flow > 0.0 { copper / flow } else { 0.0 }
}

/// Constants of one cascade solve shared by both sweeps.
#[derive(Debug, Clone)]
pub struct Cascade {
    pub avg_feed_cu: f64,
    pub stripped_organic_cu: f64,
    pub max_loading: f64,
    pub oa_ratio: f64,
    /// mixer efficiency of every stage, %
    pub efficiencies: DVector<f64>,
    pub stage_settings: StageSettings,
}

impl Cascade {
    pub fn num_stages(&self) -> usize {
        self.efficiencies.len()
    }

    /// organic entering stage `i`
    pub fn organic_in(&self, i: usize, organic_out: &DVector<f64>) -> f64 {
        if i == 0 {
            self.stripped_organic_cu
        } else {
            organic_out[i - 1]
        }
    }

    /// aqueous-equivalent copper picked up by the organic in stage `i`
    pub fn transfer(&self, i: usize, organic_out: &DVector<f64>) -> f64 {
        (organic_out[i] - self.organic_in(i, organic_out)) / self.oa_ratio
    }

    pub fn stage(&self, i: usize, aqueous_in: f64, organic_in: f64) -> StageSolution {
        solve_stage(
            aqueous_in,
            organic_in,
            self.max_loading,
            self.oa_ratio,
            self.efficiencies[i],
            &self.stage_settings,
        )
    }
}

/// Buffers written by one backward sweep; separate from the organic profile read by it.
#[derive(Debug, Clone)]
pub struct AqueousProfile {
    pub aqueous_in: DVector<f64>,
    pub aqueous_out: DVector<f64>,
}

impl AqueousProfile {
    pub fn new(n: usize, feed: f64) -> Self {
        Self {
            aqueous_in: DVector::from_element(n, feed),
            aqueous_out: DVector::from_element(n, feed),
        }
    }
}

#[enum_dispatch]
pub trait BackwardSweep {
    /// Recomputes the aqueous profile from the organic outlets and returns the raffinate.
    fn sweep(
        &self,
        cascade: &Cascade,
        organic_out: &DVector<f64>,
        profile: &mut AqueousProfile,
        stats: &mut StageStats,
    ) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StageResolve;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedForm;

impl BackwardSweep for StageResolve {
    fn sweep(
        &self,
        cascade: &Cascade,
        organic_out: &DVector<f64>,
        profile: &mut AqueousProfile,
        stats: &mut StageStats,
    ) -> f64 {
        let mut transferred_above = 0.0;
        let mut raffinate = cascade.avg_feed_cu;
        for i in (0..cascade.num_stages()).rev() {
            let aq_in = (cascade.avg_feed_cu - transferred_above).max(0.0);
            profile.aqueous_in[i] = aq_in;
            transferred_above += cascade.transfer(i, organic_out);
            let sol = cascade.stage(i, aq_in, cascade.organic_in(i, organic_out));
            stats.record(&sol);
            profile.aqueous_out[i] = sol.aqueous_out;
            raffinate = sol.aqueous_out;
        }
        raffinate
    }
}

impl BackwardSweep for ClosedForm {
    fn sweep(
        &self,
        cascade: &Cascade,
        organic_out: &DVector<f64>,
        profile: &mut AqueousProfile,
        _stats: &mut StageStats,
    ) -> f64 {
        let mut transferred_above = 0.0;
        for i in (0..cascade.num_stages()).rev() {
            profile.aqueous_in[i] = (cascade.avg_feed_cu - transferred_above).max(0.0);
            transferred_above += cascade.transfer(i, organic_out);
            profile.aqueous_out[i] = (cascade.avg_feed_cu - transferred_above).max(0.0);
        }
        (cascade.avg_feed_cu - transferred_above).max(0.0)
    }
}

#[enum_dispatch(BackwardSweep)]
#[derive(Debug, Clone, Copy)]
pub enum BackwardPass {
    StageResolve,
    ClosedForm,
}

impl From<BackwardPassKind> for BackwardPass {
    fn from(kind: BackwardPassKind) -> Self {
        match kind {
            BackwardPassKind::StageResolve => BackwardPass::StageResolve(StageResolve),
            BackwardPassKind::ClosedForm => BackwardPass::ClosedForm(ClosedForm),
        }
    }
}

/// how well the stage solves inside one cascade solve converged
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageStats {
    pub solves: usize,
    pub unconverged: usize,
    pub max_iterations: usize,
    pub max_residual: f64,
}

impl StageStats {
    fn record(&mut self, sol: &StageSolution) {
        self.solves += 1;
        if !sol.converged {
            self.unconverged += 1;
        }
        self.max_iterations = self.max_iterations.max(sol.iterations);
        self.max_residual = self.max_residual.max(sol.residual);
    }
}

#[derive(Debug, Clone)]
pub struct CircuitResult {
    pub raffinate_cu: f64,
    /// organic outlet of the last stage (ML)
    pub loaded_organic_cu: f64,
    pub avg_feed_cu: f64,
    pub organic_out: DVector<f64>,
    pub aqueous_in: DVector<f64>,
    pub aqueous_out: DVector<f64>,
    pub passes: usize,
    /// max change of raffinate and loaded organic over the last pass
    pub pass_change: f64,
    /// `(feed - raffinate) - (ML - stripped) / (O/A)`, zero at a balanced steady state
    pub balance_error: f64,
    pub stage_stats: StageStats,
}

/// Converges an extraction cascade of `num_stages` stages.
///
/// Mixer efficiencies are read from `mef{i}e` (stage numbers start at 1) and the feed
/// is the flow-weighted blend of the PLS streams. Never fails; a zero-stage cascade
/// passes both streams through.
pub fn solve_circuit(
    inputs: &ProcessInputs,
    stripped_organic_cu: f64,
    max_loading: f64,
    oa_ratio_extraction: f64,
    num_stages: usize,
    settings: &SolverSettings,
) -> CircuitResult {
    let avg_feed_cu = blend_feed(&inputs.feed_streams());
    let cascade = Cascade {
        avg_feed_cu,
        stripped_organic_cu,
        max_loading,
        oa_ratio: oa_ratio_extraction,
        efficiencies: DVector::from_fn(num_stages, |i, _| {
            inputs.efficiency(i + 1, StageRole::Extraction, &settings.defaults)
        }),
        stage_settings: settings.stage,
    };
    let backward: BackwardPass = settings.circuit.backward_pass.into();

    let mut organic_out = DVector::from_element(num_stages, stripped_organic_cu);
    let mut profile = AqueousProfile::new(num_stages, avg_feed_cu);
    let mut stats = StageStats::default();
    let mut raffinate = avg_feed_cu;
    let mut pass_change = 0.0;
    let mut passes = 0;

    if num_stages > 0 {
        for pass in 0..settings.circuit.outer_passes {
            let previous = (raffinate, organic_out[num_stages - 1]);
            // forward sweep along the organic flow
            let mut running_aq = avg_feed_cu;
            for i in 0..num_stages {
                let org_in = cascade.organic_in(i, &organic_out);
                let aq_in = if pass == 0 {
                    running_aq
                } else {
                    profile.aqueous_in[i]
                };
                let sol = cascade.stage(i, aq_in, org_in);
                stats.record(&sol);
                organic_out[i] = sol.organic_out;
                running_aq = (running_aq - cascade.transfer(i, &organic_out)).max(0.0);
            }
            // backward sweep along the aqueous flow
            raffinate = backward.sweep(&cascade, &organic_out, &mut profile, &mut stats);
            passes = pass + 1;
            // the first pass is measured against the unconverged start (feed, stripped organic)
            pass_change = (raffinate - previous.0)
                .abs()
                .max((organic_out[num_stages - 1] - previous.1).abs());
            debug!(
                "cascade pass {}: raffinate={:.6}, loaded organic={:.6}",
                passes,
                raffinate,
                organic_out[num_stages - 1]
            );
        }
    }

    let loaded_organic_cu = if num_stages > 0 {
        organic_out[num_stages - 1]
    } else {
        stripped_organic_cu
    };
    let balance_error =
        (avg_feed_cu - raffinate) - (loaded_organic_cu - stripped_organic_cu) / oa_ratio_extraction;

    CircuitResult {
        raffinate_cu: raffinate,
        loaded_organic_cu,
        avg_feed_cu,
        organic_out,
        aqueous_in: profile.aqueous_in,
        aqueous_out: profile.aqueous_out,
        passes,
        pass_change,
        balance_error,
        stage_stats: stats,
    }
}
