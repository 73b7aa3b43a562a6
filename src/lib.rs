//! # SimSX
//!
//! Steady-state digital twin of a copper solvent extraction (SX) plant: counter-current
//! mixer-settler extraction stages, a stripping section reduced to per-stage factors,
//! the extractant dosing (v/v%) that meets a target stripping ratio and a sensitivity
//! screen that turns into operator recommendations.
//!
//! - [`Circuit`]: isotherm, single-stage equilibrium and the counter-current cascade
//! - [`Simulation`]: one steady state, v/v% search, sensitivity, scenario catalog
//! - [`api`]: JSON request in, response document (or a single error) out
#[allow(non_snake_case)]
pub mod Circuit;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Simulation;
#[allow(non_snake_case)]
pub mod Utils;
pub mod api;
pub mod cli;
pub mod errors;
pub mod process_inputs;
pub mod settings;
