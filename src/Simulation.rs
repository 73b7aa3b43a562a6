//! # Simulation Module
//!
//! Plant-level calculations built on top of the extraction cascade:
//! - [`orchestrator`]: one steady-state run at a given extractant volume fraction
//!   (stripping pre-processing, cascade solve, recovery metrics);
//! - [`operating_point`]: inverts the run for the volume fraction giving a target
//!   stripping ratio;
//! - [`sensitivity`]: reruns with perturbed inputs and turns the response into
//!   recommendations;
//! - [`scenarios`]: static catalog of circuit configurations.
//!
//! ```rust,ignore
//! use SimSX::Simulation::orchestrator::run_simulation;
//! use SimSX::Simulation::scenarios::stage_counts;
//! use SimSX::process_inputs::ProcessInputs;
//! use SimSX::settings::SolverSettings;
//!
//! let inputs = ProcessInputs::new().with("plsCu", 4.0).with("oaRatio", 1.0);
//! let counts = stage_counts("C")?;
//! let result = run_simulation(&inputs, 20.0, counts, &SolverSettings::default())?;
//! println!("extraction recovery {:.2}%", result.extraction_recovery);
//! ```

pub mod operating_point;
pub mod orchestrator;
pub mod scenarios;
pub mod sensitivity;
mod simulation_tests;
