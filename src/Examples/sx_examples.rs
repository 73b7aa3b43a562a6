use crate::Circuit::cascade::BackwardPassKind;
use crate::Simulation::operating_point::solve_volume_fraction;
use crate::Simulation::orchestrator::{run_simulation, run_simulation_with_profile};
use crate::Simulation::scenarios::{SCENARIOS, StageCounts, stage_counts};
use crate::Simulation::sensitivity::analyze_sensitivity;
use crate::Utils::report::{SimulationResponse, stage_profile_table};
use crate::api::run_request;
use crate::process_inputs::ProcessInputs;
use crate::settings::SolverSettings;

fn base_plant() -> ProcessInputs {
    ProcessInputs::new()
        .with("plsCu", 4.0)
        .with("oaRatio", 1.0)
        .with("mef1e", 95.0)
        .with("mef2e", 95.0)
        .with("mef3e", 95.0)
        .with("mef4e", 95.0)
        .with("mef1s", 95.0)
        .with("mef2s", 95.0)
}

pub fn sx_examples(task: usize) {
    let settings = SolverSettings::default();
    match task {
        0 => {
            // ONE STEADY STATE: scenario C (1 strip + 3 extraction stages) at 20 %v/v
            let inputs = base_plant().with("sr", 35.0);
            let counts = StageCounts::new(1, 3);
            match run_simulation_with_profile(&inputs, 20.0, counts, &settings) {
                Ok((result, circuit)) => {
                    let recs = analyze_sensitivity(&inputs, &result, 20.0, counts, &settings);
                    SimulationResponse::success(&result, false, recs).print_tables();
                    stage_profile_table(&circuit).printstd();
                    println!(
                        "passes: {}, last pass change {:e}, balance error {:e}",
                        circuit.passes, circuit.pass_change, circuit.balance_error
                    );
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        1 => {
            // EXTRACTANT DOSING: v/v% needed for a range of target stripping ratios
            let counts = StageCounts::new(1, 3);
            for target in [30.0, 40.0, 50.0, 60.0, 85.0] {
                let inputs = base_plant().with("sr", target);
                match solve_volume_fraction(&inputs, counts, &settings) {
                    Ok(point) => println!(
                        "target SR {:>5.1}% -> v/v {:>7.3}% (SR {:.4}%, {} evaluations)",
                        target, point.volume_fraction, point.achieved_ratio, point.evaluations
                    ),
                    Err(e) => println!("target SR {:>5.1}% -> {}", target, e.user_message()),
                }
            }
        }
        2 => {
            // BLENDED FEED: three heaps of different grade through the same request API
            let request = r#"{
                "inputs": {
                    "plsCu1": 5.2, "plsFlow1": 120,
                    "plsCu2": "3.1", "plsFlow2": 80,
                    "plsCu3": 1.4, "plsFlow3": 40,
                    "plsCu4": null,
                    "oaRatio": 1.1, "oaRatioStrip": 1.0,
                    "mef1e": 93, "mef2e": 95, "mef1s": 97, "mef2s": 97,
                    "sr": 45, "v_v": 18
                },
                "scenario": "B",
                "option": "0"
            }"#;
            let response = run_request(request, &settings);
            match response.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => println!("Error: {}", e),
            }
        }
        3 => {
            // STAGE COUNTS: extraction recovery over the scenario catalog at 20 %v/v
            let inputs = base_plant().with("sr", 35.0);
            for (code, _) in SCENARIOS.iter() {
                let Ok(counts) = stage_counts(code) else {
                    continue;
                };
                match run_simulation(&inputs, 20.0, counts, &settings) {
                    Ok(res) => println!(
                        "{}: {} strip / {} extraction -> recovery {:.2}%, raffinate {:.3} g/L",
                        code, counts.strip, counts.extraction, res.extraction_recovery, res.raffinate_cu
                    ),
                    Err(e) => println!("{}: {}", code, e),
                }
            }
        }
        4 => {
            // BACKWARD SWEEPS: both variants converge to the same steady state
            let inputs = base_plant();
            let counts = StageCounts::new(1, 3);
            for kind in [BackwardPassKind::StageResolve, BackwardPassKind::ClosedForm] {
                for passes in [5, 20, 60] {
                    let mut s = settings;
                    s.circuit.backward_pass = kind;
                    s.circuit.outer_passes = passes;
                    match run_simulation(&inputs, 20.0, counts, &s) {
                        Ok(res) => println!(
                            "{:?}, {:>2} passes: raffinate {:.10} g/L, ML {:.10} g/L",
                            kind, passes, res.raffinate_cu, res.loaded_organic_cu
                        ),
                        Err(e) => println!("{:?}: {}", kind, e),
                    }
                }
            }
        }
        _ => println!("no example {}", task),
    }
}
