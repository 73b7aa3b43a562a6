use super::cli_main::{flush, get_user_input};
use crate::Simulation::scenarios::stage_counts;
use crate::Utils::report::stage_profile_table;
use crate::Utils::request::{OperationMode, SimulationRequest};
use crate::api::simulate;
use crate::process_inputs::{
    OA_RATIO, PLS_CU, ProcessInputs, StageRole, TARGET_SR, VOLUME_FRACTION, efficiency_key,
};
use crate::settings::SolverSettings;

pub fn plant_menu(settings: &SolverSettings) {
    loop {
        println!("\n=== SX plant ===");
        println!("1. Enter and run a plant configuration");
        println!("2. Back to main menu");
        print!("Choose option: ");
        flush();

        let Some(choice) = get_user_input() else {
            break;
        };
        match choice.trim() {
            "1" => {
                if let Err(e) = run_plant(settings) {
                    println!("Error: {}", e);
                }
            }
            "2" => break,
            _ => println!("Invalid option"),
        }
    }
}

fn run_plant(settings: &SolverSettings) -> Result<(), String> {
    // Step 1: plant layout
    let scenario = ask_text("Scenario code (A-R)")?;
    let counts = stage_counts(&scenario).map_err(|e| e.user_message())?;

    // Step 2: what to compute
    let mode = match ask_text("1 = find v/v% for a target stripping ratio, 2 = analyze at a given v/v%")?.as_str() {
        "1" => OperationMode::SolveVolumeFraction,
        "2" => OperationMode::Analyze,
        other => return Err(format!("unknown mode '{}'", other)),
    };

    // Step 3: operating data
    let mut inputs = ProcessInputs::new()
        .with(PLS_CU, ask_number("PLS copper, g/L")?)
        .with(OA_RATIO, ask_number("extraction O/A ratio")?);
    let efficiency = ask_number("mixer efficiency of every stage, %")?;
    for i in 1..=counts.extraction {
        inputs.set(&efficiency_key(i, StageRole::Extraction), efficiency);
    }
    for i in 1..=counts.strip {
        inputs.set(&efficiency_key(i, StageRole::Stripping), efficiency);
    }
    inputs.set(TARGET_SR, ask_number("target stripping ratio, %")?);
    if mode == OperationMode::Analyze {
        inputs.set(VOLUME_FRACTION, ask_number("extractant volume fraction, %v/v")?);
    }

    // Step 4: run and show
    println!("Solving...");
    let request = SimulationRequest::new(inputs, &scenario, mode);
    let outcome = simulate(&request, settings).map_err(|e| e.user_message())?;
    outcome.response().print_tables();
    stage_profile_table(&outcome.circuit).printstd();
    Ok(())
}

fn ask_text(prompt: &str) -> Result<String, String> {
    print!("{}: ", prompt);
    flush();
    let answer = get_user_input()
        .ok_or("input closed")?
        .trim()
        .to_string();
    if answer.is_empty() {
        return Err("no input".to_string());
    }
    Ok(answer)
}

fn ask_number(prompt: &str) -> Result<f64, String> {
    let answer = ask_text(prompt)?;
    answer
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", answer))
}
