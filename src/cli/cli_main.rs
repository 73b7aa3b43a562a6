use super::cli_examples::examples_menu;
use super::cli_plant::plant_menu;
use crate::Simulation::scenarios::SCENARIOS;
use crate::Utils::logger::parse_level;
use crate::Utils::report::{SimulationResponse, stage_profile_table};
use crate::Utils::request::SimulationRequest;
use crate::api::simulate;
use crate::settings::SolverSettings;
use clap::Parser;
use log::{LevelFilter, error};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Steady-state digital twin of a copper solvent extraction plant
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "SimSX")]
#[command(about = "Runs an SX plant request file, or opens the interactive menu when none is given")]
pub struct CliOptions {
    /// Request JSON: {"inputs": {...}, "scenario": "C", "option": "1"}
    pub request: Option<PathBuf>,

    /// Solver settings JSON (defaults are used when absent)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Print the response document as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Also print the per-stage concentration profile
    #[arg(long)]
    pub profile: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Copy every log record into this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliOptions {
    pub fn level(&self) -> LevelFilter {
        parse_level(&self.log_level)
    }
}

/// Settings from `--settings` when given, built-in defaults otherwise.
pub fn load_settings(opts: &CliOptions) -> Result<SolverSettings, String> {
    let settings = match &opts.settings {
        Some(path) => SolverSettings::load(path).map_err(|e| e.to_string())?,
        None => SolverSettings::default(),
    };
    settings.validate().map_err(|e| e.to_string())?;
    Ok(settings)
}

/// Runs one request file and prints the response. Returns `false` if the response
/// carries an error.
pub fn run_request_file(path: &Path, settings: &SolverSettings, json: bool, profile: bool) -> bool {
    let request = match SimulationRequest::from_file(path) {
        Ok(r) => r,
        Err(e) => {
            error!("cannot read request {}: {}", path.display(), e);
            return print_response(&SimulationResponse::failure(&e), json);
        }
    };
    match simulate(&request, settings) {
        Ok(outcome) => {
            let ok = print_response(&outcome.response(), json);
            if profile && !json {
                stage_profile_table(&outcome.circuit).printstd();
            }
            ok
        }
        Err(e) => {
            error!("simulation request failed: {}", e);
            print_response(&SimulationResponse::failure(&e), json)
        }
    }
}

fn print_response(response: &SimulationResponse, json: bool) -> bool {
    if json {
        match response.to_json() {
            Ok(text) => println!("{}", text),
            Err(e) => println!("{{\"error\": \"{}\"}}", e),
        }
    } else {
        response.print_tables();
    }
    !response.is_error()
}

pub fn print_scenario_catalog() {
    use prettytable::{Cell, Row, Table, row};
    let mut table = Table::new();
    table.add_row(row!["Scenario", "Stripping stages", "Extraction stages"]);
    for (code, counts) in SCENARIOS.iter() {
        table.add_row(Row::new(vec![
            Cell::new(code),
            Cell::new(&counts.strip.to_string()),
            Cell::new(&counts.extraction.to_string()),
        ]));
    }
    table.printstd();
}

pub fn run_interactive_menu(settings: &SolverSettings) {
    loop {
        show_main_menu();
        let Some(choice) = get_user_input() else {
            break;
        };

        match choice.trim() {
            "1" => {
                print!("Request file: ");
                flush();
                let Some(path) = get_user_input() else {
                    break;
                };
                run_request_file(&PathBuf::from(path.trim()), settings, false, true);
            }
            "2" => plant_menu(settings),
            "3" => examples_menu(),
            "4" => print_scenario_catalog(),
            "5" => {
                print!("Save settings to: ");
                flush();
                let Some(path) = get_user_input() else {
                    break;
                };
                match settings.save(path.trim()) {
                    Ok(()) => println!("Settings saved."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

fn show_main_menu() {
    println!("\x1b[34m\n SimSX: steady-state digital twin of a copper solvent extraction plant \n\x1b[0m");
    println!("\x1b[33m1. Run a request file\x1b[0m");
    println!("\x1b[33m2. Enter a plant configuration\x1b[0m");
    println!("\x1b[33m3. Examples\x1b[0m");
    println!("\x1b[33m4. Scenario catalog\x1b[0m");
    println!("\x1b[33m5. Save current settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    flush();
}

pub(crate) fn flush() {
    let _ = io::stdout().flush();
}

/// One line from `reader`; `None` at end of input or on a read error.
pub(crate) fn read_line_from<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

/// one line from stdin; `None` once stdin is closed
pub(crate) fn get_user_input() -> Option<String> {
    read_line_from(&mut io::stdin().lock())
}
