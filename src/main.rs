use SimSX::Utils::logger::init_logger;
use SimSX::cli::cli_main::{CliOptions, load_settings, run_interactive_menu, run_request_file};
use clap::Parser;
use std::process::ExitCode;

pub fn main() -> ExitCode {
    let opts = CliOptions::parse();
    if let Err(e) = init_logger(opts.level(), opts.log_file.as_deref()) {
        eprintln!("cannot open log file: {}", e);
        return ExitCode::from(2);
    }
    let settings = match load_settings(&opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("invalid settings: {}", e);
            return ExitCode::from(2);
        }
    };
    match &opts.request {
        Some(path) => {
            if run_request_file(path, &settings, opts.json, opts.profile) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        None => {
            run_interactive_menu(&settings);
            ExitCode::SUCCESS
        }
    }
}
