use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;

use crate::errors::SxResult;

/// Installs the global logger: colored terminal output and, when `log_file` is given,
/// a plain copy of every record in that file.
///
/// Returns `Ok(false)` when a logger was already installed (tests, embedding hosts).
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> SxResult<bool> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}

/// `"debug"`, `"info"`, ... as accepted by `--log-level`; unknown names fall back to info
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::Info)
}
