//! # Request Module
//!
//! ## Purpose
//! Turns the inbound JSON document into the three things a run needs: the flat
//! parameter map, the scenario code and the operation mode.
//!
//! ## Format
//! ```json
//! {
//!   "inputs": { "plsCu": 4.0, "oaRatio": "1.0", "mef1e": 95, "v_v": null },
//!   "scenario": "C",
//!   "option": "1"
//! }
//! ```
//! Input values may be numbers or numeric strings; `null` entries are dropped.
//! `"option": "1"` (exactly that string) asks for the volume fraction that meets the
//! target stripping ratio; anything else, the number `1` included, analyzes the plant
//! at the given `v_v`.
use crate::errors::{SxError, SxResult};
use crate::process_inputs::ProcessInputs;
use log::info;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// find v/v% for the target stripping ratio `sr`
    SolveVolumeFraction,
    /// run at the explicit `v_v`
    Analyze,
}

impl OperationMode {
    pub fn from_option(option: Option<&Value>) -> Self {
        // only the exact string "1" selects the search; a bare number 1 analyzes
        if matches!(option, Some(Value::String(s)) if s == "1") {
            OperationMode::SolveVolumeFraction
        } else {
            OperationMode::Analyze
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    inputs: Option<Map<String, Value>>,
    #[serde(default)]
    scenario: Option<Value>,
    #[serde(default)]
    option: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub inputs: ProcessInputs,
    pub scenario: String,
    pub mode: OperationMode,
}

fn coerce_number(key: &str, value: &Value) -> SxResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| SxError::InvalidInput(format!("'{}' is not a valid number", key))),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            SxError::InvalidInput(format!("'{}' is not a valid number: \"{}\"", key, s))
        }),
        other => Err(SxError::InvalidInput(format!(
            "'{}' must be a number, got {}",
            key, other
        ))),
    }
}

impl SimulationRequest {
    pub fn new(inputs: ProcessInputs, scenario: &str, mode: OperationMode) -> Self {
        Self {
            inputs,
            scenario: scenario.to_string(),
            mode,
        }
    }

    pub fn from_json(json: &str) -> SxResult<Self> {
        let raw: RawRequest = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SxResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        info!("request loaded from {}", path.as_ref().display());
        Self::from_json(&text)
    }

    fn from_raw(raw: RawRequest) -> SxResult<Self> {
        let mut values = HashMap::new();
        for (key, value) in raw.inputs.unwrap_or_default().iter() {
            if let Some(x) = coerce_number(key, value)? {
                values.insert(key.clone(), x);
            }
        }
        // a scenario that is missing or not a string is reported like an unknown code
        let scenario = match raw.scenario {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Ok(Self {
            inputs: ProcessInputs::from_map(values),
            scenario,
            mode: OperationMode::from_option(raw.option.as_ref()),
        })
    }
}
