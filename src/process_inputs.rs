//! # Process Inputs
//!
//! Typed view over the flat `key -> value` mapping that describes one operating
//! scenario of the SX plant.
//!
//! | Key | Meaning | Default |
//! |-----|---------|---------|
//! | `plsCu` | copper in the primary PLS, g/L | 0 |
//! | `plsCu1`..`plsCu4` | copper in PLS stream i, g/L | `plsCu` |
//! | `plsFlow1`..`plsFlow4` | flow of PLS stream i | 0 |
//! | `mef{i}e` / `mef{i}s` | mixer efficiency of extraction / stripping stage i, % | 95 |
//! | `oaRatio` / `oaRatioStrip` | O/A ratio of extraction / stripping | 1.0 |
//! | `sr` | target stripping ratio, % | 85 |
//! | `v_v` | extractant volume fraction for analysis mode, %v/v | - |
//!
//! The mapping is never edited by the solvers: perturbed scenarios are built with
//! [`ProcessInputs::scaled`], which returns a copy.
use crate::settings::InputDefaults;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const PLS_CU: &str = "plsCu";
pub const PLS_FLOW: &str = "plsFlow";
pub const OA_RATIO: &str = "oaRatio";
pub const OA_RATIO_STRIP: &str = "oaRatioStrip";
pub const TARGET_SR: &str = "sr";
pub const VOLUME_FRACTION: &str = "v_v";
/// number of PLS streams that may be blended into the extraction feed
pub const MAX_FEED_STREAMS: usize = 4;

/// role of a mixer-settler stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRole {
    Extraction,
    Stripping,
}

impl StageRole {
    fn suffix(&self) -> char {
        match self {
            StageRole::Extraction => 'e',
            StageRole::Stripping => 's',
        }
    }
}

/// efficiency key of stage `stage_number` (1-based)
pub fn efficiency_key(stage_number: usize, role: StageRole) -> String {
    format!("mef{}{}", stage_number, role.suffix())
}

pub fn pls_cu_key(stream: usize) -> String {
    format!("{}{}", PLS_CU, stream)
}

pub fn pls_flow_key(stream: usize) -> String {
    format!("{}{}", PLS_FLOW, stream)
}

fn key_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"^plsCu[1-4]?$",
            r"^plsFlow[1-4]$",
            r"^mef[1-9][0-9]*[es]$",
            r"^oaRatio(Strip)?$",
            r"^sr$",
            r"^v_v$",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// true if `key` is one of the parameters the model understands
pub fn is_known_key(key: &str) -> bool {
    key_patterns().iter().any(|re| re.is_match(key))
}

/// one PLS stream entering the extraction circuit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedStream {
    /// copper concentration, g/L
    pub cu: f64,
    pub flow: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessInputs {
    values: HashMap<String, f64>,
}

impl ProcessInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a flat mapping; keys the model does not know are reported and kept.
    pub fn from_map(values: HashMap<String, f64>) -> Self {
        let inputs = Self { values };
        for key in inputs.unrecognized_keys() {
            warn!("input key '{}' is not used by the SX model", key);
        }
        inputs
    }

    /// builder-style setter
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// keys sorted alphabetically, for stable printing
    pub fn sorted_entries(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.values.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn unrecognized_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .keys()
            .filter(|k| !is_known_key(k))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Copy of the inputs with `key` multiplied by `factor`. A missing key stays missing.
    pub fn scaled(&self, key: &str, factor: f64) -> ProcessInputs {
        let mut copy = self.clone();
        if let Some(v) = copy.values.get_mut(key) {
            *v *= factor;
        }
        copy
    }

    /// PLS streams 1..4. When no stream has a nonzero flow the primary `plsCu`
    /// is returned as a single stream of unit flow.
    pub fn feed_streams(&self) -> Vec<FeedStream> {
        let primary = self.get_or(PLS_CU, 0.0);
        let streams: Vec<FeedStream> = (1..=MAX_FEED_STREAMS)
            .map(|i| FeedStream {
                cu: self.get_or(&pls_cu_key(i), primary),
                flow: self.get_or(&pls_flow_key(i), 0.0),
            })
            .collect();
        if streams.iter().all(|s| s.flow == 0.0) {
            return vec![FeedStream {
                cu: primary,
                flow: 1.0,
            }];
        }
        streams
    }

    /// mixer efficiency (%) of 1-based stage `stage_number`
    pub fn efficiency(&self, stage_number: usize, role: StageRole, defaults: &InputDefaults) -> f64 {
        self.get_or(&efficiency_key(stage_number, role), defaults.efficiency_pct)
    }

    pub fn oa_ratio(&self, defaults: &InputDefaults) -> f64 {
        self.get_or(OA_RATIO, defaults.oa_ratio)
    }

    pub fn oa_ratio_strip(&self, defaults: &InputDefaults) -> f64 {
        self.get_or(OA_RATIO_STRIP, defaults.oa_ratio)
    }

    pub fn target_stripping_ratio(&self, defaults: &InputDefaults) -> f64 {
        self.get_or(TARGET_SR, defaults.target_stripping_ratio)
    }

    /// explicit v/v% for analysis mode
    pub fn volume_fraction(&self) -> Option<f64> {
        self.get(VOLUME_FRACTION)
    }
}

impl From<HashMap<String, f64>> for ProcessInputs {
    fn from(values: HashMap<String, f64>) -> Self {
        Self::from_map(values)
    }
}
