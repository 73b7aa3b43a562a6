//! Static catalog of plant configurations: scenario letter -> (stripping, extraction) stages.
use crate::errors::{SxError, SxResult};
use serde::{Deserialize, Serialize};

/// number of mixer-settler stages in each section of the plant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub strip: usize,
    pub extraction: usize,
}

impl StageCounts {
    pub const fn new(strip: usize, extraction: usize) -> Self {
        Self { strip, extraction }
    }
}

pub const SCENARIOS: [(&str, StageCounts); 18] = [
    ("A", StageCounts::new(1, 2)),
    ("B", StageCounts::new(2, 2)),
    ("C", StageCounts::new(1, 3)),
    ("D", StageCounts::new(2, 3)),
    ("E", StageCounts::new(1, 3)),
    ("F", StageCounts::new(2, 3)),
    ("G", StageCounts::new(1, 3)),
    ("H", StageCounts::new(2, 3)),
    ("I", StageCounts::new(1, 3)),
    ("J", StageCounts::new(2, 3)),
    ("K", StageCounts::new(1, 4)),
    ("L", StageCounts::new(2, 4)),
    ("M", StageCounts::new(1, 4)),
    ("N", StageCounts::new(2, 4)),
    ("O", StageCounts::new(1, 4)),
    ("P", StageCounts::new(2, 4)),
    ("Q", StageCounts::new(1, 4)),
    ("R", StageCounts::new(2, 4)),
];

pub fn stage_counts(code: &str) -> SxResult<StageCounts> {
    let code = code.trim();
    SCENARIOS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, counts)| *counts)
        .ok_or_else(|| SxError::UnknownScenario(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(stage_counts("A").unwrap(), StageCounts::new(1, 2));
        assert_eq!(stage_counts("C").unwrap(), StageCounts::new(1, 3));
        assert_eq!(stage_counts(" R ").unwrap(), StageCounts::new(2, 4));
    }

    #[test]
    fn test_unknown_scenario() {
        assert!(matches!(stage_counts("Z"), Err(SxError::UnknownScenario(c)) if c == "Z"));
        assert!(stage_counts("").is_err());
    }

    #[test]
    fn test_catalog_shape() {
        for (code, counts) in SCENARIOS.iter() {
            assert_eq!(code.len(), 1);
            assert!((1..=2).contains(&counts.strip));
            assert!((2..=4).contains(&counts.extraction));
        }
    }
}
