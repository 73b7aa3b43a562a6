//! Presentation of a finished run: labeled metrics with display units, isotherm and
//! operating-point samples for plotting, the JSON response document and the tables
//! printed by the CLI.
use crate::Circuit::cascade::CircuitResult;
use crate::Circuit::isotherm::equilibrium_curve;
use crate::Simulation::orchestrator::SimulationResult;
use crate::errors::{SxError, SxResult};
use prettytable::{Cell, Row, Table, row};
use serde::{Deserialize, Serialize};

/// number of isotherm samples in the chart
pub const CHART_POINTS: usize = 30;
/// the chart spans aqueous copper from 0 to this multiple of the blended feed
pub const CHART_SPAN: f64 = 1.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub unit: String,
}

impl Metric {
    fn new(label: &str, value: f64, decimals: usize, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            value: format!("{:.*}", decimals, value),
            unit: unit.to_string(),
        }
    }
}

/// McCabe-Thiele style chart: the isotherm and the two realized operating points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub eq_x: Vec<f64>,
    pub eq_y: Vec<f64>,
    /// raffinate and blended feed, g/L aqueous
    pub op_x: Vec<f64>,
    /// stripped and loaded organic, g/L organic
    pub op_y: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Metric>>,
    #[serde(rename = "chartData", skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Six headline metrics. `optimized` selects the label of the volume fraction row.
pub fn metrics(result: &SimulationResult, optimized: bool) -> Vec<Metric> {
    let vv_label = if optimized {
        "Optimal volume fraction (v/v%)"
    } else {
        "Volume fraction (v/v%)"
    };
    vec![
        Metric::new(vv_label, result.volume_fraction, 2, "%"),
        Metric::new("Max loading capacity (AML)", result.max_loading, 2, "g/L"),
        Metric::new("Loaded organic (ML)", result.loaded_organic_cu, 2, "g/L"),
        Metric::new("Extraction recovery", result.extraction_recovery, 2, "%"),
        Metric::new("Stripping recovery", result.stripping_recovery, 2, "%"),
        Metric::new("Net transfer", result.net_transfer, 3, "g/L/%"),
    ]
}

pub fn chart_data(result: &SimulationResult) -> ChartData {
    let (eq_x, eq_y) = equilibrium_curve(
        result.avg_feed_cu * CHART_SPAN,
        CHART_POINTS,
        result.max_loading,
    );
    ChartData {
        eq_x: eq_x.iter().copied().collect(),
        eq_y: eq_y.iter().copied().collect(),
        op_x: vec![result.raffinate_cu, result.avg_feed_cu],
        op_y: vec![result.stripped_organic_cu, result.loaded_organic_cu],
    }
}

impl SimulationResponse {
    pub fn success(result: &SimulationResult, optimized: bool, recommendations: Vec<String>) -> Self {
        Self {
            results: Some(metrics(result, optimized)),
            chart_data: Some(chart_data(result)),
            recommendations: Some(recommendations),
            error: None,
        }
    }

    /// a response carrying only the error message
    pub fn failure(err: &SxError) -> Self {
        Self {
            error: Some(err.user_message()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn to_json(&self) -> SxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn print_tables(&self) {
        if let Some(error) = &self.error {
            println!("ERROR: {}", error);
            return;
        }
        if let Some(results) = &self.results {
            let mut table = Table::new();
            table.add_row(row!["Metric", "Value", "Unit"]);
            for m in results {
                table.add_row(Row::new(vec![
                    Cell::new(&m.label),
                    Cell::new(&m.value),
                    Cell::new(&m.unit),
                ]));
            }
            table.printstd();
        }
        if let Some(recommendations) = &self.recommendations {
            for r in recommendations {
                println!("- {}", r);
            }
        }
    }
}

/// per-stage concentrations of the converged extraction cascade, feed end last
pub fn stage_profile_table(circuit: &CircuitResult) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Stage", "Aqueous in, g/L", "Aqueous out, g/L", "Organic out, g/L"]);
    for i in 0..circuit.organic_out.len() {
        table.add_row(Row::new(vec![
            Cell::new(&format!("E{}", i + 1)),
            Cell::new(&format!("{:.4}", circuit.aqueous_in[i])),
            Cell::new(&format!("{:.4}", circuit.aqueous_out[i])),
            Cell::new(&format!("{:.4}", circuit.organic_out[i])),
        ]));
    }
    table
}
