//! Error taxonomy of the SX digital twin.
//!
//! Stage and circuit solvers never fail on non-convergence: they return the best
//! iterate they have. Only the simulation orchestrator (bad volume fraction,
//! non-finite arithmetic) and the operating-point solver (optimizer failure) raise,
//! plus the boundary modules that read files and requests.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SxError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Scenario {0} not implemented")]
    UnknownScenario(String),
    #[error(
        "Solver failed to converge: target stripping ratio {target:.3}%, best achieved {achieved:.3}% after {evaluations} evaluations"
    )]
    Convergence {
        target: f64,
        achieved: f64,
        evaluations: usize,
    },
    /// the optimizer itself failed (not a missed target)
    #[error("Optimizer error: {0}")]
    Optimizer(String),
    #[error("Unexpected computation error: {0}")]
    UnexpectedComputation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SxError {
    /// message shown to the end user when the error supersedes a response
    pub fn user_message(&self) -> String {
        match self {
            SxError::InvalidInput(msg) => msg.clone(),
            SxError::UnknownScenario(code) => format!("Scenario {} not implemented", code),
            SxError::Convergence { .. } | SxError::Optimizer(_) => {
                "Solver failed to converge. Please check input parameters.".to_string()
            }
            other => format!("An unexpected error occurred in the simulation backend: {}", other),
        }
    }
}

impl From<argmin::core::Error> for SxError {
    fn from(e: argmin::core::Error) -> Self {
        SxError::Optimizer(e.to_string())
    }
}

pub type SxResult<T> = Result<T, SxError>;
