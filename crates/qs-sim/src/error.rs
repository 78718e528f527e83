//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while driving a run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Solver fault: {0}")]
    Solver(#[from] qs_solver::SolverError),
}

pub type SimResult<T> = Result<T, SimError>;
