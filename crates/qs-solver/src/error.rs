//! Error types for solver operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionState;

/// Errors raised by a solver session or its engine.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("{operation} is not allowed while the session is {state}")]
    OutOfOrder {
        operation: &'static str,
        state: SessionState,
    },

    #[error("Compile failed for {}: {message}", path.display())]
    Compile { path: PathBuf, message: String },

    #[error("Solve failed at step {step}: {message}")]
    Solve { step: usize, message: String },

    #[error("All {steps} steps of the window have already been solved")]
    WindowExhausted { steps: usize },

    #[error("Command '{command}' rejected: {message}")]
    Command { command: String, message: String },

    #[error("Query for '{entity}' failed: {message}")]
    Query { entity: String, message: String },

    #[error("Malformed solver response: {what}")]
    Protocol { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;
