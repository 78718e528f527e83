//! Error types for the qs-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives every frontend one fault vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid simulation window: {0}")]
    Window(String),

    #[error("Circuit model not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("Result shape error: {0}")]
    Shape(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for qs-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<qs_core::WindowError> for AppError {
    fn from(err: qs_core::WindowError) -> Self {
        AppError::Window(err.to_string())
    }
}

impl From<qs_core::CoreError> for AppError {
    fn from(err: qs_core::CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<qs_project::ProjectError> for AppError {
    fn from(err: qs_project::ProjectError) -> Self {
        use qs_project::ProjectError;
        match err {
            ProjectError::DirectoryNotFound { path } | ProjectError::ModelFileNotFound { path } => {
                AppError::ModelNotFound { path }
            }
            ProjectError::Scope(e) => AppError::InvalidInput(e.to_string()),
            other => AppError::Configuration(other.to_string()),
        }
    }
}

impl From<qs_solver::SolverError> for AppError {
    fn from(err: qs_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<qs_sim::SimError> for AppError {
    fn from(err: qs_sim::SimError) -> Self {
        match err {
            qs_sim::SimError::Solver(e) => e.into(),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl From<qs_results::ResultsError> for AppError {
    fn from(err: qs_results::ResultsError) -> Self {
        match err {
            e @ qs_results::ResultsError::Shape { .. } => AppError::Shape(e.to_string()),
            other => AppError::Results(other.to_string()),
        }
    }
}
