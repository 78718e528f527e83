//! Shared application service layer for qsts-run.
//!
//! Centralizes the run pipeline (window, model discovery, step loop, result
//! tables, storage), configuration handling and stored-run queries so that
//! frontends stay thin.

pub mod config_service;
pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;

// Re-export key types for convenience
pub use config_service::{ConfigSummary, load_config, locate_model, validate_config_file};
pub use error::{AppError, AppResult};
pub use progress::{DayProgress, RunProgressEvent, RunStage};
pub use query::{RunSummary, TableSummary, extract_series, list_tables, summarize_run};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run, execute_run,
};
