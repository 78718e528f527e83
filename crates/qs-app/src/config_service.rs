//! Configuration loading and model lookup.

use std::path::{Path, PathBuf};

use qs_core::CircuitScope;
use qs_project::RunConfig;

use crate::error::AppResult;

/// Short description of a loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSummary {
    pub circuit_base_path: PathBuf,
    pub results_base_path: PathBuf,
    pub tracked_buses: Vec<String>,
    pub solver_command: String,
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> AppResult<RunConfig> {
    Ok(qs_project::load_config(path)?)
}

/// Load a configuration file and summarize it.
pub fn validate_config_file(path: &Path) -> AppResult<ConfigSummary> {
    let config = load_config(path)?;
    Ok(ConfigSummary {
        circuit_base_path: config.circuit_base_path.clone(),
        results_base_path: config.results_base_path.clone(),
        tracked_buses: config.tracked_buses().into_iter().collect(),
        solver_command: config.solver.command.clone(),
    })
}

/// Resolve the master model file for a scope without running anything.
pub fn locate_model(
    config: &RunConfig,
    year: i32,
    city: &str,
    scenario: &str,
    scope: &CircuitScope,
) -> AppResult<PathBuf> {
    Ok(qs_project::locate_master_file(
        &config.circuit_base_path,
        year,
        city,
        scenario,
        scope,
    )?)
}
