//! Configuration validation logic.

use std::collections::HashSet;

use crate::schema::RunConfig;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("The key {key} must not be empty")]
    EmptyValue { key: &'static str },

    #[error("Bus name at position {index} is empty")]
    EmptyBusName { index: usize },

    #[error("Bus name '{name}' cannot be used as a result file name")]
    UnsafeBusName { name: String },
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.circuit_base_path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyValue {
            key: "circuit_base_path",
        });
    }
    if config.results_base_path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyValue {
            key: "results_base_path",
        });
    }
    if config.solver.command.trim().is_empty() {
        return Err(ValidationError::EmptyValue {
            key: "solver.command",
        });
    }

    let mut seen = HashSet::new();
    for (index, bus) in config.buses.iter().flatten().enumerate() {
        let name = bus.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyBusName { index });
        }
        if !qs_core::is_file_safe_name(name) {
            return Err(ValidationError::UnsafeBusName {
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            tracing::warn!(bus = name, "bus listed more than once; monitoring it once");
        }
    }

    Ok(())
}
