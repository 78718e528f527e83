//! qs-project: run configuration file format and circuit model discovery.

pub mod locate;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use locate::{MODEL_FILE_NAME, locate_master_file, model_directory};
pub use schema::*;
pub use validate::{ValidationError, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("The file {} does not exist", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("The config file {} is empty", path.display())]
    EmptyConfig { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid scope: {0}")]
    Scope(#[from] qs_core::CoreError),

    #[error("Circuit directory not found for the specified level: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Model file not found: {}", path.display())]
    ModelFileNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load, validate and resolve a run configuration file.
///
/// Relative base paths are resolved against the current working directory.
pub fn load_config(path: &Path) -> ProjectResult<RunConfig> {
    if !path.exists() {
        return Err(ProjectError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = parse_config(&content).map_err(|e| match e {
        ProjectError::EmptyConfig { .. } => ProjectError::EmptyConfig {
            path: path.to_path_buf(),
        },
        other => other,
    })?;
    config.resolve_paths(&std::env::current_dir()?);
    tracing::info!(config = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Parse and validate configuration text without touching the filesystem.
pub fn parse_config(content: &str) -> ProjectResult<RunConfig> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    if value.is_null() {
        return Err(ProjectError::EmptyConfig {
            path: PathBuf::new(),
        });
    }
    let config: RunConfig = serde_yaml::from_value(value)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &RunConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
