//! Circuit model discovery.
//!
//! Layout: `<root>/<year>/<city>/<subregion>/scenarios/<scenario>/opendss[/<substation>[/<feeder>]]/Master.dss`

use std::path::{Path, PathBuf};

use qs_core::CircuitScope;

use crate::{ProjectError, ProjectResult};

pub const MODEL_FILE_NAME: &str = "Master.dss";

/// Directory expected to hold the model for `scope`. Does not touch the disk.
pub fn model_directory(
    circuit_root: &Path,
    year: i32,
    city: &str,
    scenario: &str,
    scope: &CircuitScope,
) -> PathBuf {
    let mut dir = circuit_root
        .join(year.to_string())
        .join(city)
        .join(&scope.subregion)
        .join("scenarios")
        .join(scenario)
        .join("opendss");
    for level in scope.model_levels() {
        dir.push(level);
    }
    dir
}

/// Find the master model file for `scope`, reporting the exact path checked
/// when the directory or the file is missing.
pub fn locate_master_file(
    circuit_root: &Path,
    year: i32,
    city: &str,
    scenario: &str,
    scope: &CircuitScope,
) -> ProjectResult<PathBuf> {
    scope.validate()?;

    let dir = model_directory(circuit_root, year, city, scenario, scope);
    if !dir.is_dir() {
        return Err(ProjectError::DirectoryNotFound { path: dir });
    }

    let model = dir.join(MODEL_FILE_NAME);
    if !model.is_file() {
        return Err(ProjectError::ModelFileNotFound { path: model });
    }

    tracing::debug!(model = %model.display(), "circuit model located");
    Ok(model)
}
