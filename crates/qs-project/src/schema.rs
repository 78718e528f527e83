//! Run configuration schema.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Contents of `config.yaml`.
///
/// Keys other than the ones below are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub circuit_base_path: PathBuf,
    pub results_base_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buses: Option<Vec<String>>,
    #[serde(default)]
    pub solver: SolverDef,
}

/// External solver bridge process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_solver_command")]
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

fn default_solver_command() -> String {
    "opendsscmd".to_string()
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            command: default_solver_command(),
            args: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Bus names to monitor: trimmed, deduplicated. Absent or empty means none.
    pub fn tracked_buses(&self) -> BTreeSet<String> {
        self.buses
            .iter()
            .flatten()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect()
    }

    /// Make relative base paths absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.circuit_base_path.is_relative() {
            self.circuit_base_path = base.join(&self.circuit_base_path);
        }
        if self.results_base_path.is_relative() {
            self.results_base_path = base.join(&self.results_base_path);
        }
    }
}
