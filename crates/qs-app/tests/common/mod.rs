#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use qs_core::CircuitScope;
use qs_project::{RunConfig, SolverDef};
use qs_solver::{SolverEngine, SolverError, SolverResult};

/// In-memory engine with a fixed set of buses and one voltage source.
pub struct ScriptedEngine {
    pub phases: HashMap<String, usize>,
    pub sources: Vec<String>,
    pub source_width: usize,
    pub fail_at_step: Option<usize>,
    pub compiled: Option<PathBuf>,
    active_bus: Option<String>,
    step: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        let phases = [("p13udt13213-p13udt13213lv", 2), ("b3", 3)]
            .into_iter()
            .map(|(n, p)| (n.to_string(), p))
            .collect();
        Self {
            phases,
            sources: vec!["source".to_string()],
            source_width: 3,
            fail_at_step: None,
            compiled: None,
            active_bus: None,
            step: 0,
        }
    }
}

impl SolverEngine for ScriptedEngine {
    fn compile(&mut self, model_path: &Path, _base_dir: &Path) -> SolverResult<()> {
        self.compiled = Some(model_path.to_path_buf());
        Ok(())
    }

    fn command(&mut self, text: &str) -> SolverResult<String> {
        if text == "solve" {
            if self.fail_at_step == Some(self.step) {
                return Err(SolverError::Protocol {
                    what: "solution did not converge".to_string(),
                });
            }
            self.step += 1;
        }
        Ok(String::new())
    }

    fn set_active_bus(&mut self, name: &str) -> SolverResult<()> {
        if !self.phases.contains_key(name) {
            return Err(SolverError::Protocol {
                what: format!("bus {name} not found"),
            });
        }
        self.active_bus = Some(name.to_string());
        Ok(())
    }

    fn bus_vmag_angle(&mut self) -> SolverResult<Vec<f64>> {
        let phases = self
            .active_bus
            .as_ref()
            .and_then(|b| self.phases.get(b))
            .copied()
            .unwrap_or(0);
        let mut out = Vec::new();
        for p in 0..phases {
            out.push(120.0 + self.step as f64 * 0.01);
            out.push(-120.0 * p as f64);
        }
        Ok(out)
    }

    fn vsource_names(&mut self) -> SolverResult<Vec<String>> {
        Ok(self.sources.clone())
    }

    fn set_active_vsource(&mut self, _name: &str) -> SolverResult<()> {
        Ok(())
    }

    fn element_powers(&mut self) -> SolverResult<Vec<f64>> {
        // terminal 1 (injections, negative) followed by an all-zero terminal
        let mut out = Vec::new();
        for _ in 0..self.source_width {
            out.push(-(1000.0 + self.step as f64));
            out.push(-250.0);
        }
        out.extend(std::iter::repeat_n(0.0, self.source_width * 2));
        Ok(out)
    }
}

pub fn feeder_scope() -> CircuitScope {
    CircuitScope::new(
        "P13U",
        Some("p13uhs0_1247".into()),
        Some("p13udt13213".into()),
    )
    .expect("scope")
}

/// Build `<root>/circuits/2023/SFO/P13U/scenarios/base_timeseries/opendss/...`
/// with a master file at the feeder level and return the config pointing at it.
pub fn workspace(root: &Path) -> RunConfig {
    let circuits = root.join("circuits");
    let feeder_dir =
        circuits.join("2023/SFO/P13U/scenarios/base_timeseries/opendss/p13uhs0_1247/p13udt13213");
    fs::create_dir_all(&feeder_dir).expect("mkdir");
    fs::write(feeder_dir.join("Master.dss"), "clear\n").expect("write model");

    RunConfig {
        circuit_base_path: circuits,
        results_base_path: root.join("results"),
        buses: Some(vec!["p13udt13213-p13udt13213lv".to_string()]),
        solver: SolverDef::default(),
    }
}
