//! SolverEngine trait for pluggable solver backends.

use std::path::Path;

use crate::error::SolverResult;

/// Narrow interface to a stateful, command-driven power-flow solver.
///
/// Implementations are driven through a [`crate::SolverSession`], which
/// enforces call order. An engine only has to execute what it is told:
/// - `compile` loads a circuit, resolving relative includes against `base_dir`
/// - `command` executes one protocol line (`set ...`, `solve`)
/// - the query methods read the state left by the last solve
pub trait SolverEngine {
    /// Load the circuit model at `model_path`.
    fn compile(&mut self, model_path: &Path, base_dir: &Path) -> SolverResult<()>;

    /// Execute one text command and return the engine's reply.
    fn command(&mut self, text: &str) -> SolverResult<String>;

    /// Make `name` the active bus.
    fn set_active_bus(&mut self, name: &str) -> SolverResult<()>;

    /// Magnitude/angle pairs of the active bus, one pair per phase.
    fn bus_vmag_angle(&mut self) -> SolverResult<Vec<f64>>;

    /// Names of all voltage sources in the compiled circuit.
    fn vsource_names(&mut self) -> SolverResult<Vec<String>>;

    /// Make the voltage source `name` the active circuit element.
    fn set_active_vsource(&mut self, name: &str) -> SolverResult<()>;

    /// Raw power vector of the active element (P/Q per conductor).
    fn element_powers(&mut self) -> SolverResult<Vec<f64>>;
}

impl<E: SolverEngine + ?Sized> SolverEngine for Box<E> {
    fn compile(&mut self, model_path: &Path, base_dir: &Path) -> SolverResult<()> {
        (**self).compile(model_path, base_dir)
    }

    fn command(&mut self, text: &str) -> SolverResult<String> {
        (**self).command(text)
    }

    fn set_active_bus(&mut self, name: &str) -> SolverResult<()> {
        (**self).set_active_bus(name)
    }

    fn bus_vmag_angle(&mut self) -> SolverResult<Vec<f64>> {
        (**self).bus_vmag_angle()
    }

    fn vsource_names(&mut self) -> SolverResult<Vec<String>> {
        (**self).vsource_names()
    }

    fn set_active_vsource(&mut self, name: &str) -> SolverResult<()> {
        (**self).set_active_vsource(name)
    }

    fn element_powers(&mut self) -> SolverResult<Vec<f64>> {
        (**self).element_powers()
    }
}
