//! Session handle enforcing the solver's call order.

use std::fmt;
use std::path::{Path, PathBuf};

use qs_core::SimulationWindow;

use crate::engine::SolverEngine;
use crate::error::{SolverError, SolverResult};
use crate::protocol;

/// Lifecycle of a solver session.
///
/// `Uninitialized -> Compiled -> Configured -> Stepping`. Any failed compile,
/// configure or solve moves the session to `Faulted`, which accepts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Compiled,
    Configured,
    Stepping,
    Faulted,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Compiled => "compiled",
            SessionState::Configured => "configured",
            SessionState::Stepping => "stepping",
            SessionState::Faulted => "faulted",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exclusive handle on one solver engine for the duration of a run.
pub struct SolverSession<E: SolverEngine> {
    engine: E,
    state: SessionState,
    model_path: Option<PathBuf>,
    step_count: usize,
    steps_taken: usize,
}

impl<E: SolverEngine> SolverSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: SessionState::Uninitialized,
            model_path: None,
            step_count: 0,
            steps_taken: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> SolverResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SolverError::OutOfOrder {
                operation,
                state: self.state,
            })
        }
    }

    /// Compile the circuit model. Relative includes resolve against the
    /// model's own directory, which is handed to the engine explicitly.
    pub fn compile(&mut self, model_path: &Path) -> SolverResult<()> {
        self.require("compile", &[SessionState::Uninitialized])?;

        let model_path = std::path::absolute(model_path)?;
        let base_dir = model_path
            .parent()
            .ok_or_else(|| SolverError::InvalidArg {
                what: format!("model path {} has no parent directory", model_path.display()),
            })?
            .to_path_buf();

        tracing::debug!(model = %model_path.display(), "compiling circuit model");
        match self.engine.compile(&model_path, &base_dir) {
            Ok(()) => {
                self.state = SessionState::Compiled;
                self.model_path = Some(model_path);
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Faulted;
                Err(SolverError::Compile {
                    path: model_path,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Put the session in yearly mode at the window's start hour.
    pub fn configure(&mut self, window: &SimulationWindow) -> SolverResult<()> {
        self.require("configure", &[SessionState::Compiled])?;

        for command in [
            protocol::set_hour_command(window.start_hour_of_year()),
            protocol::set_mode_command(),
        ] {
            if let Err(e) = self.engine.command(&command) {
                self.state = SessionState::Faulted;
                return Err(e);
            }
        }

        self.step_count = window.step_count();
        self.steps_taken = 0;
        self.state = SessionState::Configured;
        Ok(())
    }

    /// Voltage sources present in the compiled model.
    pub fn list_sources(&mut self) -> SolverResult<Vec<String>> {
        self.require(
            "list_sources",
            &[
                SessionState::Compiled,
                SessionState::Configured,
                SessionState::Stepping,
            ],
        )?;
        self.engine.vsource_names()
    }

    /// Advance exactly one step. Returns the number of steps solved so far.
    pub fn solve_step(&mut self) -> SolverResult<usize> {
        self.require(
            "solve_step",
            &[SessionState::Configured, SessionState::Stepping],
        )?;
        if self.steps_taken >= self.step_count {
            return Err(SolverError::WindowExhausted {
                steps: self.step_count,
            });
        }

        if let Err(e) = self.engine.command(protocol::SOLVE_COMMAND) {
            self.state = SessionState::Faulted;
            return Err(SolverError::Solve {
                step: self.steps_taken,
                message: e.to_string(),
            });
        }

        self.steps_taken += 1;
        self.state = SessionState::Stepping;
        Ok(self.steps_taken)
    }

    /// Magnitude/angle tuple of `bus` after the last solve.
    pub fn bus_vmag_angle(&mut self, bus: &str) -> SolverResult<Vec<f64>> {
        self.require("bus query", &[SessionState::Stepping])?;
        self.engine
            .set_active_bus(bus)
            .and_then(|()| self.engine.bus_vmag_angle())
            .map_err(|e| SolverError::Query {
                entity: bus.to_string(),
                message: e.to_string(),
            })
    }

    /// Raw power vector of voltage source `source` after the last solve.
    pub fn source_powers(&mut self, source: &str) -> SolverResult<Vec<f64>> {
        self.require("source query", &[SessionState::Stepping])?;
        self.engine
            .set_active_vsource(source)
            .and_then(|()| self.engine.element_powers())
            .map_err(|e| SolverError::Query {
                entity: source.to_string(),
                message: e.to_string(),
            })
    }
}
