//! Engine backed by an external bridge process.
//!
//! The process is started at compile time with its working directory set to
//! the model's directory, so relative includes in the model resolve without
//! touching this process's own working directory. Each command is written as
//! one line on the child's stdin; the child answers with exactly one line.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::engine::SolverEngine;
use crate::error::{SolverError, SolverResult};
use crate::protocol;

struct BridgeIo {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Solver engine speaking the line protocol of [`crate::protocol`].
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
    io: Option<BridgeIo>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            io: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn is_running(&self) -> bool {
        self.io.is_some()
    }

    fn spawn(&mut self, base_dir: &Path) -> SolverResult<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(base_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::InvalidArg {
                what: format!("cannot start solver bridge '{}': {}", self.program, e),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| SolverError::Protocol {
            what: "bridge stdin unavailable".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| SolverError::Protocol {
            what: "bridge stdout unavailable".to_string(),
        })?;

        self.io = Some(BridgeIo {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        });
        Ok(())
    }

    fn exchange(&mut self, line: &str) -> SolverResult<String> {
        let io = self.io.as_mut().ok_or_else(|| SolverError::InvalidArg {
            what: "solver bridge is not running".to_string(),
        })?;

        writeln!(io.stdin, "{line}")?;
        io.stdin.flush()?;

        let mut reply = String::new();
        if io.stdout.read_line(&mut reply)? == 0 {
            return Err(SolverError::Protocol {
                what: format!("bridge closed its output while answering '{line}'"),
            });
        }
        protocol::check_reply(line, &reply)
    }
}

impl SolverEngine for ProcessEngine {
    fn compile(&mut self, model_path: &Path, base_dir: &Path) -> SolverResult<()> {
        if self.io.is_none() {
            self.spawn(base_dir)?;
        }
        self.exchange(&protocol::compile_command(model_path))?;
        Ok(())
    }

    fn command(&mut self, text: &str) -> SolverResult<String> {
        self.exchange(text)
    }

    fn set_active_bus(&mut self, name: &str) -> SolverResult<()> {
        self.exchange(&protocol::set_bus_command(name))?;
        Ok(())
    }

    fn bus_vmag_angle(&mut self) -> SolverResult<Vec<f64>> {
        let reply = self.exchange(protocol::BUS_VMAG_ANGLE_QUERY)?;
        protocol::parse_values(&reply)
    }

    fn vsource_names(&mut self) -> SolverResult<Vec<String>> {
        let reply = self.exchange(protocol::VSOURCE_NAMES_QUERY)?;
        Ok(protocol::parse_names(&reply))
    }

    fn set_active_vsource(&mut self, name: &str) -> SolverResult<()> {
        self.exchange(&protocol::select_vsource_command(name))?;
        Ok(())
    }

    fn element_powers(&mut self) -> SolverResult<Vec<f64>> {
        let reply = self.exchange(protocol::ELEMENT_POWERS_QUERY)?;
        protocol::parse_values(&reply)
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        if let Some(mut io) = self.io.take() {
            let _ = io.child.kill();
            let _ = io.child.wait();
        }
    }
}
