//! Textual command protocol.
//!
//! Per run the session issues, in order: `compile [<model>]`,
//! `set hour=<h>`, `set mode=yearly stepsize=15m number=1`, then one `solve`
//! per step. Each `solve` therefore advances exactly one step.
//!
//! The remaining commands are the query vocabulary of the bridge process
//! used by [`crate::ProcessEngine`]; numeric replies are comma-separated.

use std::path::Path;

use qs_core::STEPSIZE_DIRECTIVE;

use crate::error::{SolverError, SolverResult};

/// Steps advanced by a single `solve`.
pub const STEPS_PER_SOLVE: usize = 1;

pub const SOLVE_COMMAND: &str = "solve";
pub const BUS_VMAG_ANGLE_QUERY: &str = "get bus_vmag_angle";
pub const VSOURCE_NAMES_QUERY: &str = "get vsource_names";
pub const ELEMENT_POWERS_QUERY: &str = "get element_powers";

pub fn compile_command(model_path: &Path) -> String {
    format!("compile [{}]", model_path.display())
}

pub fn set_hour_command(hour: u32) -> String {
    format!("set hour={hour}")
}

pub fn set_mode_command() -> String {
    format!("set mode=yearly stepsize={STEPSIZE_DIRECTIVE} number={STEPS_PER_SOLVE}")
}

pub fn set_bus_command(name: &str) -> String {
    format!("set bus={name}")
}

pub fn select_vsource_command(name: &str) -> String {
    format!("select vsource.{name}")
}

/// Reject replies that report a failure (`error...`, case-insensitive).
pub fn check_reply(command: &str, reply: &str) -> SolverResult<String> {
    let trimmed = reply.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("error") {
        let message = trimmed
            .get(5..)
            .unwrap_or_default()
            .trim_start_matches([':', ' '])
            .to_string();
        return Err(SolverError::Command {
            command: command.to_string(),
            message,
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a comma-separated list of numbers. An empty reply is an empty list.
pub fn parse_values(reply: &str) -> SolverResult<Vec<f64>> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<f64>().map_err(|_| SolverError::Protocol {
                what: format!("'{field}' is not a number"),
            })
        })
        .collect()
}

/// Parse a comma-separated list of names, dropping empty entries.
pub fn parse_names(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_texts() {
        assert_eq!(
            compile_command(Path::new("/ckt/Master.dss")),
            "compile [/ckt/Master.dss]"
        );
        assert_eq!(set_hour_command(3624), "set hour=3624");
        assert_eq!(set_mode_command(), "set mode=yearly stepsize=15m number=1");
        assert_eq!(set_bus_command("p1rdt1"), "set bus=p1rdt1");
        assert_eq!(select_vsource_command("source"), "select vsource.source");
    }

    #[test]
    fn error_replies_are_rejected() {
        let err = check_reply("solve", "Error: circuit not compiled").unwrap_err();
        match err {
            SolverError::Command { command, message } => {
                assert_eq!(command, "solve");
                assert_eq!(message, "circuit not compiled");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(check_reply("solve", " ok \n").unwrap(), "ok");
    }

    #[test]
    fn values_and_names() {
        assert_eq!(
            parse_values("1.02, -0.5,3e2").unwrap(),
            vec![1.02, -0.5, 300.0]
        );
        assert!(parse_values("").unwrap().is_empty());
        assert!(parse_values("1.0,abc").is_err());
        assert_eq!(parse_names("source, sub2,,"), vec!["source", "sub2"]);
        assert!(parse_names("  ").is_empty());
    }
}
