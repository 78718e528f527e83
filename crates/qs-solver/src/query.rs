//! Entity query adapters.
//!
//! Read-after-solve helpers turning engine readings into measurement tuples.
//! They only activate elements; window, mode and step state are untouched.

use qs_core::MeasurementTuple;

use crate::engine::SolverEngine;
use crate::error::SolverResult;
use crate::session::SolverSession;

/// Voltage magnitude/angle tuple of `bus`. Width is 2, 4 or 6 depending on
/// the bus's phase count in the compiled model.
pub fn read_bus_voltage<E: SolverEngine>(
    session: &mut SolverSession<E>,
    bus: &str,
) -> SolverResult<MeasurementTuple> {
    session.bus_vmag_angle(bus)
}

/// Per-phase P/Q tuple injected by voltage source `source`.
pub fn read_source_power<E: SolverEngine>(
    session: &mut SolverSession<E>,
    source: &str,
) -> SolverResult<MeasurementTuple> {
    let raw = session.source_powers(source)?;
    Ok(normalize_source_powers(&raw))
}

/// Drop zero padding for absent phases and flip the sign of the rest.
///
/// The engine reports source injections as negative absorbed power and pads
/// the fixed 6-wide vector with exact zeros.
pub fn normalize_source_powers(raw: &[f64]) -> MeasurementTuple {
    raw.iter().filter(|v| **v != 0.0).map(|v| -v).collect()
}
