//! qs-solver: command-driven power-flow solver session.
//!
//! Provides:
//! - `SolverEngine`, the narrow seam to an external solver
//! - `SolverSession`, a call-order state machine around an engine
//! - the textual command protocol
//! - entity query adapters (bus voltages, source powers)
//! - `ProcessEngine`, an engine backed by a line-oriented bridge process

pub mod engine;
pub mod error;
pub mod process;
pub mod protocol;
pub mod query;
pub mod session;

pub use engine::SolverEngine;
pub use error::{SolverError, SolverResult};
pub use process::ProcessEngine;
pub use query::{normalize_source_powers, read_bus_voltage, read_source_power};
pub use session::{SessionState, SolverSession};
