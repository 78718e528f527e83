//! Quasi-static time-series driving loop.
//!
//! Provides:
//! - `drive`, the sequential compile/configure/solve/query loop
//! - `TrackedEntities`, the configured observation set
//! - `Indicator`, a scoped terminal spinner for slow phases

pub mod driver;
pub mod error;
pub mod indicator;

pub use driver::{DriveEvent, DriveOptions, SimulationRecord, TrackedEntities, drive};
pub use error::{SimError, SimResult};
pub use indicator::Indicator;
