//! qs-core: stable foundation for qsts-run.
//!
//! Contains:
//! - window (start date + day count -> yearly-mode step offset and count)
//! - timing (fixed 15-minute step, timestamp sequences)
//! - series (raw per-entity measurement series)
//! - scope (subregion / substation / feeder hierarchy)
//! - error (shared error types)

pub mod error;
pub mod scope;
pub mod series;
pub mod timing;
pub mod window;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult, WindowError, WindowResult};
pub use scope::CircuitScope;
pub use series::{MeasurementTuple, RawSeries, SeriesKind, is_file_safe_name};
pub use timing::*;
pub use window::{SimulationWindow, resolve_window};
