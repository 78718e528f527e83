//! Simulation driver: the sequential step loop.

use std::collections::BTreeSet;
use std::path::Path;

use qs_core::{RawSeries, STEPS_PER_DAY, SeriesKind, SimulationWindow};
use qs_solver::{SolverEngine, SolverSession, read_bus_voltage, read_source_power};

use crate::error::{SimError, SimResult};
use crate::indicator::Indicator;

/// Buses to observe. Sources are not listed here: every source in the
/// compiled model is discovered and observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedEntities {
    buses: BTreeSet<String>,
}

impl TrackedEntities {
    pub fn new<I, S>(buses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buses: buses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn buses(&self) -> impl Iterator<Item = &str> {
        self.buses.iter().map(String::as_str)
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }
}

/// Options for a driven run.
#[derive(Clone, Debug)]
pub struct DriveOptions {
    /// Draw a spinner on stderr while the model compiles.
    pub show_indicator: bool,
    /// Emit a progress marker every N steps (default: once per simulated day).
    pub progress_every: usize,
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            show_indicator: false,
            progress_every: STEPS_PER_DAY,
        }
    }
}

/// Diagnostic events; not part of the data produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveEvent {
    Compiled { sources: Vec<String> },
    Progress {
        /// Whole simulated days finished so far.
        day: usize,
        step: usize,
        total_steps: usize,
    },
}

/// Raw series gathered by a run, one row per solved step in every series.
#[derive(Debug, Clone)]
pub struct SimulationRecord {
    pub buses: Vec<RawSeries>,
    pub sources: Vec<RawSeries>,
    pub steps: usize,
}

fn emit(progress: &mut Option<&mut dyn FnMut(DriveEvent)>, event: DriveEvent) {
    if let Some(cb) = progress.as_deref_mut() {
        cb(event);
    }
}

fn compile_model<E: SolverEngine>(
    session: &mut SolverSession<E>,
    model_path: &Path,
    options: &DriveOptions,
) -> SimResult<()> {
    let _indicator = if options.show_indicator {
        let file_name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Indicator::start(format!("Compiling circuit model: {file_name}"))
    } else {
        Indicator::disabled()
    };
    session.compile(model_path)?;
    Ok(())
}

/// Run the whole window on `session`.
///
/// Compiles `model_path`, configures yearly mode at the window's start hour,
/// discovers voltage sources, then solves `window.step_count()` steps one by
/// one. After every solve each tracked bus and each discovered source gets
/// exactly one new row. Any solver fault aborts the run.
pub fn drive<E: SolverEngine>(
    session: &mut SolverSession<E>,
    model_path: &Path,
    window: &SimulationWindow,
    tracked: &TrackedEntities,
    options: &DriveOptions,
    mut progress: Option<&mut dyn FnMut(DriveEvent)>,
) -> SimResult<SimulationRecord> {
    if options.progress_every == 0 {
        return Err(SimError::InvalidArg {
            what: "progress_every must be positive",
        });
    }

    compile_model(session, model_path, options)?;
    tracing::info!(model = %model_path.display(), "circuit model compiled");

    session.configure(window)?;
    tracing::info!(
        start_hour = window.start_hour_of_year(),
        steps = window.step_count(),
        "yearly mode configured, stepsize 15m"
    );

    let mut source_names = Vec::new();
    for name in session.list_sources()? {
        if !source_names.contains(&name) {
            source_names.push(name);
        }
    }
    tracing::debug!(sources = ?source_names, "discovered voltage sources");
    emit(
        &mut progress,
        DriveEvent::Compiled {
            sources: source_names.clone(),
        },
    );

    let total_steps = window.step_count();
    let mut buses: Vec<RawSeries> = tracked
        .buses()
        .map(|bus| RawSeries::with_capacity(bus, SeriesKind::Voltage, total_steps))
        .collect();
    let mut sources: Vec<RawSeries> = source_names
        .iter()
        .map(|name| RawSeries::with_capacity(name.as_str(), SeriesKind::Power, total_steps))
        .collect();

    for step in 0..total_steps {
        session.solve_step()?;

        for series in buses.iter_mut() {
            let row = read_bus_voltage(session, series.name())?;
            series.push(row);
        }
        for series in sources.iter_mut() {
            let row = read_source_power(session, series.name())?;
            series.push(row);
        }

        let done = step + 1;
        if done % options.progress_every == 0 {
            let day = done / STEPS_PER_DAY;
            tracing::info!(day, step = done, total_steps, "simulation progress");
            emit(
                &mut progress,
                DriveEvent::Progress {
                    day,
                    step: done,
                    total_steps,
                },
            );
        }
    }

    Ok(SimulationRecord {
        buses,
        sources,
        steps: total_steps,
    })
}
