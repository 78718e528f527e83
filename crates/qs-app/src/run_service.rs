//! Run execution service: window, model, step loop, tables, storage.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use qs_core::{CircuitScope, SimulationWindow, resolve_window};
use qs_project::RunConfig;
use qs_results::{RunLayout, RunStore, TimestampedTable, assemble_run, index_tables};
use qs_sim::{DriveEvent, DriveOptions, TrackedEntities, drive};
use qs_solver::{ProcessEngine, SolverEngine, SolverSession};

use crate::error::AppResult;
use crate::progress::{DayProgress, RunProgressEvent, RunStage};

/// Options for running simulations.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Draw a spinner on stderr while the model compiles.
    pub show_indicator: bool,
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub config: &'a RunConfig,
    pub scenario: &'a str,
    pub start_date: &'a str,
    pub days: i64,
    pub city: &'a str,
    pub scope: &'a CircuitScope,
    pub options: RunOptions,
}

/// Wall-clock time spent in each part of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub simulate_time_s: f64,
    pub assemble_time_s: f64,
    pub save_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub window: SimulationWindow,
    pub model_path: PathBuf,
    pub run_dir: PathBuf,
    pub sources: Vec<String>,
    pub tables: BTreeMap<String, TimestampedTable>,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    day: Option<DayProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            day,
        });
    }
}

/// Execute a run with the solver bridge named in the configuration.
pub fn ensure_run(
    request: &RunRequest,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let solver = &request.config.solver;
    let engine = ProcessEngine::new(solver.command.clone(), solver.args.clone());
    execute_run(request, engine, progress_cb)
}

/// Execute a run on `engine`.
///
/// The configuration is validated before any solver work. Nothing is written
/// unless every step solved and every table assembled.
pub fn execute_run<E: SolverEngine>(
    request: &RunRequest,
    engine: E,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    qs_project::validate_config(request.config).map_err(qs_project::ProjectError::from)?;

    emit_progress(
        &mut progress_cb,
        RunStage::ResolvingWindow,
        started,
        Some(format!(
            "Resolving {} day(s) from {}",
            request.days, request.start_date
        )),
        None,
    );
    let window = resolve_window(request.start_date, request.days)?;
    tracing::info!(
        start = %window.start_date(),
        days = window.day_count(),
        start_hour = window.start_hour_of_year(),
        steps = window.step_count(),
        "simulation window resolved"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::LocatingModel,
        started,
        Some(format!("Locating model for {}", request.scope.name())),
        None,
    );
    let model_path = qs_project::locate_master_file(
        &request.config.circuit_base_path,
        window.year(),
        request.city,
        request.scenario,
        request.scope,
    )?;
    tracing::info!(model = %model_path.display(), "circuit model located");

    emit_progress(
        &mut progress_cb,
        RunStage::Simulating,
        started,
        Some(format!("Simulating {} steps", window.step_count())),
        None,
    );
    let simulate_started = Instant::now();
    let tracked = TrackedEntities::new(request.config.tracked_buses());
    let drive_options = DriveOptions {
        show_indicator: request.options.show_indicator,
        ..DriveOptions::default()
    };
    let mut session = SolverSession::new(engine);
    let mut sources = Vec::new();
    let record = {
        let mut forward = |event: DriveEvent| match event {
            DriveEvent::Compiled { sources: names } => {
                emit_progress(
                    &mut progress_cb,
                    RunStage::Simulating,
                    started,
                    Some(format!("Model compiled, sources: {}", names.join(", "))),
                    None,
                );
                sources = names;
            }
            DriveEvent::Progress {
                day,
                step,
                total_steps,
            } => emit_progress(
                &mut progress_cb,
                RunStage::Simulating,
                started,
                None,
                Some(DayProgress {
                    day,
                    step,
                    total_steps,
                    fraction_complete: step as f64 / total_steps as f64,
                }),
            ),
        };
        drive(
            &mut session,
            &model_path,
            &window,
            &tracked,
            &drive_options,
            Some(&mut forward),
        )?
    };
    timing.simulate_time_s = simulate_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::AssemblingResults,
        started,
        Some("Assembling result tables".to_string()),
        None,
    );
    let assemble_started = Instant::now();
    let tables = assemble_run(&record.buses, &record.sources)?;
    let tables = index_tables(tables, window.start_date())?;
    timing.assemble_time_s = assemble_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        Some("Saving results".to_string()),
        None,
    );
    let save_started = Instant::now();
    let store = RunStore::new(request.config.results_base_path.clone());
    let layout = RunLayout::new(window, request.scenario, request.scope);
    let run_dir = store.save_run(&layout, &tables)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();

    timing.total_time_s = started.elapsed().as_secs_f64();
    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some(format!("Results saved to {}", run_dir.display())),
        None,
    );

    Ok(RunResponse {
        window,
        model_path,
        run_dir,
        sources,
        tables,
        timing,
    })
}
