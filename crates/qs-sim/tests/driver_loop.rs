//! Step loop behaviour against an in-memory engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use qs_core::{SeriesKind, resolve_window};
use qs_sim::{DriveEvent, DriveOptions, SimError, TrackedEntities, drive};
use qs_solver::{SessionState, SolverEngine, SolverError, SolverResult, SolverSession};

/// Engine whose readings encode the step number so ordering can be checked.
struct SteppingEngine {
    phases: HashMap<String, usize>,
    sources: Vec<String>,
    active_bus: Option<String>,
    step: usize,
    fail_at_step: Option<usize>,
    log: Vec<String>,
}

impl SteppingEngine {
    fn new() -> Self {
        let phases = [("b1", 1), ("b2", 2), ("b3", 3)]
            .into_iter()
            .map(|(n, p)| (n.to_string(), p))
            .collect();
        Self {
            phases,
            sources: vec!["source".to_string(), "source".to_string()],
            active_bus: None,
            step: 0,
            fail_at_step: None,
            log: Vec::new(),
        }
    }
}

impl SolverEngine for SteppingEngine {
    fn compile(&mut self, model_path: &Path, _base_dir: &Path) -> SolverResult<()> {
        self.log.push(format!("compile {}", model_path.display()));
        Ok(())
    }

    fn command(&mut self, text: &str) -> SolverResult<String> {
        self.log.push(text.to_string());
        if text == "solve" {
            if self.fail_at_step == Some(self.step) {
                return Err(SolverError::Protocol {
                    what: "max control iterations exceeded".to_string(),
                });
            }
            self.step += 1;
        }
        Ok(String::new())
    }

    fn set_active_bus(&mut self, name: &str) -> SolverResult<()> {
        if !self.phases.contains_key(name) {
            return Err(SolverError::Protocol {
                what: format!("unknown bus {name}"),
            });
        }
        self.active_bus = Some(name.to_string());
        Ok(())
    }

    fn bus_vmag_angle(&mut self) -> SolverResult<Vec<f64>> {
        let bus = self.active_bus.as_deref().unwrap_or_default();
        let phases = self.phases.get(bus).copied().unwrap_or(0);
        let mut out = Vec::new();
        for p in 0..phases {
            out.push(7000.0 + self.step as f64);
            out.push(-120.0 * p as f64);
        }
        Ok(out)
    }

    fn vsource_names(&mut self) -> SolverResult<Vec<String>> {
        Ok(self.sources.clone())
    }

    fn set_active_vsource(&mut self, _name: &str) -> SolverResult<()> {
        Ok(())
    }

    fn element_powers(&mut self) -> SolverResult<Vec<f64>> {
        let p = -(self.step as f64);
        Ok(vec![p, -1.0, p, -2.0, p, -3.0])
    }
}

fn model() -> PathBuf {
    PathBuf::from("/ckt/opendss/Master.dss")
}

#[test]
fn every_step_adds_one_row_to_every_series() {
    let window = resolve_window("2023-06-01", 2).expect("window");
    let mut session = SolverSession::new(SteppingEngine::new());
    let tracked = TrackedEntities::new(["b3", "b1", "b2", "b1"]);

    let record = drive(
        &mut session,
        &model(),
        &window,
        &tracked,
        &DriveOptions::default(),
        None,
    )
    .expect("drive should succeed");

    assert_eq!(record.steps, 192);
    assert_eq!(record.buses.len(), 3, "duplicate bus names collapse");
    assert_eq!(record.sources.len(), 1, "duplicate sources collapse");
    for series in record.buses.iter().chain(record.sources.iter()) {
        assert_eq!(series.len(), 192, "series {} misaligned", series.name());
    }

    let b2 = record
        .buses
        .iter()
        .find(|s| s.name() == "b2")
        .expect("b2 series");
    assert_eq!(b2.kind(), SeriesKind::Voltage);
    assert_eq!(b2.first_width(), Some(4));
    // row i is read after solve i+1
    for (i, row) in b2.rows().iter().enumerate() {
        assert_eq!(row[0], 7001.0 + i as f64);
    }

    let source = &record.sources[0];
    assert_eq!(source.kind(), SeriesKind::Power);
    assert_eq!(source.rows()[0], vec![1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
    assert_eq!(source.rows()[191][0], 192.0);

    assert_eq!(session.state(), SessionState::Stepping);
    assert_eq!(session.steps_taken(), 192);
}

#[test]
fn protocol_is_compile_configure_then_solves() {
    let window = resolve_window("2023-06-01", 1).expect("window");
    let mut session = SolverSession::new(SteppingEngine::new());

    drive(
        &mut session,
        &model(),
        &window,
        &TrackedEntities::none(),
        &DriveOptions::default(),
        None,
    )
    .expect("drive should succeed");

    let log = &session.engine().log;
    assert_eq!(log[0], "compile /ckt/opendss/Master.dss");
    assert_eq!(log[1], "set hour=3624");
    assert_eq!(log[2], "set mode=yearly stepsize=15m number=1");
    assert_eq!(log.len(), 3 + 96);
    assert!(log[3..].iter().all(|c| c == "solve"));
}

#[test]
fn progress_marker_once_per_simulated_day() {
    let window = resolve_window("2023-03-10", 3).expect("window");
    let mut session = SolverSession::new(SteppingEngine::new());
    let mut events = Vec::new();

    drive(
        &mut session,
        &model(),
        &window,
        &TrackedEntities::new(["b1"]),
        &DriveOptions::default(),
        Some(&mut |event| events.push(event)),
    )
    .expect("drive should succeed");

    assert_eq!(
        events[0],
        DriveEvent::Compiled {
            sources: vec!["source".to_string()]
        }
    );
    let days: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            DriveEvent::Progress { day, step, .. } => Some((*day, *step)),
            DriveEvent::Compiled { .. } => None,
        })
        .collect();
    assert_eq!(days, vec![(1, 96), (2, 192), (3, 288)]);
}

#[test]
fn progress_day_counts_simulated_days_at_any_marker_interval() {
    let window = resolve_window("2023-03-10", 2).expect("window");
    let mut session = SolverSession::new(SteppingEngine::new());
    let mut events = Vec::new();
    let options = DriveOptions {
        progress_every: 48,
        ..DriveOptions::default()
    };

    drive(
        &mut session,
        &model(),
        &window,
        &TrackedEntities::new(["b1"]),
        &options,
        Some(&mut |event| events.push(event)),
    )
    .expect("drive should succeed");

    let markers: Vec<(usize, usize)> = events
        .iter()
        .filter_map(|e| match e {
            DriveEvent::Progress { day, step, .. } => Some((*day, *step)),
            DriveEvent::Compiled { .. } => None,
        })
        .collect();
    assert_eq!(markers, vec![(0, 48), (1, 96), (1, 144), (2, 192)]);
}

#[test]
fn solve_fault_aborts_the_run() {
    let window = resolve_window("2023-06-01", 1).expect("window");
    let mut engine = SteppingEngine::new();
    engine.fail_at_step = Some(10);
    let mut session = SolverSession::new(engine);

    let err = drive(
        &mut session,
        &model(),
        &window,
        &TrackedEntities::new(["b1"]),
        &DriveOptions::default(),
        None,
    )
    .unwrap_err();

    match err {
        SimError::Solver(SolverError::Solve { step, message }) => {
            assert_eq!(step, 10);
            assert!(message.contains("max control iterations"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Faulted);
}

#[test]
fn unknown_bus_is_a_solver_fault() {
    let window = resolve_window("2023-06-01", 1).expect("window");
    let mut session = SolverSession::new(SteppingEngine::new());

    let err = drive(
        &mut session,
        &model(),
        &window,
        &TrackedEntities::new(["nowhere"]),
        &DriveOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SimError::Solver(SolverError::Query { ref entity, .. }) if entity == "nowhere"
    ));
}

#[test]
fn zero_progress_interval_is_rejected() {
    let window = resolve_window("2023-06-01", 1).expect("window");
    let mut session = SolverSession::new(SteppingEngine::new());
    let options = DriveOptions {
        progress_every: 0,
        ..DriveOptions::default()
    };
    assert!(matches!(
        drive(
            &mut session,
            &model(),
            &window,
            &TrackedEntities::none(),
            &options,
            None
        ),
        Err(SimError::InvalidArg { .. })
    ));
    assert_eq!(session.state(), SessionState::Uninitialized);
}
