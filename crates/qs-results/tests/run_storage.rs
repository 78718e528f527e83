use std::collections::BTreeMap;
use std::path::PathBuf;

use qs_core::{CircuitScope, RawSeries, SeriesKind, resolve_window};
use qs_results::{
    ResultsError, RunLayout, RunStore, assemble_run, index_tables,
};

fn feeder_scope() -> CircuitScope {
    CircuitScope::new(
        "P13U",
        Some("p13uhs0_1247".into()),
        Some("p13udt13213".into()),
    )
    .expect("scope")
}

fn one_day_tables() -> BTreeMap<String, qs_results::TimestampedTable> {
    let window = resolve_window("2023-06-01", 1).expect("window");
    let mut bus = RawSeries::new("p13udt13213-p13udt13213lv", SeriesKind::Voltage);
    let mut source = RawSeries::new("source", SeriesKind::Power);
    for step in 0..window.step_count() {
        let s = step as f64;
        bus.push(vec![120.0 + s * 0.001, -0.25, 119.5, -120.125]);
        source.push(vec![1.5e3 + s, 2.0e2, 1.4e3, 1.9e2, 1.6e3, 2.1e2]);
    }
    let tables = assemble_run(&[bus], &[source]).expect("assemble");
    index_tables(tables, window.start_date()).expect("index")
}

#[test]
fn run_directory_follows_year_scenario_scope_window() {
    let window = resolve_window("2023-06-01", 1).expect("window");
    let layout = RunLayout::new(window, "base_timeseries", &feeder_scope());
    assert_eq!(
        layout.relative_dir(),
        PathBuf::from("2023/base_timeseries/p13udt13213/run_2023-06-01_1_days")
    );

    let subregion = CircuitScope::new("P13U", None, None).expect("scope");
    let window = resolve_window("2021-03-10", 7).expect("window");
    let layout = RunLayout::new(window, "high_pv", &subregion);
    assert_eq!(
        layout.relative_dir(),
        PathBuf::from("2021/high_pv/P13U/run_2021-03-10_7_days")
    );
}

#[test]
fn saved_tables_load_back_unchanged() {
    let root = tempfile::tempdir().expect("tempdir");
    let store = RunStore::new(root.path().join("results"));
    let window = resolve_window("2023-06-01", 1).expect("window");
    let layout = RunLayout::new(window, "base_timeseries", &feeder_scope());
    let tables = one_day_tables();

    let run_dir = store.save_run(&layout, &tables).expect("save");
    assert_eq!(
        run_dir,
        root.path()
            .join("results/2023/base_timeseries/p13udt13213/run_2023-06-01_1_days")
    );
    assert!(run_dir.join("p13udt13213-p13udt13213lv.parquet").is_file());
    assert!(run_dir.join("power_source.parquet").is_file());

    let names = RunStore::list_tables(&run_dir).expect("list");
    assert_eq!(names, vec!["p13udt13213-p13udt13213lv", "power_source"]);

    let loaded = RunStore::load_run(&run_dir).expect("load");
    assert_eq!(loaded, tables);

    let bus = &loaded["p13udt13213-p13udt13213lv"];
    assert_eq!(bus.labels(), vec!["V_A", "Angle_A", "V_B", "Angle_B"]);
    assert_eq!(bus.index[0].to_string(), "2023-06-01 00:15:00");
    assert_eq!(bus.index[95].to_string(), "2023-06-02 00:00:00");
}

#[test]
fn manifest_describes_the_run() {
    let root = tempfile::tempdir().expect("tempdir");
    let store = RunStore::new(root.path().to_path_buf());
    let window = resolve_window("2023-06-01", 1).expect("window");
    let layout = RunLayout::new(window, "base_timeseries", &feeder_scope());
    let run_dir = store.save_run(&layout, &one_day_tables()).expect("save");

    let manifest = RunStore::load_manifest(&run_dir).expect("manifest");
    assert_eq!(manifest.scenario, "base_timeseries");
    assert_eq!(manifest.scope, "p13udt13213");
    assert_eq!(manifest.start_date, "2023-06-01");
    assert_eq!(manifest.start_hour_of_year, 3624);
    assert_eq!(manifest.step_count, 96);
    assert_eq!(manifest.tables.len(), 2);
    let power = &manifest.tables[1];
    assert_eq!(power.name, "power_source");
    assert_eq!(power.rows, 96);
    assert_eq!(power.first_timestamp.as_deref(), Some("2023-06-01 00:15:00"));
}

#[test]
fn saving_again_overwrites_existing_files() {
    let root = tempfile::tempdir().expect("tempdir");
    let store = RunStore::new(root.path().to_path_buf());
    let window = resolve_window("2023-06-01", 1).expect("window");
    let layout = RunLayout::new(window, "base_timeseries", &feeder_scope());

    let mut tables = one_day_tables();
    store.save_run(&layout, &tables).expect("first save");
    if let Some(t) = tables.get_mut("power_source") {
        t.columns[0].values.iter_mut().for_each(|v| *v = -1.0);
    }
    let run_dir = store.save_run(&layout, &tables).expect("second save");

    let reloaded = RunStore::load_table(&run_dir, "power_source").expect("load");
    assert!(reloaded.columns[0].values.iter().all(|v| *v == -1.0));
}

#[test]
fn empty_mapping_writes_nothing() {
    let root = tempfile::tempdir().expect("tempdir");
    let store = RunStore::new(root.path().join("results"));
    let window = resolve_window("2023-06-01", 1).expect("window");
    let layout = RunLayout::new(window, "base_timeseries", &feeder_scope());

    let run_dir = store.save_run(&layout, &BTreeMap::new()).expect("save");
    assert!(!run_dir.exists());
    assert!(matches!(
        RunStore::load_manifest(&run_dir),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn table_names_cannot_leave_the_run_directory() {
    let root = tempfile::tempdir().expect("tempdir");
    let results = root.path().join("results");
    let store = RunStore::new(results.clone());
    let window = resolve_window("2023-06-01", 1).expect("window");
    let layout = RunLayout::new(window, "base", &CircuitScope::new("P13U", None, None).expect("scope"));

    let mut tables = one_day_tables();
    let escaping = tables["power_source"].clone();
    tables.insert("../../../../escaped".to_string(), escaping);

    match store.save_run(&layout, &tables) {
        Err(ResultsError::MalformedTable { name, .. }) => assert_eq!(name, "../../../../escaped"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!results.join("escaped.parquet").exists());
    assert!(!store.run_dir(&layout).exists(), "nothing is written when a name is rejected");

    assert!(matches!(
        RunStore::load_table(&store.run_dir(&layout), "../manifest"),
        Err(ResultsError::MalformedTable { .. })
    ));
}
