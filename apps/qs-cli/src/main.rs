use clap::{Args, Parser, Subcommand};
use qs_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, RunTimingSummary,
    config_service, query, run_service,
};
use qs_core::CircuitScope;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qs-cli")]
#[command(
    about = "qsts-run - Quasi-static time-series power-flow runs over distribution circuits",
    long_about = None
)]
struct Cli {
    /// Path to the run configuration YAML file
    #[arg(long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ScopeArgs {
    /// City code of the dataset
    #[arg(short, long, default_value = "SFO")]
    city: String,
    /// Subregion code
    #[arg(short = 'r', long, default_value = "P13U")]
    subregion: String,
    /// Substation; omit to simulate the whole subregion
    #[arg(short, long)]
    substation: Option<String>,
    /// Feeder; omit to simulate the whole substation
    #[arg(short, long, requires = "substation")]
    feeder: Option<String>,
}

impl ScopeArgs {
    fn scope(&self) -> AppResult<CircuitScope> {
        Ok(CircuitScope::new(
            self.subregion.clone(),
            self.substation.clone(),
            self.feeder.clone(),
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and store its result tables
    Run {
        /// Scenario name (e.g. base_timeseries)
        scenario: String,
        /// Start date, YYYY-MM-DD
        start_date: String,
        /// Number of days to simulate
        #[arg(allow_negative_numbers = true)]
        days: i64,
        #[command(flatten)]
        scope: ScopeArgs,
        /// Do not draw the compile spinner
        #[arg(long)]
        quiet: bool,
    },
    /// Load and validate the configuration file
    Validate,
    /// Print the circuit model a run would use
    Locate {
        /// Scenario name
        scenario: String,
        /// Dataset year
        year: i32,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Show details of a stored run
    ShowRun {
        /// Run directory
        run_dir: PathBuf,
        /// Print one table column as CSV
        #[arg(long, requires = "column")]
        table: Option<String>,
        /// Column of --table to print
        #[arg(long, requires = "table")]
        column: Option<String>,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    report(dispatch(cli), &mut io::stderr())
}

/// Print a fault as its display message and map it to the exit status.
fn report(result: AppResult<()>, err_out: &mut impl Write) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(err_out, "Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Run {
            scenario,
            start_date,
            days,
            scope,
            quiet,
        } => cmd_run(&cli.config, &scenario, &start_date, days, &scope, !quiet),
        Commands::Validate => cmd_validate(&cli.config),
        Commands::Locate {
            scenario,
            year,
            scope,
        } => cmd_locate(&cli.config, &scenario, year, &scope),
        Commands::ShowRun {
            run_dir,
            table,
            column,
        } => match (table, column) {
            (Some(table), Some(column)) => cmd_export_series(&run_dir, &table, &column),
            _ => cmd_show_run(&run_dir),
        },
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let summary = config_service::validate_config_file(config_path)?;
    println!("✓ Config is valid");
    println!("  Circuits: {}", summary.circuit_base_path.display());
    println!("  Results:  {}", summary.results_base_path.display());
    println!("  Solver:   {}", summary.solver_command);
    if summary.tracked_buses.is_empty() {
        println!("  Buses:    none (only source power is recorded)");
    } else {
        println!("  Buses:    {}", summary.tracked_buses.join(", "));
    }
    Ok(())
}

fn cmd_locate(config_path: &Path, scenario: &str, year: i32, scope: &ScopeArgs) -> AppResult<()> {
    let config = config_service::load_config(config_path)?;
    let scope_def = scope.scope()?;
    let model = config_service::locate_model(&config, year, &scope.city, scenario, &scope_def)?;
    println!("✓ {}", model.display());
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    scenario: &str,
    start_date: &str,
    days: i64,
    scope: &ScopeArgs,
    show_indicator: bool,
) -> AppResult<()> {
    let config = config_service::load_config(config_path)?;
    let scope_def = scope.scope()?;
    tracing::debug!(config = %config_path.display(), scope = scope_def.name(), "run requested");

    println!(
        "Running scenario '{}' for {} from {} ({} day(s))",
        scenario,
        scope_def.name(),
        start_date,
        days
    );

    let request = RunRequest {
        config: &config,
        scenario,
        start_date,
        days,
        city: &scope.city,
        scope: &scope_def,
        options: RunOptions { show_indicator },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run(
        &request,
        Some(&mut |event| {
            let emit_now = last_stage != Some(event.stage)
                || event.day.is_some()
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Simulation completed: {}", response.run_dir.display());
    println!("  Model: {}", response.model_path.display());
    println!(
        "  Steps: {} (from hour {} of {})",
        response.window.step_count(),
        response.window.start_hour_of_year(),
        response.window.year()
    );
    println!("  Tables:");
    for (name, table) in &response.tables {
        println!(
            "    {} ({} rows, {} columns)",
            name,
            table.row_count(),
            table.columns.len()
        );
    }

    print_timing_summary(&response.timing);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.day) {
        (RunStage::Simulating, Some(d)) => {
            let width = 28usize;
            let filled = ((d.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  day={}  step={}/{}  elapsed={:.1}s",
                bar,
                d.fraction_complete * 100.0,
                d.day,
                d.step,
                d.total_steps,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_timing_summary(timing: &RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let simulate_pct = 100.0 * timing.simulate_time_s / total;
    let assemble_pct = 100.0 * timing.assemble_time_s / total;
    let save_pct = 100.0 * timing.save_time_s / total;

    println!("\nTiming summary:");
    println!(
        "  Simulate: {:.3}s ({:.1}%)",
        timing.simulate_time_s, simulate_pct
    );
    println!(
        "  Assemble: {:.3}s ({:.1}%)",
        timing.assemble_time_s, assemble_pct
    );
    println!("  Save:     {:.3}s ({:.1}%)", timing.save_time_s, save_pct);
    println!("  Total:    {:.3}s", timing.total_time_s);
}

fn cmd_show_run(run_dir: &Path) -> AppResult<()> {
    println!("Loading run: {}", run_dir.display());

    let summary = query::summarize_run(run_dir)?;
    let manifest = &summary.manifest;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario);
    println!("  Scope: {}", manifest.scope);
    println!(
        "  Window: {} + {} day(s), start hour {}",
        manifest.start_date, manifest.days, manifest.start_hour_of_year
    );
    println!(
        "  Steps: {} x {} min",
        manifest.step_count, manifest.step_minutes
    );
    println!("  Created: {}", manifest.created);
    println!("  Tables:");
    for table in &summary.tables {
        match table.time_range {
            Some((first, last)) => println!(
                "    {} ({} rows, {} columns) {} .. {}",
                table.name,
                table.rows,
                table.columns.len(),
                first,
                last
            ),
            None => println!("    {} (empty)", table.name),
        }
    }
    Ok(())
}

fn cmd_export_series(run_dir: &Path, table: &str, column: &str) -> AppResult<()> {
    let series = query::extract_series(run_dir, table, column)?;
    let mut out = io::stdout().lock();
    writeln!(out, "timestamp,{}", column)?;
    for (ts, value) in series {
        writeln!(out, "{},{}", ts.format("%Y-%m-%d %H:%M:%S"), value)?;
    }
    Ok(())
}
