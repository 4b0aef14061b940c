use clap::{Parser, Subcommand};
use mf_app::{
    AppError, AppResult, RunProgressEvent, RunRequest, RunStage, Session, container_views,
    describe_stop, edge_views, load_into, load_scenario_file, network_summary, run_with_progress,
    save_scenario_file, summarize,
};
use mf_project::{ScenarioFile, demo_scenario};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(about = "MixFlow CLI - Tank mixing network simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and build it through the container gate
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Show containers and edges of a scenario at tick 0
    Show {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario (the built-in demo when no path is given)
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: Option<PathBuf>,
        /// Number of ticks (overrides the scenario's run section)
        #[arg(long)]
        ticks: Option<u64>,
        /// Wall-clock pause per tick in milliseconds (overrides the scenario)
        #[arg(long)]
        cadence_ms: Option<u64>,
        /// Print a progress line every N ticks
        #[arg(long, default_value_t = 60)]
        report_every: u64,
        /// Keep running after a concentration exceeds 1
        #[arg(long)]
        no_stop_on_terminal: bool,
        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the built-in demo scenario
    Demo {
        /// Output file (.yaml, .yml or .json); prints YAML to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Show { scenario_path } => cmd_show(&scenario_path),
        Commands::Run {
            scenario_path,
            ticks,
            cadence_ms,
            report_every,
            no_stop_on_terminal,
            json,
        } => cmd_run(
            scenario_path.as_deref(),
            ticks,
            cadence_ms,
            report_every,
            !no_stop_on_terminal,
            json,
        ),
        Commands::Demo { output } => cmd_demo(output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let file = load_scenario_file(scenario_path)?;
    let mut session = Session::new();
    load_into(&mut session, &file)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_show(scenario_path: &Path) -> AppResult<()> {
    let file = load_scenario_file(scenario_path)?;
    let summary = summarize(&file);
    println!("Scenario: {} (version {})", summary.name, summary.version);
    println!(
        "  {} containers, {} edges",
        summary.container_count, summary.edge_count
    );
    if !summary.sinks.is_empty() {
        println!("  Sinks: {}", summary.sinks.join(", "));
    }
    if let Some(run) = &summary.run {
        println!("  Run: {} ticks at {} ms", run.ticks, run.cadence_ms);
    }

    let mut session = Session::new();
    load_into(&mut session, &file)?;
    print_state(&session);
    Ok(())
}

fn cmd_run(
    scenario_path: Option<&Path>,
    ticks: Option<u64>,
    cadence_ms: Option<u64>,
    report_every: u64,
    stop_on_terminal: bool,
    json: bool,
) -> AppResult<()> {
    let file = match scenario_path {
        Some(path) => load_scenario_file(path)?,
        None => demo_scenario(),
    };

    let mut request = file
        .run
        .as_ref()
        .map(RunRequest::from_run_def)
        .unwrap_or_default();
    if let Some(ticks) = ticks {
        request.ticks = ticks;
    }
    if let Some(ms) = cadence_ms {
        request.cadence = Duration::from_millis(ms);
    }
    if report_every == 0 {
        return Err(AppError::InvalidInput(
            "--report-every must be positive".to_string(),
        ));
    }
    request.record_every = report_every;
    request.stop_on_terminal = stop_on_terminal;

    tracing::debug!(?request, "run request");
    let mut session = Session::new();
    load_into(&mut session, &file)?;

    if !json {
        println!("Running scenario: {}", file.name);
        println!(
            "  ticks = {}, cadence = {} ms",
            request.ticks,
            request.cadence.as_millis()
        );
    }

    let mut last_emit = Instant::now();
    let response = run_with_progress(
        &mut session,
        &request,
        Some(&mut |event| {
            if json {
                return;
            }
            let is_tick = event.tick.is_some();
            if !is_tick || last_emit.elapsed().as_millis() >= 100 || request.cadence.is_zero() {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;

    if json {
        print_json(&session)?;
        return Ok(());
    }

    clear_progress_line();
    println!("✓ {}", describe_stop(&response.stop));
    println!(
        "  Ticks run: {}  Wall time: {:.3}s  Snapshots: {}",
        response.ticks_run,
        response.elapsed_wall_s,
        response.record.snapshots.len()
    );
    print_state(&session);
    Ok(())
}

fn cmd_demo(output: Option<&Path>) -> AppResult<()> {
    let demo = demo_scenario();
    match output {
        Some(path) => {
            save_scenario_file(path, &demo)?;
            println!("✓ Demo scenario written to {}", path.display());
        }
        None => print!("{}", demo_yaml(&demo)?),
    }
    Ok(())
}

fn demo_yaml(demo: &ScenarioFile) -> AppResult<String> {
    serde_yaml::to_string(demo).map_err(|e| AppError::InvalidInput(e.to_string()))
}

fn print_state(session: &Session) {
    let store = session.store();
    let summary = network_summary(store);

    println!("\nContainers (tick {}):", session.tick());
    println!(
        "  {:<16} {:>10} {:>10} {:>10} {:>8} {:>8}",
        "name", "level", "capacity", "conc", "in", "out"
    );
    for view in container_views(store) {
        println!(
            "  {:<16} {:>10.3} {:>10.3} {:>10} {:>8.3} {:>8.3}",
            view.name,
            view.liquid_level,
            view.max_capacity,
            view.concentration_text,
            view.in_rate,
            view.out_rate
        );
    }

    println!("\nEdges:");
    for view in edge_views(store) {
        let mut note = String::new();
        if !view.source_resolved {
            note.push_str("  (inert)");
        }
        if !view.destination_resolved {
            note.push_str("  (sink)");
        }
        println!(
            "  {} -> {}  {:.0}%  rate={:.4}  conc={}{}",
            view.source,
            view.destination,
            view.percent * 100.0,
            view.rate,
            view.concentration_text,
            note
        );
    }

    if summary.non_finite > 0 {
        println!(
            "\n{} container(s) have no defined concentration (N/A)",
            summary.non_finite
        );
    }
}

#[derive(Serialize)]
struct JsonState {
    tick: u64,
    summary: mf_app::NetworkSummary,
    containers: Vec<mf_app::ContainerView>,
    edges: Vec<mf_app::EdgeView>,
}

fn print_json(session: &Session) -> AppResult<()> {
    let store = session.store();
    let state = JsonState {
        tick: session.tick(),
        summary: network_summary(store),
        containers: container_views(store),
        edges: edge_views(store),
    };
    let text =
        serde_json::to_string_pretty(&state).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.tick) {
        (RunStage::Running, Some(t)) => {
            let width = 28usize;
            let filled = ((t.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            let mut line = format!(
                "\r[{}] {:>6.2}%  tick={}/{}  elapsed={:.1}s",
                bar,
                t.fraction_complete * 100.0,
                t.tick,
                t.max_ticks,
                event.elapsed_wall_s
            );
            if t.non_finite_containers > 0 {
                line.push_str(&format!("  n/a={}", t.non_finite_containers));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
        _ => {
            let mut line = format!(
                "\r{}  elapsed={:.2}s",
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
