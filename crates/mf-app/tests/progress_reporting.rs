//! Integration tests for the paced run loop and its progress events.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mf_app::{
    RunProgressEvent, RunRequest, RunStage, Session, load_into, load_scenario_file,
    run_with_progress,
};
use mf_sim::StopReason;

fn scenario_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("scenarios");
    path.push(name);
    path
}

fn session_for(name: &str) -> Session {
    let file = load_scenario_file(&scenario_path(name)).expect("scenario should load");
    let mut session = Session::new();
    load_into(&mut session, &file).expect("scenario should build");
    session
}

fn collect_events(
    session: &mut Session,
    request: &RunRequest,
) -> (mf_app::RunResponse, Vec<RunProgressEvent>) {
    let mut events = Vec::new();
    let response = run_with_progress(session, request, Some(&mut |event| events.push(event)))
        .expect("run with progress should succeed");
    (response, events)
}

#[test]
fn tick_progress_is_reported_on_decimation() {
    let mut session = session_for("02_cascade.yaml");
    let request = RunRequest {
        ticks: 120,
        record_every: 30,
        ..RunRequest::default()
    }
    .unpaced();

    let (response, events) = collect_events(&mut session, &request);
    assert_eq!(response.stop, StopReason::TickLimit);
    assert_eq!(response.ticks_run, 120);
    assert_eq!(session.tick(), 120);
    assert!(!session.is_running());

    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| e.tick.as_ref().map(|t| t.tick))
        .collect();
    assert_eq!(ticks, vec![30, 60, 90, 120]);
    assert!(matches!(
        events.last().map(|e| &e.stage),
        Some(RunStage::Completed)
    ));
}

#[test]
fn terminal_run_stops_early() {
    let mut session = session_for("03_overdose.yaml");
    let request = RunRequest::default().unpaced();

    let (response, events) = collect_events(&mut session, &request);
    assert_eq!(response.ticks_run, 1);
    assert!(matches!(response.stop, StopReason::Terminal(_)));

    let last = events.last().expect("completion event");
    assert_eq!(
        last.message.as_deref(),
        Some("Concentration exceeded 1 in Tank")
    );
    let terminal_event = events
        .iter()
        .find_map(|e| e.tick.as_ref())
        .expect("terminal tick is always reported");
    assert_eq!(terminal_event.terminal_containers, 1);
}

#[test]
fn preset_cancel_flag_runs_no_ticks() {
    let mut session = session_for("02_cascade.yaml");
    let before = session.store().clone();
    let cancel = Arc::new(AtomicBool::new(true));
    let request = RunRequest {
        ticks: 10,
        cancel: Some(Arc::clone(&cancel)),
        ..RunRequest::default()
    }
    .unpaced();

    let response = mf_app::run(&mut session, &request).unwrap();
    assert_eq!(response.stop, StopReason::Requested);
    assert_eq!(response.ticks_run, 0);
    assert_eq!(session.tick(), 0);
    assert_eq!(session.store().containers(), before.containers());
    assert_eq!(session.store().edges(), before.edges());
    assert_eq!(response.record.ticks, vec![0]);
    assert!(!session.is_running());
}

#[test]
fn cancel_raised_mid_run_stops_after_that_tick() {
    let mut session = session_for("02_cascade.yaml");
    let cancel = Arc::new(AtomicBool::new(false));
    let request = RunRequest {
        ticks: 1_000,
        cadence: Duration::from_millis(1),
        record_every: 30,
        cancel: Some(Arc::clone(&cancel)),
        ..RunRequest::default()
    };

    // Raised while the observer is still inside this tick, before its pause.
    let flag = Arc::clone(&cancel);
    let response = run_with_progress(
        &mut session,
        &request,
        Some(&mut |event: RunProgressEvent| {
            if event.tick.as_ref().is_some_and(|t| t.tick == 30) {
                flag.store(true, Ordering::Relaxed);
            }
        }),
    )
    .unwrap();
    assert_eq!(response.stop, StopReason::Requested);
    assert_eq!(response.ticks_run, 30);
    assert_eq!(session.tick(), 30);
}

#[test]
fn paced_run_takes_wall_time() {
    let mut session = session_for("01_two_tanks.yaml");
    let request = RunRequest {
        ticks: 3,
        cadence: Duration::from_millis(5),
        record_every: 1,
        ..RunRequest::default()
    };
    let response = mf_app::run(&mut session, &request).unwrap();
    assert!(response.elapsed_wall_s >= 0.015);
}

#[test]
fn invalid_request_is_refused() {
    let mut session = session_for("01_two_tanks.yaml");
    let request = RunRequest {
        ticks: 0,
        ..RunRequest::default()
    };
    assert!(matches!(
        mf_app::run(&mut session, &request),
        Err(mf_app::AppError::Simulation(_))
    ));
    assert!(!session.is_running());
}
