//! Paced run loop over a session.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use mf_graph::GraphStore;
use mf_project::RunDef;
use mf_sim::{
    NetworkSnapshot, SimOptions, SimRecord, StepReport, StopReason, TickObserver, run_sim,
};
use tracing::info;

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, TickProgress};
use crate::session::Session;

/// Request to execute a run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub ticks: u64,
    /// Wall-clock pause after each tick. Zero runs as fast as possible.
    pub cadence: Duration,
    /// Snapshot and progress decimation.
    pub record_every: u64,
    pub stop_on_terminal: bool,
    /// Set from another thread to stop at the next tick boundary.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            ticks: 600,
            cadence: Duration::from_millis(16),
            record_every: 60,
            stop_on_terminal: true,
            cancel: None,
        }
    }
}

impl RunRequest {
    /// Build a request from the run section of a scenario file.
    pub fn from_run_def(run: &RunDef) -> Self {
        Self {
            ticks: run.ticks,
            cadence: Duration::from_millis(run.cadence_ms),
            ..Self::default()
        }
    }

    /// Whether the cancel flag has been raised.
    pub fn cancel_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|cancel| cancel.load(Ordering::Relaxed))
    }

    /// Same request without wall-clock pacing.
    pub fn unpaced(mut self) -> Self {
        self.cadence = Duration::ZERO;
        self
    }
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub record: SimRecord,
    pub ticks_run: u64,
    /// Session tick counter after the run.
    pub session_tick: u64,
    pub stop: StopReason,
    pub elapsed_wall_s: f64,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    tick: Option<TickProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        let elapsed_wall_s = started.elapsed().as_secs_f64();
        cb(RunProgressEvent {
            tick,
            ..RunProgressEvent::stage(stage, elapsed_wall_s, message)
        });
    }
}

struct PacedObserver<'a, 'cb> {
    request: &'a RunRequest,
    started: Instant,
    progress_cb: &'a mut Option<&'cb mut dyn FnMut(RunProgressEvent)>,
}

impl TickObserver for PacedObserver<'_, '_> {
    fn on_tick_completed(
        &mut self,
        tick: u64,
        report: &StepReport,
        _store: &GraphStore,
    ) -> ControlFlow<()> {
        if tick % self.request.record_every == 0 || report.is_terminal() {
            emit_progress(
                self.progress_cb,
                RunStage::Running,
                self.started,
                None,
                Some(TickProgress {
                    tick,
                    max_ticks: self.request.ticks,
                    fraction_complete: tick as f64 / self.request.ticks as f64,
                    terminal_containers: report.terminal.len(),
                    non_finite_containers: report.non_finite,
                }),
            );
        }

        if !self.request.cadence.is_zero() {
            std::thread::sleep(self.request.cadence);
        }
        if self.request.cancel_requested() {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

/// Run the session's network.
pub fn run(session: &mut Session, request: &RunRequest) -> AppResult<RunResponse> {
    run_with_progress(session, request, None)
}

/// Run the session's network and stream progress events.
///
/// The session is marked running for the duration and stopped afterwards,
/// whatever the stop reason.
pub fn run_with_progress(
    session: &mut Session,
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let opts = SimOptions {
        max_ticks: request.ticks,
        record_every: request.record_every,
        stop_on_terminal: request.stop_on_terminal,
    };
    opts.validate()?;

    if request.cancel_requested() {
        info!("run cancelled before the first tick");
        let record = SimRecord {
            ticks: vec![0],
            snapshots: vec![NetworkSnapshot::capture(session.store())],
            ticks_run: 0,
            stop: StopReason::Requested,
        };
        return Ok(finish(session, record, started, &mut progress_cb));
    }

    emit_progress(
        &mut progress_cb,
        RunStage::Running,
        started,
        Some(format!("Running {} ticks", request.ticks)),
        None,
    );

    session.start();
    let result = {
        let mut observer = PacedObserver {
            request,
            started,
            progress_cb: &mut progress_cb,
        };
        run_sim(session.store_mut(), &opts, &mut observer)
    };
    session.stop();
    Ok(finish(session, result?, started, &mut progress_cb))
}

fn finish(
    session: &mut Session,
    record: SimRecord,
    started: Instant,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
) -> RunResponse {
    session.advance_ticks(record.ticks_run);

    let elapsed_wall_s = started.elapsed().as_secs_f64();
    info!(
        ticks_run = record.ticks_run,
        session_tick = session.tick(),
        elapsed_wall_s,
        "run service finished"
    );
    emit_progress(
        progress_cb,
        RunStage::Completed,
        started,
        Some(describe_stop(&record.stop)),
        None,
    );

    RunResponse {
        ticks_run: record.ticks_run,
        session_tick: session.tick(),
        stop: record.stop.clone(),
        record,
        elapsed_wall_s,
    }
}

/// One-line description of why a run stopped.
pub fn describe_stop(stop: &StopReason) -> String {
    match stop {
        StopReason::TickLimit => "Tick limit reached".to_string(),
        StopReason::Requested => "Stopped on request".to_string(),
        StopReason::Terminal(hit) => {
            let names: Vec<&str> = hit.iter().map(|t| t.name.as_str()).collect();
            format!("Concentration exceeded 1 in {}", names.join(", "))
        }
    }
}
