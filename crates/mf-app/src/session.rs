//! Interactive editing and stepping session.
//!
//! A [`Session`] owns one [`GraphStore`] and the run-loop flags a frontend
//! needs: whether ticking is enabled and how many ticks have elapsed since
//! the last reset.

use mf_core::{ContainerId, EdgeId, Real};
use mf_graph::{Container, ContainerDraft, FlowEdge, GraphStore};
use std::ops::ControlFlow;

use mf_sim::{NoopObserver, Scenario, StepReport, TickObserver};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct Session {
    store: GraphStore,
    tick: u64,
    running: bool,
    scenario_name: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    /// Ticks completed since the last reset, clear, or load.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn advance_ticks(&mut self, ticks: u64) {
        self.tick += ticks;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scenario_name(&self) -> Option<&str> {
        self.scenario_name.as_deref()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Flip the running flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Validate and insert a container with its outputs.
    pub fn add_container(&mut self, draft: ContainerDraft) -> AppResult<ContainerId> {
        Ok(self.store.commit(draft)?)
    }

    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
        percent: Real,
    ) -> AppResult<EdgeId> {
        Ok(self.store.add_edge(source, destination, percent)?)
    }

    /// Remove a container and its outbound edges. Missing names are a no-op.
    pub fn remove_container(&mut self, name: &str) -> Option<Container> {
        self.store.remove_container(name)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> AppResult<FlowEdge> {
        self.store.remove_edge(id).ok_or(AppError::EdgeNotFound(id))
    }

    /// Restore every container's baseline. The running flag is kept.
    pub fn reset(&mut self) {
        mf_sim::reset(&mut self.store);
        self.tick = 0;
    }

    /// Stop and remove everything.
    pub fn clear(&mut self) {
        self.running = false;
        mf_sim::clear(&mut self.store);
        self.tick = 0;
        self.scenario_name = None;
    }

    /// Stop and replace the network with `scenario`.
    ///
    /// On failure the session is left empty.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> AppResult<()> {
        self.running = false;
        self.tick = 0;
        self.scenario_name = None;
        mf_sim::load_scenario(&mut self.store, scenario)?;
        self.scenario_name = Some(scenario.name.clone());
        Ok(())
    }

    /// Advance one tick. A terminal report stops the session.
    pub fn step_once(&mut self) -> StepReport {
        self.step_observed(&mut NoopObserver)
    }

    /// Advance one tick and notify `observer` once the tick is complete.
    ///
    /// A terminal report or a `Break` from the observer stops the session.
    pub fn step_observed<O: TickObserver + ?Sized>(&mut self, observer: &mut O) -> StepReport {
        let report = mf_sim::step_once(&mut self.store);
        self.tick += 1;
        if report.is_terminal() && self.running {
            warn!(tick = self.tick, "terminal concentration, stopping");
            self.running = false;
        }
        if let ControlFlow::Break(()) = observer.on_tick_completed(self.tick, &report, &self.store)
        {
            debug!(tick = self.tick, "observer stopped the session");
            self.running = false;
        }
        report
    }

    /// Step only if running. Returns `None` when stopped.
    pub fn tick_if_running(&mut self) -> Option<StepReport> {
        self.tick_if_running_observed(&mut NoopObserver)
    }

    pub fn tick_if_running_observed<O: TickObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Option<StepReport> {
        if !self.running {
            debug!("tick skipped, session stopped");
            return None;
        }
        Some(self.step_observed(observer))
    }
}
