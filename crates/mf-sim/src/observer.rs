//! Hook for views that redraw after each tick.

use std::ops::ControlFlow;

use mf_graph::GraphStore;

use crate::events::StepReport;

/// Notified after every completed tick.
///
/// Returning `ControlFlow::Break(())` stops the run loop at this tick boundary.
pub trait TickObserver {
    fn on_tick_completed(
        &mut self,
        tick: u64,
        report: &StepReport,
        store: &GraphStore,
    ) -> ControlFlow<()>;
}

impl<F> TickObserver for F
where
    F: FnMut(u64, &StepReport, &GraphStore) -> ControlFlow<()>,
{
    fn on_tick_completed(
        &mut self,
        tick: u64,
        report: &StepReport,
        store: &GraphStore,
    ) -> ControlFlow<()> {
        self(tick, report, store)
    }
}

/// Observer that never interrupts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TickObserver for NoopObserver {
    fn on_tick_completed(&mut self, _: u64, _: &StepReport, _: &GraphStore) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
