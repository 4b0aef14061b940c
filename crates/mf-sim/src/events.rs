//! Per-tick reports and run-loop stop reasons.

use mf_core::{ContainerId, Real};

/// Concentration above which a running simulation ends.
pub const TERMINAL_CONCENTRATION: Real = 1.0;

/// A container that crossed the terminal concentration this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalContainer {
    pub id: ContainerId,
    pub name: String,
    pub concentration: Real,
}

/// What one call of [`step_once`](crate::step_once) observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Containers whose concentration now exceeds 1.
    pub terminal: Vec<TerminalContainer>,
    /// Containers whose concentration is NaN or infinite.
    pub non_finite: usize,
}

impl StepReport {
    /// Whether the run loop should stop after this tick.
    pub fn is_terminal(&self) -> bool {
        !self.terminal.is_empty()
    }
}

/// Why a run loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The configured tick budget was used up.
    TickLimit,
    /// Some container's concentration exceeded 1.
    Terminal(Vec<TerminalContainer>),
    /// The observer or the user asked to stop.
    Requested,
}

/// NaN never counts as terminal.
pub(crate) fn is_terminal_concentration(concentration: Real) -> bool {
    concentration > TERMINAL_CONCENTRATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_threshold_is_strict() {
        assert!(!is_terminal_concentration(1.0));
        assert!(is_terminal_concentration(1.0 + 1e-9));
        assert!(!is_terminal_concentration(Real::NAN));
    }

    #[test]
    fn empty_report_is_not_terminal() {
        assert!(!StepReport::default().is_terminal());
    }
}
