#[derive(Debug, Clone, PartialEq)]
pub enum RunStage {
    Running,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::Running => "Running",
            RunStage::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickProgress {
    pub tick: u64,
    pub max_ticks: u64,
    pub fraction_complete: f64,
    pub terminal_containers: usize,
    pub non_finite_containers: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub tick: Option<TickProgress>,
}

impl RunProgressEvent {
    /// Event without tick detail.
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            tick: None,
        }
    }
}
