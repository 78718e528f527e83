#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    ResolvingWindow,
    LocatingModel,
    Simulating,
    AssemblingResults,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::ResolvingWindow => "Resolving window",
            RunStage::LocatingModel => "Locating model",
            RunStage::Simulating => "Simulating",
            RunStage::AssemblingResults => "Assembling results",
            RunStage::SavingResults => "Saving results",
            RunStage::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayProgress {
    pub day: usize,
    pub step: usize,
    pub total_steps: usize,
    pub fraction_complete: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub day: Option<DayProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            day: None,
        }
    }
}
