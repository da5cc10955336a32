use crate::{
    analysis::{
        AnalysisTools,
        ModelSize,
    },
    core::RunOutcome,
};

pub type AnalysisOutcome = Result<RunOutcome, String>;

#[derive(Debug)]
pub enum TaskResult {
    LoadingMessage(String),
    ToolsLoaded { model_size: ModelSize, result: Result<AnalysisTools, String> },
    AnalysisComplete(AnalysisOutcome),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::LoadingMessage(_) => "loading_message",
            TaskResult::ToolsLoaded { .. } => "tools_loaded",
            TaskResult::AnalysisComplete(_) => "analysis_complete",
        }
    }
}
