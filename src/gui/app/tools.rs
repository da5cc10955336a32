use log::debug;

use crate::{
    analysis::{
        AnalysisTools,
        ModelSize,
    },
    gui::top_bar::ToolsStatus,
};

/// The analysis tools in use and the model they are expected to run.
pub struct ToolsState {
    tools: Option<AnalysisTools>,
    status: ToolsStatus,
    requested: ModelSize,
}

impl ToolsState {
    pub fn loading(model_size: ModelSize) -> Self {
        Self { tools: None, status: ToolsStatus::Loading, requested: model_size }
    }

    pub fn status(&self) -> ToolsStatus {
        self.status
    }

    pub fn tools(&self) -> Option<&AnalysisTools> {
        self.tools.as_ref()
    }

    /// Drops the current tools while `model_size` loads.
    pub fn reload(&mut self, model_size: ModelSize) {
        self.tools = None;
        self.status = ToolsStatus::Loading;
        self.requested = model_size;
    }

    pub fn reconfigure(&mut self, configure: impl FnOnce(AnalysisTools) -> AnalysisTools) {
        if let Some(tools) = self.tools.take() {
            self.tools = Some(configure(tools));
        }
    }

    /// Stores a finished load and hands back its error, if any.
    ///
    /// Returns `None` for a load of a model that is no longer selected; it is dropped and the
    /// state keeps waiting for the current one.
    pub fn finish(
        &mut self,
        model_size: ModelSize,
        result: Result<AnalysisTools, String>,
    ) -> Option<Result<(), String>> {
        if model_size != self.requested {
            debug!("Dropping {} tools, {} is selected", model_size, self.requested);
            return None;
        }

        match result {
            Ok(tools) => {
                self.tools = Some(tools);
                self.status = ToolsStatus::Ready;
                Some(Ok(()))
            }
            Err(e) => {
                self.status = ToolsStatus::Failed;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        analysis::{
            KeywordExtractor,
            SentimentClassifier,
        },
        core::{
            Result,
            Sentiment,
            SentimentLabel,
        },
    };

    struct Fixed;

    impl SentimentClassifier for Fixed {
        fn classify(&self, _text: &str) -> Result<Sentiment> {
            Ok(Sentiment::new(SentimentLabel::Neutral, 0.5))
        }
    }

    impl KeywordExtractor for Fixed {
        fn extract(&self, _text: &str, _top_n: usize) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn tools() -> AnalysisTools {
        AnalysisTools::new(Arc::new(Fixed), Arc::new(Fixed))
    }

    #[test]
    fn test_late_load_of_previous_model_is_dropped() {
        let mut state = ToolsState::loading(ModelSize::Base);
        state.reload(ModelSize::Large);

        assert!(state.finish(ModelSize::Base, Ok(tools())).is_none());
        assert!(state.tools().is_none());
        assert_eq!(state.status(), ToolsStatus::Loading);

        assert!(state.finish(ModelSize::Base, Err("offline".to_string())).is_none());
        assert_eq!(state.status(), ToolsStatus::Loading);

        assert_eq!(state.finish(ModelSize::Large, Ok(tools())), Some(Ok(())));
        assert!(state.tools().is_some());
        assert_eq!(state.status(), ToolsStatus::Ready);
    }

    #[test]
    fn test_failed_load_of_selected_model_is_reported() {
        let mut state = ToolsState::loading(ModelSize::Base);

        assert_eq!(
            state.finish(ModelSize::Base, Err("offline".to_string())),
            Some(Err("offline".to_string()))
        );
        assert_eq!(state.status(), ToolsStatus::Failed);
        assert!(state.tools().is_none());
    }

    #[test]
    fn test_reconfigure_keeps_loaded_tools() {
        let mut state = ToolsState::loading(ModelSize::Base);
        state.reconfigure(|tools| tools.with_keyword_count(2));
        assert!(state.tools().is_none());

        let _ = state.finish(ModelSize::Base, Ok(tools()));
        state.reconfigure(|tools| tools.with_keyword_count(2));
        assert_eq!(state.tools().map(|t| t.keyword_count), Some(2));
    }
}
