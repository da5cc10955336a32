use std::{
    sync::mpsc,
    thread,
};

use log::{
    error,
    info,
};

use super::TaskResult;
use crate::analysis::{
    run_analysis,
    AnalysisRequest,
    AnalysisTools,
    ModelSize,
};

/// Runs slow work off the UI thread and hands results back through a channel that the app
/// drains once per frame.
pub struct TaskManager {
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> mpsc::Sender<TaskResult> {
        self.sender.clone()
    }

    pub fn load_tools(&self, model_size: ModelSize) {
        let sender = self.task_context();

        thread::spawn(move || {
            let _ = sender.send(TaskResult::LoadingMessage("Loading analysis tools...".to_string()));

            let sender_clone = sender.clone();
            let progress_callback = Box::new(move |message: String| {
                let _ = sender_clone.send(TaskResult::LoadingMessage(message));
            });

            let result = AnalysisTools::load(model_size, Some(progress_callback)).map_err(|e| {
                error!("Failed to load analysis tools: {}", e);
                e.to_string()
            });

            if result.is_ok() {
                info!("Analysis tools ready ({})", model_size);
            }

            let _ = sender.send(TaskResult::ToolsLoaded { model_size, result });
        });
    }

    pub fn run_analysis(&self, request: AnalysisRequest, tools: AnalysisTools) {
        let sender = self.task_context();

        thread::spawn(move || {
            let result = run_analysis(&request, &tools).map_err(|e| e.to_string());
            let _ = sender.send(TaskResult::AnalysisComplete(result));
        });
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        time::{
            Duration,
            Instant,
        },
    };

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

    struct AlwaysPositive;

    impl SentimentClassifier for AlwaysPositive {
        fn classify(&self, _text: &str) -> Result<Sentiment> {
            Ok(Sentiment::new(SentimentLabel::Positive, 0.8))
        }
    }

    struct NoKeywords;

    impl KeywordExtractor for NoKeywords {
        fn extract(&self, _text: &str, _top_n: usize) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn wait_for_result(manager: &mut TaskManager) -> TaskResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = manager.poll_results().into_iter().next() {
                return result;
            }
            assert!(Instant::now() < deadline, "Timed out waiting for task result");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_analysis_result_is_posted_back() {
        let mut manager = TaskManager::new();
        let tools = AnalysisTools::new(Arc::new(AlwaysPositive), Arc::new(NoKeywords));

        manager.run_analysis(AnalysisRequest::new(Vec::new(), "great value"), tools);

        match wait_for_result(&mut manager) {
            TaskResult::AnalysisComplete(Ok(outcome)) => {
                let single = outcome.single_text.expect("single text result");
                assert_eq!(single.sentiment, SentimentLabel::Positive);
            }
            other => panic!("Unexpected task result: {:?}", other.task_type()),
        }
    }

    #[test]
    fn test_analysis_error_is_posted_as_string() {
        let mut manager = TaskManager::new();
        let tools = AnalysisTools::new(Arc::new(AlwaysPositive), Arc::new(NoKeywords));

        manager.run_analysis(AnalysisRequest::default(), tools);

        match wait_for_result(&mut manager) {
            TaskResult::AnalysisComplete(Err(message)) => {
                assert_eq!(message, "Please provide input via file upload or text box.");
            }
            other => panic!("Unexpected task result: {:?}", other.task_type()),
        }
    }

    #[test]
    fn test_poll_is_empty_without_tasks() {
        let mut manager = TaskManager::new();
        assert!(manager.poll_results().is_empty());
    }
}
