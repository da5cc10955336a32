pub mod batch;
pub mod keywords;
pub mod sentiment;
mod stopwords;

use std::sync::Arc;

pub use batch::{
    analyze_single,
    build_explanation,
    process_batch,
    run_analysis,
    AnalysisRequest,
};
pub use keywords::YakeExtractor;
pub use sentiment::{
    ModelSize,
    ModernBertClassifier,
};

use crate::core::{
    Result,
    Sentiment,
};

/// Maps a text onto a sentiment label and a confidence in `[0, 1]`.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Sentiment>;
}

/// Returns the most salient phrases of a text, best first.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>>;
}

/// The capabilities a run needs, constructed once and shared with worker threads.
#[derive(Clone)]
pub struct AnalysisTools {
    pub classifier: Arc<dyn SentimentClassifier>,
    pub keyword_extractor: Arc<dyn KeywordExtractor>,
    pub keyword_count: usize,
    pub max_parallelism: usize,
}

impl AnalysisTools {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        keyword_extractor: Arc<dyn KeywordExtractor>,
    ) -> Self {
        Self {
            classifier,
            keyword_extractor,
            keyword_count: crate::core::models::MAX_KEYWORDS,
            max_parallelism: 1,
        }
    }

    pub fn with_keyword_count(mut self, keyword_count: usize) -> Self {
        self.keyword_count = keyword_count.clamp(1, crate::core::models::MAX_KEYWORDS);
        self
    }

    pub fn with_max_parallelism(mut self, max_parallelism: usize) -> Self {
        self.max_parallelism = max_parallelism.max(1);
        self
    }

    /// Loads the default pre-trained classifier and the statistical keyword extractor.
    pub fn load(
        model_size: ModelSize,
        progress: Option<Box<dyn Fn(String) + Send>>,
    ) -> Result<Self> {
        let report = |message: String| {
            if let Some(callback) = &progress {
                callback(message);
            }
        };

        report(format!("Loading sentiment model ({})...", model_size));
        let classifier = ModernBertClassifier::load(model_size)?;

        report("Preparing keyword extractor...".to_string());
        let keyword_extractor = YakeExtractor::default();

        Ok(Self::new(Arc::new(classifier), Arc::new(keyword_extractor)))
    }
}

impl std::fmt::Debug for AnalysisTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisTools")
            .field("classifier", &"Arc<dyn SentimentClassifier>")
            .field("keyword_extractor", &"Arc<dyn KeywordExtractor>")
            .field("keyword_count", &self.keyword_count)
            .field("max_parallelism", &self.max_parallelism)
            .finish()
    }
}
