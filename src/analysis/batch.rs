use log::{
    debug,
    error,
    info,
    warn,
};
use rayon::prelude::*;

use super::AnalysisTools;
use crate::{
    core::{
        models::TEXT_INPUT_SOURCE,
        AnalysisResult,
        DashboardError,
        FileFailure,
        ResultSet,
        Result,
        RunOutcome,
        TextRecord,
        UploadedDocument,
    },
    ingest,
};

const EXPLANATION_PREFIX: &str = "The sentiment was determined based on these keywords: ";

pub const UNREADABLE_FILE_REASON: &str = "Unsupported or malformed file";
pub const NO_RESULTS_REASON: &str = "No sentiment results for file";

/// Everything the user handed over for one press of Analyze.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub documents: Vec<UploadedDocument>,
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(documents: Vec<UploadedDocument>, text: impl Into<String>) -> Self {
        Self { documents, text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.text.trim().is_empty()
    }
}

pub fn build_explanation(keywords: &[String]) -> String {
    format!("{}{}", EXPLANATION_PREFIX, keywords.join(", "))
}

fn analyze_record(record: &TextRecord, tools: &AnalysisTools) -> Result<AnalysisResult> {
    let sentiment = tools.classifier.classify(&record.text)?;

    let mut keywords = tools.keyword_extractor.extract(&record.text, tools.keyword_count)?;
    keywords.truncate(tools.keyword_count);

    let explanation = build_explanation(&keywords);

    Ok(AnalysisResult {
        text: record.text.clone(),
        source: record.source.clone(),
        sentiment: sentiment.label,
        confidence: sentiment.confidence,
        keywords,
        explanation,
    })
}

/// Classifies every record and extracts its keywords, keeping input order.
///
/// Rows are spread over at most `tools.max_parallelism` threads. The first failure aborts
/// the whole batch.
pub fn process_batch(records: &[TextRecord], tools: &AnalysisTools) -> Result<ResultSet> {
    if records.is_empty() {
        return Ok(ResultSet::default());
    }

    let results = if tools.max_parallelism <= 1 || records.len() == 1 {
        records.iter().map(|record| analyze_record(record, tools)).collect::<Result<Vec<_>>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(tools.max_parallelism)
            .build()
            .map_err(|e| DashboardError::Custom(format!("Failed to build worker pool: {}", e)))?;

        pool.install(|| {
            records
                .par_iter()
                .map(|record| analyze_record(record, tools))
                .collect::<Result<Vec<_>>>()
        })?
    };

    debug!("Processed batch of {} records", results.len());
    Ok(ResultSet::new(results))
}

/// Analyses one piece of free text, tagged with the text-input source.
pub fn analyze_single(text: &str, tools: &AnalysisTools) -> Result<AnalysisResult> {
    let record = TextRecord::new(text, TEXT_INPUT_SOURCE).ok_or(DashboardError::NoInput)?;
    analyze_record(&record, tools)
}

/// Runs a whole request: every document, then the free-text box.
///
/// Problems with individual files, and with the free text, are recorded as [`FileFailure`]s
/// and never stop the run. The free text is reported under the text-input source.
pub fn run_analysis(request: &AnalysisRequest, tools: &AnalysisTools) -> Result<RunOutcome> {
    if request.is_empty() {
        return Err(DashboardError::NoInput);
    }

    let mut outcome = RunOutcome::default();

    for document in &request.documents {
        let records = match ingest::ingest(document) {
            Ok(records) => records,
            Err(e) => {
                if e.is_file_problem() {
                    warn!("Could not read {}: {}", document.filename, e);
                } else {
                    error!("Could not read {}: {}", document.filename, e);
                }
                outcome.failures.push(FileFailure {
                    filename: document.filename.clone(),
                    reason: UNREADABLE_FILE_REASON.to_string(),
                });
                continue;
            }
        };

        match process_batch(&records, tools) {
            Ok(results) => {
                info!("{}: {} results", document.filename, results.len());
                outcome.results.extend(results);
            }
            Err(e) => {
                warn!("Analysis failed for {}: {}", document.filename, e);
                outcome.failures.push(FileFailure {
                    filename: document.filename.clone(),
                    reason: NO_RESULTS_REASON.to_string(),
                });
            }
        }
    }

    if !request.text.trim().is_empty() {
        match analyze_single(&request.text, tools) {
            Ok(single) => {
                if !request.documents.is_empty() {
                    outcome.results.push(single.clone());
                }
                outcome.single_text = Some(single);
            }
            Err(e) => {
                warn!("Analysis failed for the text input: {}", e);
                outcome.failures.push(FileFailure {
                    filename: TEXT_INPUT_SOURCE.to_string(),
                    reason: NO_RESULTS_REASON.to_string(),
                });
            }
        }
    }

    info!(
        "Analysis finished: {} results, {} failed files",
        outcome.results.len(),
        outcome.failures.len()
    );
    Ok(outcome)
}
