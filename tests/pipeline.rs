use std::sync::Arc;

use sentiment_dashboard::{
    analysis::{
        batch::{
            NO_RESULTS_REASON,
            UNREADABLE_FILE_REASON,
        },
        run_analysis,
        AnalysisRequest,
        AnalysisTools,
        ModelSize,
        ModernBertClassifier,
        SentimentClassifier,
        YakeExtractor,
    },
    core::{
        DashboardError,
        Result,
        Sentiment,
        SentimentLabel,
        UploadedDocument,
    },
    report::{
        self,
        ExportFormat,
    },
};

/// Scores by counting a few cue words so the outcome is predictable.
struct CueClassifier;

impl SentimentClassifier for CueClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment> {
        let lower = text.to_lowercase();
        if lower.contains("poison") {
            return Err(DashboardError::Custom("refused".to_string()));
        }

        let positive = ["love", "great", "excellent"].iter().filter(|w| lower.contains(*w)).count();
        let negative = ["hate", "broken", "awful"].iter().filter(|w| lower.contains(*w)).count();

        let label = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => SentimentLabel::Positive,
            std::cmp::Ordering::Less => SentimentLabel::Negative,
            std::cmp::Ordering::Equal => SentimentLabel::Neutral,
        };
        Ok(Sentiment::new(label, 0.8))
    }
}

fn tools() -> AnalysisTools {
    AnalysisTools::new(Arc::new(CueClassifier), Arc::new(YakeExtractor::default()))
        .with_keyword_count(3)
        .with_max_parallelism(2)
}

fn csv_document(name: &str, body: &str) -> UploadedDocument {
    UploadedDocument::new(name, body.as_bytes().to_vec())
}

#[test]
fn test_files_and_text_flow_into_csv_export() {
    let reviews = csv_document(
        "reviews.csv",
        "id,text\n1,I love the battery life of this phone\n2,The screen arrived broken and awful\n3,,\n4,Shipping took four days\n",
    );
    let notes = UploadedDocument::new(
        "notes.txt",
        b"Customer support was excellent and great\n\n".to_vec(),
    );
    let request = AnalysisRequest::new(vec![reviews, notes], "I hate waiting in line");

    let outcome = run_analysis(&request, &tools()).unwrap();

    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.results.len(), 5);

    let labels: Vec<SentimentLabel> = outcome.results.iter().map(|r| r.sentiment).collect();
    assert_eq!(
        labels,
        vec![
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
            SentimentLabel::Positive,
            SentimentLabel::Negative,
        ]
    );

    let sources: Vec<&str> = outcome.results.iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, vec!["reviews.csv", "reviews.csv", "reviews.csv", "notes.txt", "Text input"]);

    let single = outcome.single_text.as_ref().unwrap();
    assert_eq!(single.sentiment, SentimentLabel::Negative);
    assert!(outcome.results.iter().all(|r| r.keywords.len() <= 3));

    let csv_bytes = report::render(&outcome.results, ExportFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv_bytes.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["text", "sentiment", "confidence", "keywords", "explanation", "source"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[0][0], "I love the battery life of this phone");
    assert_eq!(&rows[0][1], "Positive");
    assert_eq!(&rows[0][2], "0.800");
    assert!(rows[0][4].starts_with("The sentiment was determined based on these keywords: "));
    assert_eq!(&rows[4][5], "Text input");
}

#[test]
fn test_bad_files_are_reported_and_good_files_survive() {
    let missing_column = csv_document("scores.csv", "id,score\n1,5\n2,3\n");
    let unsupported = UploadedDocument::new("slides.pptx", vec![1, 2, 3]);
    let poisoned = csv_document("poison.csv", "text\nthis row contains poison\n");
    let good = csv_document("good.csv", "text\nGreat value for money\n");

    let request = AnalysisRequest::new(vec![missing_column, unsupported, poisoned, good], "");
    let outcome = run_analysis(&request, &tools()).unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results.results[0].source, "good.csv");
    assert!(outcome.single_text.is_none());

    let failures: Vec<(&str, &str)> = outcome
        .failures
        .iter()
        .map(|f| (f.filename.as_str(), f.reason.as_str()))
        .collect();
    assert_eq!(
        failures,
        vec![
            ("scores.csv", UNREADABLE_FILE_REASON),
            ("slides.pptx", UNREADABLE_FILE_REASON),
            ("poison.csv", NO_RESULTS_REASON),
        ]
    );
}

#[test]
fn test_text_only_run_shows_single_card() {
    let request = AnalysisRequest::new(Vec::new(), "The new update is great");
    let outcome = run_analysis(&request, &tools()).unwrap();

    assert!(outcome.results.is_empty());
    let single = outcome.single_text.unwrap();
    assert_eq!(single.sentiment, SentimentLabel::Positive);
    assert_eq!(single.source, "Text input");
}

#[test]
fn test_empty_request_asks_for_input() {
    let request = AnalysisRequest::new(Vec::new(), "   \n ");
    let err = run_analysis(&request, &tools()).unwrap_err();

    assert!(matches!(err, DashboardError::NoInput));
    assert_eq!(err.to_string(), "Please provide input via file upload or text box.");
}

#[test]
fn test_export_to_every_format() {
    let request = AnalysisRequest::new(
        vec![csv_document("mixed.csv", "text\nI love it\nI hate it\nIt exists\n")],
        "",
    );
    let outcome = run_analysis(&request, &tools()).unwrap();

    let dir = std::env::temp_dir().join(format!("sentiment_dashboard_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    for format in ExportFormat::ALL {
        let path = dir.join(format.default_file_name());
        let written = report::export(&outcome.results, format, &path).unwrap();
        let bytes = std::fs::read(&written).unwrap();
        assert!(!bytes.is_empty(), "{} export was empty", format);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
#[ignore = "downloads the sentiment model from the Hugging Face Hub"]
fn test_pretrained_model_reads_obvious_praise() {
    let classifier = ModernBertClassifier::load(ModelSize::Base).unwrap();
    let sentiment = classifier.classify("I love this product!").unwrap();

    assert_eq!(sentiment.label, SentimentLabel::Positive);
    assert!(sentiment.confidence > 0.5);
}
