use std::{
    collections::HashMap,
    fmt,
    path::{
        Path,
        PathBuf,
    },
};

use super::errors::Result;

/// Source shown for records that come from the free-text box.
pub const TEXT_INPUT_SOURCE: &str = "Text input";

/// Upper bound on keywords kept per result.
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    Txt,
    Pdf,
    Docx,
    Other(String),
}

impl FileFormat {
    pub fn from_extension(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => FileFormat::Csv,
            "txt" => FileFormat::Txt,
            "pdf" => FileFormat::Pdf,
            "docx" => FileFormat::Docx,
            other => FileFormat::Other(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileFormat::Other(_))
    }

    pub fn supported_extensions() -> &'static [&'static str] {
        &["csv", "txt", "pdf", "docx"]
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "CSV"),
            FileFormat::Txt => write!(f, "TXT"),
            FileFormat::Pdf => write!(f, "PDF"),
            FileFormat::Docx => write!(f, "DOCX"),
            FileFormat::Other(ext) if ext.is_empty() => write!(f, "unknown"),
            FileFormat::Other(ext) => write!(f, "{}", ext.to_uppercase()),
        }
    }
}

/// A file handed to the dashboard, held only until its lines are extracted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub format: FileFormat,
    /// Where the file was read from; `None` for documents built in memory.
    pub path: Option<PathBuf>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let format = FileFormat::from_extension(&filename);
        Self { filename, bytes, format, path: None }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("Unknown file")
            .to_string();
        Ok(Self { path: Some(path.to_path_buf()), ..Self::new(filename, bytes) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub text: String,
    pub source: String,
}

impl TextRecord {
    /// Returns `None` for blank text so every record carries content.
    pub fn new(text: &str, source: impl Into<String>) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self { text: trimmed.to_string(), source: source.into() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] =
        [SentimentLabel::Positive, SentimentLabel::Neutral, SentimentLabel::Negative];

    /// Maps a raw classifier label onto the three categories.
    ///
    /// Accepts the common spellings (`positive`, `POS`, `LABEL_2`, ...) case-insensitively.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "pos" | "label_2" => Some(SentimentLabel::Positive),
            "neutral" | "neu" | "label_1" => Some(SentimentLabel::Neutral),
            "negative" | "neg" | "label_0" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "🙂",
            SentimentLabel::Neutral => "😐",
            SentimentLabel::Negative => "🙁",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub confidence: f32,
}

impl Sentiment {
    /// Clamps the confidence into `[0, 1]` and rounds it to the three decimals it is shown and exported with.
    pub fn new(label: SentimentLabel, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        let confidence = (confidence * 1000.0).round() / 1000.0;
        Self { label, confidence }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub text: String,
    pub source: String,
    pub sentiment: SentimentLabel,
    pub confidence: f32,
    pub keywords: Vec<String>,
    pub explanation: String,
}

impl AnalysisResult {
    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }

    /// Confidence rounded to three decimals for display and export.
    pub fn confidence_display(&self) -> String {
        format!("{:.3}", self.confidence)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub results: Vec<AnalysisResult>,
}

impl ResultSet {
    pub fn new(results: Vec<AnalysisResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnalysisResult> {
        self.results.iter()
    }

    pub fn extend(&mut self, other: ResultSet) {
        self.results.extend(other.results);
    }

    pub fn push(&mut self, result: AnalysisResult) {
        self.results.push(result);
    }

    /// Distinct sources in order of first appearance.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for result in &self.results {
            if !seen.contains(&result.source.as_str()) {
                seen.push(result.source.as_str());
            }
        }
        seen
    }

    pub fn has_multiple_sources(&self) -> bool {
        self.sources().len() > 1
    }

    pub fn group_by_source(&self) -> HashMap<&str, Vec<&AnalysisResult>> {
        let mut groups: HashMap<&str, Vec<&AnalysisResult>> = HashMap::new();
        for result in &self.results {
            groups.entry(result.source.as_str()).or_default().push(result);
        }
        groups
    }
}

/// A file that could not contribute results to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub results: ResultSet,
    pub failures: Vec<FileFailure>,
    pub single_text: Option<AnalysisResult>,
}
