use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),

    #[error("PDF error: {0}")]
    Pdf(Box<lopdf::Error>),

    #[error("Model error: {0}")]
    Model(Box<candle_core::Error>),

    #[error("Model download error: {0}")]
    Hub(Box<hf_hub::api::sync::ApiError>),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Failed to load unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("No 'text' column found in {0}")]
    MissingTextColumn(String),

    #[error("No extractable text found in {0}")]
    NoContent(String),

    #[error("Malformed file {file}: {reason}")]
    Malformed { file: String, reason: String },

    #[error("Please provide input via file upload or text box.")]
    NoInput,

    #[error("Export failed: {0}")]
    Export(String),

    #[error("{0}")]
    Custom(String),
}

impl DashboardError {
    /// True for the problems that are reported against a single uploaded file.
    pub fn is_file_problem(&self) -> bool {
        matches!(
            self,
            DashboardError::UnsupportedFileType(_)
                | DashboardError::MissingTextColumn(_)
                | DashboardError::NoContent(_)
                | DashboardError::Malformed { .. }
        )
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(error: std::io::Error) -> Self {
        DashboardError::Io(Box::new(error))
    }
}

impl From<csv::Error> for DashboardError {
    fn from(error: csv::Error) -> Self {
        DashboardError::Csv(Box::new(error))
    }
}

impl From<lopdf::Error> for DashboardError {
    fn from(error: lopdf::Error) -> Self {
        DashboardError::Pdf(Box::new(error))
    }
}

impl From<candle_core::Error> for DashboardError {
    fn from(error: candle_core::Error) -> Self {
        DashboardError::Model(Box::new(error))
    }
}

impl From<hf_hub::api::sync::ApiError> for DashboardError {
    fn from(error: hf_hub::api::sync::ApiError) -> Self {
        DashboardError::Hub(Box::new(error))
    }
}
