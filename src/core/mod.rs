pub mod errors;
pub mod models;
pub mod tasks;

pub use errors::{
    DashboardError,
    Result,
};
pub use models::{
    AnalysisResult,
    FileFailure,
    FileFormat,
    ResultSet,
    RunOutcome,
    Sentiment,
    SentimentLabel,
    TextRecord,
    UploadedDocument,
};
