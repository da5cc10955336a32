pub mod export;
pub mod summary;

pub use export::{
    export,
    render,
    sanitize_for_pdf,
    to_csv,
    to_docx,
    to_pdf,
    ExportFormat,
};
pub use summary::{
    counts_by_source,
    label_counts,
    LabelCounts,
};
