use std::{
    fmt,
    io::Cursor,
    path::{
        Path,
        PathBuf,
    },
};

use docx_rs::{
    Docx,
    Paragraph,
    Run,
    Table,
    TableCell,
    TableRow,
};
use log::info;
use lopdf::{
    content::{
        Content,
        Operation,
    },
    dictionary,
    Document,
    Object,
    Stream,
};
use unicode_normalization::UnicodeNormalization;

use crate::core::{
    AnalysisResult,
    DashboardError,
    ResultSet,
    Result,
};

pub const COLUMNS: [&str; 6] = ["text", "sentiment", "confidence", "keywords", "explanation", "source"];

const PDF_TITLE: &str = "Sentiment Analysis Results";
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const FONT_SIZE: i64 = 9;
const LEADING: i64 = 12;
const CHARS_PER_LINE: usize = 90;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Docx, ExportFormat::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("sentiment_results.{}", self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Docx => write!(f, "DOCX"),
            ExportFormat::Pdf => write!(f, "PDF"),
        }
    }
}

fn row_values(result: &AnalysisResult) -> [String; 6] {
    [
        result.text.clone(),
        result.sentiment.to_string(),
        result.confidence_display(),
        result.keywords_joined(),
        result.explanation.clone(),
        result.source.clone(),
    ]
}

pub fn to_csv(results: &ResultSet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|e| DashboardError::Export(format!("Failed to write CSV header: {}", e)))?;

    for result in results.iter() {
        writer
            .write_record(row_values(result))
            .map_err(|e| DashboardError::Export(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| DashboardError::Export(format!("Failed to flush CSV: {}", e)))
}

fn docx_row(values: &[String]) -> TableRow {
    TableRow::new(
        values
            .iter()
            .map(|value| {
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(value)))
            })
            .collect(),
    )
}

pub fn to_docx(results: &ResultSet) -> Result<Vec<u8>> {
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut rows = vec![docx_row(&header)];
    rows.extend(results.iter().map(|result| docx_row(&row_values(result))));

    let mut cursor = Cursor::new(Vec::new());
    Docx::new()
        .add_table(Table::new(rows))
        .build()
        .pack(&mut cursor)
        .map_err(|e| DashboardError::Export(format!("Failed to write DOCX: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Reduces text to what the built-in single-byte PDF fonts can show.
///
/// Accented letters keep their base letter; everything else outside printable ASCII is
/// dropped, tabs become spaces.
pub fn sanitize_for_pdf(text: &str) -> String {
    text.nfkd()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word);
            word = rest;
        }

        if current.is_empty() {
            current = word;
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn pdf_lines(results: &ResultSet) -> Vec<String> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let mut lines = vec![PDF_TITLE.to_string(), format!("Generated {}", generated), String::new()];
    lines.extend(wrap(&COLUMNS.join(" | "), CHARS_PER_LINE));
    lines.push("-".repeat(CHARS_PER_LINE));

    for result in results.iter() {
        let row = sanitize_for_pdf(&row_values(result).join(" | "));
        lines.extend(wrap(&row, CHARS_PER_LINE));
        lines.push(String::new());
    }

    lines
}

fn page_content(lines: &[String]) -> Result<Vec<u8>> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    Content { operations }
        .encode()
        .map_err(|e| DashboardError::Export(format!("Failed to encode PDF page: {}", e)))
}

pub fn to_pdf(results: &ResultSet) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let lines = pdf_lines(results);
    let mut kids: Vec<Object> = Vec::new();
    for chunk in lines.chunks(LINES_PER_PAGE) {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(chunk)?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| DashboardError::Export(format!("Failed to write PDF: {}", e)))?;

    Ok(buffer)
}

pub fn render(results: &ResultSet, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(results),
        ExportFormat::Docx => to_docx(results),
        ExportFormat::Pdf => to_pdf(results),
    }
}

/// Renders `results` and writes them to `path`, returning the written path.
pub fn export(results: &ResultSet, format: ExportFormat, path: &Path) -> Result<PathBuf> {
    let bytes = render(results, format)?;

    std::fs::write(path, bytes).map_err(|e| {
        DashboardError::Export(format!("Failed to write {}: {}", path.display(), e))
    })?;

    info!("Exported {} results as {} to {}", results.len(), format, path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Sentiment,
        SentimentLabel,
    };

    fn sample() -> ResultSet {
        let scored = Sentiment::new(SentimentLabel::Positive, 0.98765);
        ResultSet::new(vec![
            AnalysisResult {
                text: "Great battery, \"really\" great".to_string(),
                source: "reviews.csv".to_string(),
                sentiment: scored.label,
                confidence: scored.confidence,
                keywords: vec!["battery".to_string(), "great".to_string()],
                explanation: "The sentiment was determined based on these keywords: battery, great"
                    .to_string(),
            },
            AnalysisResult {
                text: "Café service was slow\nand rude".to_string(),
                source: "notes.txt".to_string(),
                sentiment: SentimentLabel::Negative,
                confidence: 0.5,
                keywords: Vec::new(),
                explanation: "The sentiment was determined based on these keywords: ".to_string(),
            },
        ])
    }

    #[test]
    fn test_csv_can_be_read_back() {
        let results = sample();
        let bytes = to_csv(&results).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Great battery, \"really\" great");
        assert_eq!(&rows[0][1], "Positive");
        assert_eq!(&rows[0][2], "0.988");
        for (row, result) in rows.iter().zip(results.iter()) {
            assert_eq!(row[2].parse::<f32>().unwrap(), result.confidence);
        }
        assert_eq!(&rows[0][3], "battery, great");
        assert_eq!(&rows[1][0], "Café service was slow\nand rude");
        assert_eq!(&rows[1][5], "notes.txt");
    }

    #[test]
    fn test_empty_csv_has_header_only() {
        let bytes = to_csv(&ResultSet::default()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), format!("{}\n", COLUMNS.join(",")));
    }

    #[test]
    fn test_docx_contains_one_table() {
        let bytes = to_docx(&sample()).unwrap();
        let docx = docx_rs::read_docx(&bytes).unwrap();

        let tables = docx
            .document
            .children
            .iter()
            .filter(|child| matches!(child, docx_rs::DocumentChild::Table(_)))
            .count();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_pdf_is_loadable() {
        let bytes = to_pdf(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_pdf_paginates_long_reports() {
        let row = sample().results[0].clone();
        let many = ResultSet::new(vec![row; 200]);

        let doc = lopdf::Document::load_mem(&to_pdf(&many).unwrap()).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_sanitize_for_pdf() {
        assert_eq!(sanitize_for_pdf("Café naïve"), "Cafe naive");
        assert_eq!(sanitize_for_pdf("ok 🙂\tdone\u{7}"), "ok  done");
        assert_eq!(sanitize_for_pdf("東京"), "");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("sentiment_export_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for format in ExportFormat::ALL {
            let path = dir.join(format.default_file_name());
            let written = export(&sample(), format, &path).unwrap();
            assert_eq!(written, path);
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }

        let missing = dir.join("no_such_dir").join("out.csv");
        assert!(matches!(
            export(&sample(), ExportFormat::Csv, &missing),
            Err(DashboardError::Export(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
