use std::{
    collections::BTreeMap,
    io::Cursor,
};

use csv::ReaderBuilder;
use docx_rs::{
    DocumentChild,
    ParagraphChild,
    RunChild,
};
use log::{
    debug,
    warn,
};
use lopdf::{
    content::Operation,
    Encoding,
    Object,
    ObjectId,
};

use crate::core::{
    DashboardError,
    FileFormat,
    Result,
    TextRecord,
    UploadedDocument,
};

const TEXT_COLUMN: &str = "text";
const UTF8_BOM: char = '\u{feff}';

/// Extracts the raw content units of a document.
///
/// CSV cells and TXT lines are returned as-is (blank entries included) and are filtered by
/// [`ingest`]; DOCX paragraphs and PDF lines are already stripped of blank entries.
pub fn extract_lines(document: &UploadedDocument) -> Result<Vec<String>> {
    match &document.format {
        FileFormat::Csv => read_csv(document),
        FileFormat::Txt => read_txt(document),
        FileFormat::Docx => read_docx(document),
        FileFormat::Pdf => read_pdf(document),
        FileFormat::Other(_) => Err(DashboardError::UnsupportedFileType(document.filename.clone())),
    }
}

/// Turns a document into text records tagged with its filename.
pub fn ingest(document: &UploadedDocument) -> Result<Vec<TextRecord>> {
    let lines = extract_lines(document)?;
    let records: Vec<TextRecord> = lines
        .iter()
        .filter_map(|line| TextRecord::new(line, document.filename.as_str()))
        .collect();

    if records.is_empty() {
        return Err(DashboardError::NoContent(document.filename.clone()));
    }

    debug!("Ingested {} records from {}", records.len(), document.filename);
    Ok(records)
}

fn malformed(document: &UploadedDocument, reason: impl Into<String>) -> DashboardError {
    DashboardError::Malformed { file: document.filename.clone(), reason: reason.into() }
}

fn read_csv(document: &UploadedDocument) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(&document.bytes));

    let headers = reader
        .headers()
        .map_err(|e| malformed(document, format!("Failed to read headers: {}", e)))?
        .clone();

    let text_index = headers
        .iter()
        .position(|header| header.trim_start_matches(UTF8_BOM) == TEXT_COLUMN)
        .ok_or_else(|| DashboardError::MissingTextColumn(document.filename.clone()))?;

    let mut texts = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| malformed(document, format!("Failed to read record: {}", e)))?;
        texts.push(record.get(text_index).unwrap_or_default().to_string());
    }

    Ok(texts)
}

fn read_txt(document: &UploadedDocument) -> Result<Vec<String>> {
    let content = std::str::from_utf8(&document.bytes)
        .map_err(|e| malformed(document, format!("Text is not valid UTF-8: {}", e)))?;

    Ok(content
        .trim_start_matches(UTF8_BOM)
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

fn read_docx(document: &UploadedDocument) -> Result<Vec<String>> {
    let docx = docx_rs::read_docx(&document.bytes)
        .map_err(|e| malformed(document, format!("Failed to parse DOCX: {:?}", e)))?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs)
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut buffer = String::new();

    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(text) => buffer.push_str(&text.text),
                    RunChild::Tab(_) => buffer.push('\t'),
                    _ => {}
                }
            }
        }
    }

    buffer
}

fn read_pdf(document: &UploadedDocument) -> Result<Vec<String>> {
    let pdf = lopdf::Document::load_mem(&document.bytes)
        .map_err(|e| malformed(document, format!("Failed to parse PDF: {}", e)))?;

    let mut lines = Vec::new();
    for (page_number, page_id) in pdf.get_pages() {
        match page_text(&pdf, page_id) {
            Ok(text) => lines.extend(split_page_text(&text)),
            Err(e) => {
                warn!("Skipping page {} of {}: {}", page_number, document.filename, e);
            }
        }
    }

    Ok(lines)
}

/// Kerning offsets (thousandths of an em) wider than this inside `TJ` read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = -100.0;

fn number(object: &Object) -> Option<f32> {
    match *object {
        Object::Integer(value) => Some(value as f32),
        Object::Real(value) => Some(value),
        _ => None,
    }
}

/// True for operators that move the text position onto a new line.
fn starts_new_line(operation: &Operation) -> bool {
    match operation.operator.as_str() {
        "T*" | "Tm" | "'" | "\"" | "ET" => true,
        // Td/TD with no vertical offset only shift along the current line
        "Td" | "TD" => operation.operands.get(1).and_then(number).is_some_and(|ty| ty != 0.0),
        _ => false,
    }
}

fn show_text(text: &mut String, encoding: &Encoding, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => match encoding.bytes_to_string(bytes) {
                Ok(decoded) => text.push_str(&decoded),
                Err(e) => debug!("Could not decode PDF string: {}", e),
            },
            Object::Array(items) => show_text(text, encoding, items),
            other => {
                if number(other).is_some_and(|offset| offset < TJ_SPACE_THRESHOLD)
                    && !text.ends_with(' ')
                {
                    text.push(' ');
                }
            }
        }
    }
}

/// Decodes a page's content stream into text, one line per text line on the page.
fn page_text(pdf: &lopdf::Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = pdf
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(pdf) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                debug!("Skipping font {}: {}", String::from_utf8_lossy(&name), e);
                None
            }
        })
        .collect();
    let content = pdf.get_and_decode_page_content(page_id)?;

    let mut text = String::new();
    let mut current_encoding: Option<&Encoding> = None;

    for operation in &content.operations {
        if starts_new_line(operation) && !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }

        match operation.operator.as_str() {
            "Tf" => {
                current_encoding = operation
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Tj" | "TJ" | "'" | "\"" => {
                // `"` carries word and character spacing before its string
                let strings = if operation.operator == "\"" {
                    operation.operands.get(2..).unwrap_or_default()
                } else {
                    &operation.operands[..]
                };
                match current_encoding {
                    Some(encoding) => show_text(&mut text, encoding, strings),
                    None => debug!("Text shown before a font was selected"),
                }
            }
            _ => {}
        }
    }

    Ok(text)
}

/// Splits extracted page text on line breaks, dropping blank lines.
pub fn split_page_text(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}
