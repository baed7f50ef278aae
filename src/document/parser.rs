use std::panic::{catch_unwind, AssertUnwindSafe};

use super::{Document, DocumentFormat, ExtractedDocument, ExtractionError, ExtractionMethod};

/// Document parser using pure Rust crates
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract plain text from a document
    pub fn extract(&self, document: &Document) -> Result<ExtractedDocument, ExtractionError> {
        tracing::info!(
            "[TextExtractor] Extracting {} ({} bytes)",
            document.format.as_str(),
            document.bytes.len()
        );

        let (raw, method) = match document.format {
            DocumentFormat::Docx => (Self::extract_docx(&document.bytes)?, ExtractionMethod::Primary),
            DocumentFormat::Pdf => {
                extract_pdf_with(&document.bytes, Self::primary_pdf_text, Self::secondary_pdf_text)?
            }
        };

        let text = Self::clean_text(&raw);

        tracing::info!(
            "[TextExtractor] {} extracted: {} chars, {} words ({:?})",
            document.format.as_str(),
            text.chars().count(),
            text.split_whitespace().count(),
            method
        );

        Ok(ExtractedDocument {
            text,
            format: document.format,
            method,
        })
    }

    /// Extract text from DOCX using docx-rs
    fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
        let doc = guarded("DOCX", || docx_rs::read_docx(bytes))?
            .map_err(|e| ExtractionError::Docx(e.to_string()))?;

        let mut all_text = String::new();
        for child in &doc.document.children {
            Self::extract_docx_content(child, &mut all_text);
        }

        Ok(all_text)
    }

    /// Walk DOCX body elements, one output line per paragraph
    fn extract_docx_content(element: &docx_rs::DocumentChild, output: &mut String) {
        match element {
            docx_rs::DocumentChild::Paragraph(para) => {
                Self::extract_paragraph(para, output);
                output.push('\n');
            }
            docx_rs::DocumentChild::Table(table) => {
                for row in &table.rows {
                    let docx_rs::TableChild::TableRow(tr) = row;
                    let mut cells = Vec::new();
                    for cell in &tr.cells {
                        let docx_rs::TableRowChild::TableCell(tc) = cell;
                        let mut cell_text = String::new();
                        for child in &tc.children {
                            if let docx_rs::TableCellContent::Paragraph(para) = child {
                                Self::extract_paragraph(para, &mut cell_text);
                            }
                        }
                        cells.push(cell_text);
                    }
                    output.push_str(&cells.join(" | "));
                    output.push('\n');
                }
            }
            _ => {}
        }
    }

    fn extract_paragraph(para: &docx_rs::Paragraph, output: &mut String) {
        for child in &para.children {
            match child {
                docx_rs::ParagraphChild::Run(run) => Self::extract_run(run, output),
                docx_rs::ParagraphChild::Hyperlink(link) => {
                    for inner in &link.children {
                        if let docx_rs::ParagraphChild::Run(run) = inner {
                            Self::extract_run(run, output);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_run(run: &docx_rs::Run, output: &mut String) {
        for run_child in &run.children {
            match run_child {
                docx_rs::RunChild::Text(text) => output.push_str(&text.text),
                docx_rs::RunChild::Tab(_) => output.push('\t'),
                docx_rs::RunChild::Break(_) => output.push('\n'),
                _ => {}
            }
        }
    }

    /// Primary PDF path: pdf-extract
    fn primary_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract (and its font parsers) can panic on malformed fonts/glyphs
        guarded("pdf-extract", || pdf_extract::extract_text_from_mem(bytes))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))
    }

    /// Secondary PDF path: lopdf page-by-page text extraction
    fn secondary_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
        guarded("lopdf", || {
            let doc = lopdf::Document::load_mem(bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

            let mut text = String::new();
            for page_number in doc.get_pages().keys() {
                match doc.extract_text(&[*page_number]) {
                    Ok(page_text) => {
                        text.push_str(&page_text);
                        text.push('\n');
                    }
                    Err(e) => {
                        tracing::warn!("[TextExtractor] lopdf skipped page {}: {}", page_number, e);
                    }
                }
            }
            Ok(text)
        })?
    }

    /// Normalise line endings, strip trailing spaces, collapse runs of blank lines
    fn clean_text(text: &str) -> String {
        let mut cleaned = String::with_capacity(text.len());
        let mut blank_run = 0;

        for line in text.replace("\r\n", "\n").replace('\r', "\n").lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                blank_run += 1;
                if blank_run > 1 {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            cleaned.push_str(line);
            cleaned.push('\n');
        }

        cleaned.trim_matches('\n').to_string()
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the primary PDF method and, when it fails or yields only whitespace,
/// the secondary one. Both are plain functions over the bytes.
pub fn extract_pdf_with<P, S>(
    bytes: &[u8],
    primary: P,
    secondary: S,
) -> Result<(String, ExtractionMethod), ExtractionError>
where
    P: FnOnce(&[u8]) -> Result<String, ExtractionError>,
    S: FnOnce(&[u8]) -> Result<String, ExtractionError>,
{
    let primary_outcome = match primary(bytes) {
        Ok(text) if !text.trim().is_empty() => return Ok((text, ExtractionMethod::Primary)),
        Ok(_) => "empty output".to_string(),
        Err(e) => e.to_string(),
    };

    tracing::warn!(
        "[TextExtractor] Primary PDF extraction gave no text ({}), trying fallback",
        primary_outcome
    );

    match secondary(bytes) {
        Ok(text) if !text.trim().is_empty() => Ok((text, ExtractionMethod::Secondary)),
        Ok(_) => Err(ExtractionError::NoText {
            primary: primary_outcome,
        }),
        Err(e) => {
            tracing::warn!("[TextExtractor] Fallback PDF extraction failed: {}", e);
            Err(e)
        }
    }
}

/// Contain panics from third-party parsers
fn guarded<T>(label: &'static str, f: impl FnOnce() -> T) -> Result<T, ExtractionError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|_| {
        tracing::error!("[TextExtractor] {} PANICKED - likely malformed input", label);
        ExtractionError::Panicked(label)
    })
}
