//! Document text extraction
//!
//! Pure Rust extraction for the two accepted upload formats:
//! - Word: .docx via docx-rs
//! - PDF: pdf-extract first, lopdf's page text extraction as fallback

mod parser;

pub use parser::{extract_pdf_with, DocumentParser};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declared format of an uploaded document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Word-processing document (.docx)
    Docx,
    /// Page-description document (.pdf)
    Pdf,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect from the file name, asking mime_guess when the extension is unfamiliar
    pub fn from_path(path: &Path) -> Option<Self> {
        let by_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension);

        by_ext.or_else(|| {
            let mime = mime_guess::from_path(path).first()?;
            match mime.essence_str() {
                "application/pdf" => Some(Self::Pdf),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    Some(Self::Docx)
                }
                _ => None,
            }
        })
    }

    /// Prefix used when a failure message stands in for the extracted text
    fn failure_prefix(&self) -> &'static str {
        match self {
            Self::Docx => "Document processing error",
            Self::Pdf => "PDF processing error",
        }
    }
}

/// Raw uploaded bytes plus their declared format
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub format: DocumentFormat,
}

impl Document {
    pub fn new(bytes: Vec<u8>, format: DocumentFormat) -> Self {
        Self { bytes, format }
    }

    /// Read a document from disk, detecting its format from the path
    pub fn read(path: &Path) -> Result<Self, ExtractionError> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            ExtractionError::UnsupportedFormat(path.display().to_string())
        })?;

        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            "[TextExtractor] Read {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            format.as_str()
        );

        Ok(Self { bytes, format })
    }
}

/// Which extraction path produced the text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// First-choice extractor for the format
    Primary,
    /// Fallback after the primary extractor came back empty or failed
    Secondary,
}

/// Successful extraction
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub format: DocumentFormat,
    pub method: ExtractionMethod,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported document type: {0} (expected .docx or .pdf)")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse DOCX: {0}")]
    Docx(String),

    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    #[error("{0} extractor panicked, the file is likely malformed")]
    Panicked(&'static str),

    #[error("no text found in PDF (primary: {primary})")]
    NoText { primary: String },
}

/// Extract a document, or describe the failure in place of its text.
///
/// The returned string always feeds the editable text area, so a failure
/// does not stop the pipeline.
pub fn extract_or_describe(parser: &DocumentParser, document: &Document) -> String {
    match parser.extract(document) {
        Ok(extracted) => {
            tracing::info!(
                "[TextExtractor] Using {} text from the {:?} method",
                extracted.format.as_str(),
                extracted.method
            );
            extracted.text
        }
        Err(e) => {
            tracing::warn!("[TextExtractor] Extraction failed: {}", e);
            format!("{}: {}", document.format.failure_prefix(), e)
        }
    }
}
