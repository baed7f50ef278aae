//! Report export
//!
//! Renders a finished analysis (plus the text it was run on) into the three
//! downloadable encodings. Each exporter runs on its own: a failing format
//! produces a warning for that format and nothing else.

mod docx;
mod pdf;
mod text;

pub use docx::DocxExporter;
pub use pdf::{analysis_paragraphs, FontChoice, PdfBlock, PdfExporter, PdfLayout};
pub use text::TextExporter;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Title shown at the top of the DOCX and PDF reports
pub const REPORT_TITLE: &str = "Legal Compliance Analysis Report";

/// Prefix of every downloaded report file name
pub const FILE_PREFIX: &str = "legal_analysis_report";

pub const ORIGINAL_TEXT_HEADING: &str = "Original Text";
pub const ANALYSIS_RESULT_HEADING: &str = "Analysis Result";
pub const SEPARATOR: &str = "---------------------------------------------------";

/// Output encoding of a report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Text,
    Docx,
    Pdf,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [Self::Text, Self::Docx, Self::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
        }
    }

    /// Shown next to the warning when this format cannot be produced
    pub fn capability_hint(&self) -> &'static str {
        match self {
            Self::Text => "Check that the output directory is writable",
            Self::Docx => "DOCX reports need the `docx-report` feature enabled",
            Self::Pdf => "PDF reports need the `pdf-report` feature enabled",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "docx" | "word" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// What every exporter renders
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub analysis_result: &'a str,
    pub input_text: &'a str,
    pub generated_at: DateTime<Local>,
}

impl<'a> ReportInput<'a> {
    pub fn new(analysis_result: &'a str, input_text: &'a str) -> Self {
        Self {
            analysis_result,
            input_text,
            generated_at: Local::now(),
        }
    }

    /// `Generated at: YYYY-MM-DD HH:MM:SS`
    pub fn timestamp_line(&self) -> String {
        format!(
            "Generated at: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{0} report generation is unavailable in this build")]
    Unavailable(ReportFormat),

    #[error("{format} rendering failed: {message}")]
    Render {
        format: ReportFormat,
        message: String,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown report format '{0}' (expected txt, docx or pdf)")]
    UnknownFormat(String),
}

impl ExportError {
    pub fn render(format: ReportFormat, message: impl std::fmt::Display) -> Self {
        Self::Render {
            format,
            message: message.to_string(),
        }
    }
}

/// A report encoder for one format
pub trait ReportExporter {
    fn format(&self) -> ReportFormat;

    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError>;
}

/// `legal_analysis_report_YYYYMMDD_HHMMSS.ext`
pub fn report_file_name(format: ReportFormat, at: &DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        FILE_PREFIX,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Result of attempting one format
#[derive(Debug)]
pub struct ExportOutcome {
    pub format: ReportFormat,
    pub result: Result<PathBuf, ExportError>,
}

/// Exporters for the requested formats, in the order given
pub fn exporters_for(formats: &[ReportFormat], pdf_font: Option<PathBuf>) -> Vec<Box<dyn ReportExporter>> {
    formats
        .iter()
        .map(|format| -> Box<dyn ReportExporter> {
            match format {
                ReportFormat::Text => Box::new(TextExporter),
                ReportFormat::Docx => Box::new(DocxExporter),
                ReportFormat::Pdf => Box::new(PdfExporter::new(pdf_font.clone())),
            }
        })
        .collect()
}

/// Render and write every exporter's report into `dir`.
///
/// Failures are collected per format and never stop the remaining exporters.
pub fn export_all(
    exporters: &[Box<dyn ReportExporter>],
    input: &ReportInput<'_>,
    dir: &Path,
) -> Vec<ExportOutcome> {
    exporters
        .iter()
        .map(|exporter| {
            let format = exporter.format();
            let result = exporter
                .render(input)
                .and_then(|bytes| write_report(dir, format, input, &bytes));

            match &result {
                Ok(path) => tracing::info!("[ReportExporter] Wrote {} report: {}", format, path.display()),
                Err(e) => tracing::warn!("[ReportExporter] {} report failed: {}", format, e),
            }

            ExportOutcome { format, result }
        })
        .collect()
}

fn write_report(
    dir: &Path,
    format: ReportFormat,
    input: &ReportInput<'_>,
    bytes: &[u8],
) -> Result<PathBuf, ExportError> {
    let path = dir.join(report_file_name(format, &input.generated_at));
    std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&path, bytes))
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
