use super::{ExportError, ReportExporter, ReportFormat, ReportInput};

/// Plain-text report: the analysis result, byte for byte
pub struct TextExporter;

impl ReportExporter for TextExporter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError> {
        Ok(input.analysis_result.as_bytes().to_vec())
    }
}
