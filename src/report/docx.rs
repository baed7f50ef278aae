use super::{ExportError, ReportExporter, ReportFormat, ReportInput};

/// Word report: title, timestamp, original text and analysis sections
pub struct DocxExporter;

impl ReportExporter for DocxExporter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Docx
    }

    #[cfg(feature = "docx-report")]
    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError> {
        render_docx(input)
    }

    #[cfg(not(feature = "docx-report"))]
    fn render(&self, _input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Unavailable(ReportFormat::Docx))
    }
}

#[cfg(feature = "docx-report")]
const TITLE_STYLE: &str = "Title";
#[cfg(feature = "docx-report")]
const HEADING_STYLE: &str = "Heading1";

#[cfg(feature = "docx-report")]
fn render_docx(input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError> {
    use super::{ANALYSIS_RESULT_HEADING, ORIGINAL_TEXT_HEADING, REPORT_TITLE, SEPARATOR};
    use docx_rs::{Docx, Style, StyleType};
    use std::io::Cursor;

    let docx = Docx::new()
        .add_style(
            Style::new(TITLE_STYLE, StyleType::Paragraph)
                .name("Title")
                .size(48)
                .bold(),
        )
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("heading 1")
                .size(32)
                .bold(),
        )
        .add_paragraph(styled(REPORT_TITLE, TITLE_STYLE))
        .add_paragraph(body(&input.timestamp_line()))
        .add_paragraph(body(SEPARATOR))
        .add_paragraph(heading(ORIGINAL_TEXT_HEADING))
        .add_paragraph(body(input.input_text))
        .add_paragraph(body(SEPARATOR))
        .add_paragraph(heading(ANALYSIS_RESULT_HEADING))
        .add_paragraph(body(input.analysis_result));

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::render(ReportFormat::Docx, e))?;

    let bytes = cursor.into_inner();
    tracing::debug!("[ReportExporter] DOCX rendered: {} bytes", bytes.len());
    Ok(bytes)
}

#[cfg(feature = "docx-report")]
fn styled(text: &str, style: &str) -> docx_rs::Paragraph {
    docx_rs::Paragraph::new()
        .style(style)
        .add_run(docx_rs::Run::new().add_text(text))
}

/// Level-1 heading, visible in Word's navigation pane
#[cfg(feature = "docx-report")]
fn heading(text: &str) -> docx_rs::Paragraph {
    styled(text, HEADING_STYLE).outline_lvl(0)
}

/// Body paragraph keeping the source line structure as soft line breaks
#[cfg(feature = "docx-report")]
fn body(text: &str) -> docx_rs::Paragraph {
    let mut run = docx_rs::Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(docx_rs::BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    docx_rs::Paragraph::new().add_run(run)
}

#[cfg(all(test, feature = "docx-report"))]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentFormat, DocumentParser};

    #[test]
    fn test_docx_report_structure() {
        let input = ReportInput::new("Overall: compliant\nIssue 1: minor", "Clause A\nClause B");
        let bytes = DocxExporter.render(&input).unwrap();
        assert!(bytes.starts_with(b"PK"), "DOCX is a zip container");

        let text = DocumentParser::new()
            .extract(&Document::new(bytes, DocumentFormat::Docx))
            .unwrap()
            .text;
        let lines: Vec<&str> = text.lines().collect();
        let stamp = input.timestamp_line();

        assert_eq!(
            lines,
            vec![
                "Legal Compliance Analysis Report",
                stamp.as_str(),
                "---------------------------------------------------",
                "Original Text",
                "Clause A",
                "Clause B",
                "---------------------------------------------------",
                "Analysis Result",
                "Overall: compliant",
                "Issue 1: minor",
            ]
        );
    }

    fn paragraph_text(p: &docx_rs::Paragraph) -> String {
        p.children
            .iter()
            .filter_map(|child| match child {
                docx_rs::ParagraphChild::Run(run) => Some(run),
                _ => None,
            })
            .flat_map(|run| run.children.iter())
            .filter_map(|child| match child {
                docx_rs::RunChild::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_docx_report_uses_heading_styles() {
        let input = ReportInput::new("result", "original");
        let bytes = DocxExporter.render(&input).unwrap();
        let doc = docx_rs::read_docx(&bytes).unwrap();

        let styles: Vec<(String, String)> = doc
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => {
                    let style = p.property.style.as_ref()?.val.clone();
                    Some((style, paragraph_text(p)))
                }
                _ => None,
            })
            .collect();

        assert!(styles.contains(&("Title".to_string(), "Legal Compliance Analysis Report".to_string())));
        assert!(styles.contains(&("Heading1".to_string(), "Original Text".to_string())));
        assert!(styles.contains(&("Heading1".to_string(), "Analysis Result".to_string())));

        let outline_levels: Vec<usize> = doc
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => p.property.outline_lvl.as_ref().map(|l| l.v),
                _ => None,
            })
            .collect();
        assert_eq!(outline_levels, vec![0, 0]);
    }

    #[test]
    fn test_docx_report_keeps_non_latin_text() {
        let input = ReportInput::new("合规风险等级: 高", "第一条 合同双方");
        let bytes = DocxExporter.render(&input).unwrap();
        let text = DocumentParser::new()
            .extract(&Document::new(bytes, DocumentFormat::Docx))
            .unwrap()
            .text;

        assert!(text.contains("合规风险等级: 高"));
        assert!(text.contains("第一条 合同双方"));
    }
}
