//! PDF report rendering
//!
//! The report is first laid out as a flat list of blocks, then drawn onto A4
//! pages with printpdf. The analysis result becomes one paragraph block per
//! blank-line separated chunk.
//!
//! Non-Latin text needs a Unicode TTF. The exporter tries the configured
//! font, then a few well-known system locations, and falls back to the
//! built-in Helvetica when none of them can be registered.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use super::{
    ExportError, ReportExporter, ReportFormat, ReportInput, ANALYSIS_RESULT_HEADING,
    ORIGINAL_TEXT_HEADING, REPORT_TITLE,
};

/// Blank line, tolerating CRLF and whitespace-only lines
static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("valid blank-line regex"));

/// Unicode-capable fonts tried after the configured one
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "Arial Unicode.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

/// One laid-out element of the PDF report
#[derive(Debug, Clone, PartialEq)]
pub enum PdfBlock {
    Title(String),
    Heading(String),
    /// Small informational line (timestamp)
    Meta(String),
    Paragraph(String),
    /// Vertical gap in points
    Spacer(f32),
}

/// Ordered blocks of a PDF report
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub blocks: Vec<PdfBlock>,
}

impl PdfLayout {
    pub fn build(input: &ReportInput<'_>) -> Self {
        let mut blocks = vec![
            PdfBlock::Title(REPORT_TITLE.to_string()),
            PdfBlock::Spacer(20.0),
            PdfBlock::Meta(input.timestamp_line()),
            PdfBlock::Spacer(20.0),
            PdfBlock::Heading(ORIGINAL_TEXT_HEADING.to_string()),
            PdfBlock::Spacer(10.0),
            PdfBlock::Paragraph(input.input_text.to_string()),
            PdfBlock::Spacer(20.0),
            PdfBlock::Heading(ANALYSIS_RESULT_HEADING.to_string()),
            PdfBlock::Spacer(10.0),
        ];

        for chunk in analysis_paragraphs(input.analysis_result) {
            blocks.push(PdfBlock::Paragraph(chunk.to_string()));
            blocks.push(PdfBlock::Spacer(10.0));
        }

        Self { blocks }
    }

    /// Paragraph blocks of the analysis section
    pub fn analysis_blocks(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .skip_while(|b| !matches!(b, PdfBlock::Heading(h) if h == ANALYSIS_RESULT_HEADING))
            .filter_map(|b| match b {
                PdfBlock::Paragraph(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Split analysis text on blank lines, dropping blank chunks
pub fn analysis_paragraphs(text: &str) -> Vec<&str> {
    BLANK_LINE
        .split(text)
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

/// Which font the report was drawn with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontChoice {
    External(PathBuf),
    Builtin,
}

pub struct PdfExporter {
    font: Option<PathBuf>,
}

impl PdfExporter {
    pub fn new(font: Option<PathBuf>) -> Self {
        Self { font }
    }

    /// Configured font first, then the system candidates
    fn font_candidates(&self) -> Vec<PathBuf> {
        self.font
            .iter()
            .cloned()
            .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from))
            .collect()
    }
}

impl ReportExporter for PdfExporter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    #[cfg(feature = "pdf-report")]
    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError> {
        let layout = PdfLayout::build(input);
        render::render_layout(&layout, &self.font_candidates()).map(|(bytes, _)| bytes)
    }

    #[cfg(not(feature = "pdf-report"))]
    fn render(&self, _input: &ReportInput<'_>) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Unavailable(ReportFormat::Pdf))
    }
}

/// Greedy wrap to `max_units`, where wide (CJK) characters count double.
/// Source newlines are kept; words longer than a line are split by character.
fn wrap_text(text: &str, max_units: usize) -> Vec<String> {
    let max_units = max_units.max(1);
    let mut lines = Vec::new();

    for source in text.lines() {
        let mut current = String::new();
        let mut width = 0;

        for word in source.split(' ') {
            let word_width = display_width(word);
            let sep = usize::from(!current.is_empty());

            if width + sep + word_width <= max_units {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                width += sep + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }

            for c in word.chars() {
                let cw = char_width(c);
                if width + cw > max_units && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                current.push(c);
                width += cw;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn char_width(c: char) -> usize {
    if (c as u32) >= 0x2E80 {
        2
    } else {
        1
    }
}

fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

#[cfg(feature = "pdf-report")]
mod render {
    use printpdf::*;
    use std::fs::File;
    use std::io::BufWriter;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::path::{Path, PathBuf};

    use super::{wrap_text, FontChoice, PdfBlock, PdfLayout};
    use crate::report::{ExportError, ReportFormat, REPORT_TITLE};

    const PAGE_WIDTH_MM: f32 = 210.0;
    const PAGE_HEIGHT_MM: f32 = 297.0;
    const MARGIN_MM: f32 = 20.0;
    const PT_TO_MM: f32 = 0.352_778;

    struct Fonts {
        regular: IndirectFontRef,
        bold: IndirectFontRef,
    }

    /// Draws blocks top to bottom, adding pages as needed
    struct PageWriter<'a> {
        doc: &'a PdfDocumentReference,
        layer: PdfLayerReference,
        y: f32,
        pages: usize,
    }

    impl PageWriter<'_> {
        fn ensure_room(&mut self, height: f32) {
            if self.y - height < MARGIN_MM {
                let (page, layer) = self.doc.add_page(
                    Mm(PAGE_WIDTH_MM),
                    Mm(PAGE_HEIGHT_MM),
                    format!("Layer {}", self.pages + 1),
                );
                self.layer = self.doc.get_page(page).get_layer(layer);
                self.y = PAGE_HEIGHT_MM - MARGIN_MM;
                self.pages += 1;
            }
        }

        fn text(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
            let line_height = size * PT_TO_MM * 1.45;
            let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
            let max_units = (usable / (size * PT_TO_MM * 0.5)) as usize;

            for line in wrap_text(text, max_units) {
                self.ensure_room(line_height);
                self.y -= line_height;
                self.layer
                    .use_text(line, size, Mm(MARGIN_MM), Mm(self.y), font);
            }
        }

        fn gap(&mut self, points: f32) {
            self.y -= points * PT_TO_MM;
        }
    }

    pub(super) fn render_layout(
        layout: &PdfLayout,
        font_candidates: &[PathBuf],
    ) -> Result<(Vec<u8>, FontChoice), ExportError> {
        let (doc, page1, layer1) = PdfDocument::new(
            REPORT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        let (fonts, choice) = register_fonts(&doc, font_candidates)?;

        let pages = {
            let mut writer = PageWriter {
                doc: &doc,
                layer: doc.get_page(page1).get_layer(layer1),
                y: PAGE_HEIGHT_MM - MARGIN_MM,
                pages: 1,
            };

            for block in &layout.blocks {
                match block {
                    PdfBlock::Title(text) => writer.text(text, 20.0, &fonts.bold),
                    PdfBlock::Heading(text) => writer.text(text, 15.0, &fonts.bold),
                    PdfBlock::Meta(text) => writer.text(text, 10.0, &fonts.regular),
                    PdfBlock::Paragraph(text) => writer.text(text, 10.5, &fonts.regular),
                    PdfBlock::Spacer(points) => writer.gap(*points),
                }
            }
            writer.pages
        };

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ExportError::render(ReportFormat::Pdf, e))?;
        let bytes = buf
            .into_inner()
            .map_err(|e| ExportError::render(ReportFormat::Pdf, e))?;

        tracing::debug!(
            "[ReportExporter] PDF rendered: {} bytes, {} pages, font {:?}",
            bytes.len(),
            pages,
            choice
        );

        Ok((bytes, choice))
    }

    /// Unicode font if one registers, built-in Helvetica otherwise
    fn register_fonts(
        doc: &PdfDocumentReference,
        candidates: &[PathBuf],
    ) -> Result<(Fonts, FontChoice), ExportError> {
        match register_unicode_font(doc, candidates) {
            Ok((font, path)) => {
                tracing::info!("[ReportExporter] Using Unicode font {}", path.display());
                Ok((
                    Fonts {
                        regular: font.clone(),
                        bold: font,
                    },
                    FontChoice::External(path),
                ))
            }
            Err(reason) => {
                tracing::warn!(
                    "[ReportExporter] {}; falling back to built-in Helvetica (non-Latin text may not render)",
                    reason
                );
                let regular = doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| ExportError::render(ReportFormat::Pdf, e))?;
                let bold = doc
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|e| ExportError::render(ReportFormat::Pdf, e))?;
                Ok((Fonts { regular, bold }, FontChoice::Builtin))
            }
        }
    }

    fn register_unicode_font(
        doc: &PdfDocumentReference,
        candidates: &[PathBuf],
    ) -> Result<(IndirectFontRef, PathBuf), String> {
        for path in candidates.iter().filter(|p| p.is_file()) {
            match load_font(doc, path) {
                Ok(font) => return Ok((font, path.clone())),
                Err(e) => tracing::debug!("[ReportExporter] Font {} rejected: {}", path.display(), e),
            }
        }
        Err("no usable Unicode font found".to_string())
    }

    fn load_font(doc: &PdfDocumentReference, path: &Path) -> Result<IndirectFontRef, String> {
        let file = File::open(path).map_err(|e| e.to_string())?;
        catch_unwind(AssertUnwindSafe(|| doc.add_external_font(file)))
            .map_err(|_| "font parser panicked".to_string())?
            .map_err(|e| e.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::report::ReportInput;

        fn page_count(bytes: &[u8]) -> usize {
            lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
        }

        #[test]
        fn test_missing_font_falls_back_to_builtin() {
            let layout = PdfLayout::build(&ReportInput::new("A\n\nB", "text"));
            let (bytes, choice) =
                render_layout(&layout, &[PathBuf::from("/nonexistent/font.ttf")]).unwrap();

            assert_eq!(choice, FontChoice::Builtin);
            assert!(bytes.starts_with(b"%PDF"));
        }

        #[test]
        fn test_unparseable_font_falls_back_to_builtin() {
            let dir = tempfile::tempdir().unwrap();
            let fake = dir.path().join("fake.ttf");
            std::fs::write(&fake, b"definitely not a font").unwrap();

            let layout = PdfLayout::build(&ReportInput::new("result", "text"));
            let (_, choice) = render_layout(&layout, &[fake]).unwrap();
            assert_eq!(choice, FontChoice::Builtin);
        }

        #[test]
        fn test_long_report_spans_pages() {
            let long = (0..120)
                .map(|i| format!("Issue {i}: clause requires revision."))
                .collect::<Vec<_>>()
                .join("\n\n");
            let layout = PdfLayout::build(&ReportInput::new(&long, "short input"));
            let (bytes, _) = render_layout(&layout, &[]).unwrap();

            assert!(page_count(&bytes) > 1);
        }

        #[test]
        fn test_short_report_is_one_page() {
            let layout = PdfLayout::build(&ReportInput::new("Overall: fine", "input"));
            let (bytes, _) = render_layout(&layout, &[]).unwrap();
            assert_eq!(page_count(&bytes), 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_chunks_make_three_paragraphs() {
        let layout = PdfLayout::build(&ReportInput::new("A\n\nB\n\nC", "original"));
        assert_eq!(layout.analysis_blocks(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_layout_order() {
        let input = ReportInput::new("result", "original");
        let layout = PdfLayout::build(&input);
        let texts: Vec<&PdfBlock> = layout
            .blocks
            .iter()
            .filter(|b| !matches!(b, PdfBlock::Spacer(_)))
            .collect();

        assert_eq!(
            texts,
            vec![
                &PdfBlock::Title(REPORT_TITLE.to_string()),
                &PdfBlock::Meta(input.timestamp_line()),
                &PdfBlock::Heading("Original Text".to_string()),
                &PdfBlock::Paragraph("original".to_string()),
                &PdfBlock::Heading("Analysis Result".to_string()),
                &PdfBlock::Paragraph("result".to_string()),
            ]
        );
    }

    #[test]
    fn test_paragraph_split_ignores_blank_chunks() {
        assert_eq!(
            analysis_paragraphs("\n\nFirst\r\n\r\nSecond line\nstill second\n  \n\n\nThird\n\n"),
            vec!["First", "Second line\nstill second", "Third"]
        );
        assert!(analysis_paragraphs("   \n\n  ").is_empty());
    }

    #[test]
    fn test_wrap_latin_on_spaces() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_cjk_by_width() {
        let lines = wrap_text("合同双方应当遵守法律", 8);
        assert_eq!(lines, vec!["合同双方", "应当遵守", "法律"]);
    }

    #[test]
    fn test_wrap_keeps_source_lines() {
        let lines = wrap_text("one\n\ntwo", 40);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn test_font_candidates_put_configured_first() {
        let exporter = PdfExporter::new(Some(PathBuf::from("/fonts/custom.ttf")));
        let candidates = exporter.font_candidates();
        assert_eq!(candidates[0], PathBuf::from("/fonts/custom.ttf"));
        assert_eq!(candidates.len(), SYSTEM_FONT_CANDIDATES.len() + 1);
    }

    #[cfg(not(feature = "pdf-report"))]
    #[test]
    fn test_pdf_unavailable_without_feature() {
        let err = PdfExporter::new(None)
            .render(&ReportInput::new("r", "t"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Unavailable(ReportFormat::Pdf)));
    }
}
