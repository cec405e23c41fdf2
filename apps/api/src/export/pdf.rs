//! Summary PDF writer. Lays out the interview summary on US-letter pages.
//!
//! Layout is a single top-down cursor: each block measures itself with the
//! static font tables, breaks to a new page when it would cross the bottom
//! margin, and emits raw content-stream operators.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::export::font_metrics::{get_metrics, sanitize, PdfFont};
use crate::models::candidate::CandidateProfile;
use crate::models::interview::ResponseRecord;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const LEADING: f32 = 1.25;

const LABEL_COLUMN_WIDTH: f32 = 150.0;
const VALUE_COLUMN_WIDTH: f32 = 300.0;
const CELL_PADDING: f32 = 6.0;

pub const DOCUMENT_TITLE: &str = "Technical Interview Summary";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the interview has no responses")]
    NothingToExport,

    #[error("Failed to encode page content: {0}")]
    Encode(String),

    #[error("Failed to write PDF: {0}")]
    Write(String),
}

/// Data rendered into the summary document.
#[derive(Debug, Clone, Copy)]
pub struct SummaryDocument<'a> {
    pub profile: Option<&'a CandidateProfile>,
    pub skills: &'a [String],
    pub responses: &'a [ResponseRecord],
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: PdfFont,
    size: f32,
    space_before: f32,
    space_after: f32,
}

const TITLE: TextStyle = TextStyle {
    font: PdfFont::HelveticaBold,
    size: 24.0,
    space_before: 0.0,
    space_after: 30.0,
};
const SECTION: TextStyle = TextStyle {
    font: PdfFont::HelveticaBold,
    size: 16.0,
    space_before: 20.0,
    space_after: 12.0,
};
const HEADING: TextStyle = TextStyle {
    font: PdfFont::HelveticaBold,
    size: 14.0,
    space_before: 10.0,
    space_after: 6.0,
};
const SUBHEADING: TextStyle = TextStyle {
    font: PdfFont::HelveticaBold,
    size: 12.0,
    space_before: 4.0,
    space_after: 4.0,
};
const BODY: TextStyle = TextStyle {
    font: PdfFont::Helvetica,
    size: 10.0,
    space_before: 0.0,
    space_after: 0.0,
};

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

struct PageWriter {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.ops);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        let at_top = self.y >= PAGE_HEIGHT - MARGIN;
        if self.y - height < MARGIN && !at_top {
            self.new_page();
        }
    }

    fn spacer(&mut self, height: f32) {
        self.y -= height;
    }

    fn draw_text(&mut self, font: PdfFont, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), real(size)],
        ));
        self.ops.push(Operation::new("Td", vec![real(x), real(y)]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(text.to_string())],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn paragraph(&mut self, text: &str, style: TextStyle) {
        self.paragraph_aligned(text, style, false);
    }

    fn paragraph_aligned(&mut self, text: &str, style: TextStyle, centered: bool) {
        let metrics = get_metrics(style.font);
        let line_height = style.size * LEADING;
        let text = sanitize(text);

        self.spacer(style.space_before);
        for line in metrics.wrap(&text, style.size, CONTENT_WIDTH) {
            self.ensure_space(line_height);
            self.y -= line_height;
            let x = if centered {
                MARGIN + (CONTENT_WIDTH - metrics.measure_str(&line, style.size)) / 2.0
            } else {
                MARGIN
            };
            if !line.is_empty() {
                self.draw_text(style.font, style.size, x, self.y, &line);
            }
        }
        self.spacer(style.space_after);
    }

    /// Two-column grid: bold labels on a shaded column, values in the body font.
    fn table(&mut self, rows: &[(&str, &str)]) {
        let style = BODY;
        let label_font = PdfFont::HelveticaBold;
        let line_height = style.size * LEADING;

        for (label, value) in rows {
            let label_lines = get_metrics(label_font).wrap(
                &sanitize(label),
                style.size,
                LABEL_COLUMN_WIDTH - 2.0 * CELL_PADDING,
            );
            let value_lines = get_metrics(style.font).wrap(
                &sanitize(value),
                style.size,
                VALUE_COLUMN_WIDTH - 2.0 * CELL_PADDING,
            );
            let line_count = label_lines.len().max(value_lines.len()).max(1);
            let row_height = line_count as f32 * line_height + 2.0 * CELL_PADDING;

            self.ensure_space(row_height);
            let top = self.y;
            let bottom = top - row_height;

            self.ops.extend([
                Operation::new("q", vec![]),
                Operation::new("rg", vec![real(0.83), real(0.83), real(0.83)]),
                Operation::new(
                    "re",
                    vec![real(MARGIN), real(bottom), real(LABEL_COLUMN_WIDTH), real(row_height)],
                ),
                Operation::new("f", vec![]),
                Operation::new("Q", vec![]),
                Operation::new("w", vec![1.into()]),
                Operation::new(
                    "re",
                    vec![real(MARGIN), real(bottom), real(LABEL_COLUMN_WIDTH), real(row_height)],
                ),
                Operation::new(
                    "re",
                    vec![
                        real(MARGIN + LABEL_COLUMN_WIDTH),
                        real(bottom),
                        real(VALUE_COLUMN_WIDTH),
                        real(row_height),
                    ],
                ),
                Operation::new("S", vec![]),
            ]);

            for (font, column_x, lines) in [
                (label_font, MARGIN + CELL_PADDING, &label_lines),
                (style.font, MARGIN + LABEL_COLUMN_WIDTH + CELL_PADDING, &value_lines),
            ] {
                let mut baseline = top - CELL_PADDING;
                for line in lines.iter() {
                    baseline -= line_height;
                    if !line.is_empty() {
                        self.draw_text(font, style.size, column_x, baseline, line);
                    }
                }
            }

            self.y = bottom;
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

fn display_or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn layout(summary: &SummaryDocument<'_>) -> Vec<Vec<Operation>> {
    let mut writer = PageWriter::new();
    writer.paragraph_aligned(DOCUMENT_TITLE, TITLE, true);

    if let Some(profile) = summary.profile {
        writer.paragraph("Personal Information", SECTION);
        writer.table(&[
            ("Full Name", display_or_na(&profile.full_name)),
            ("Email", display_or_na(&profile.email)),
            ("Phone", display_or_na(&profile.phone)),
            ("Experience", display_or_na(&profile.experience)),
            ("Position", display_or_na(&profile.desired_position)),
            ("Location", display_or_na(&profile.location)),
        ]);
        writer.spacer(20.0);
    }

    if !summary.skills.is_empty() {
        writer.paragraph("Technical Skills", SECTION);
        writer.paragraph(&summary.skills.join(", "), BODY);
        writer.spacer(20.0);
    }

    if !summary.responses.is_empty() {
        writer.paragraph("Interview Questions and Evaluations", SECTION);
        for (i, record) in summary.responses.iter().enumerate() {
            writer.paragraph(&format!("Question {}:", i + 1), HEADING);
            writer.paragraph(&record.question, BODY);
            writer.spacer(10.0);
            writer.paragraph("Your Answer:", SUBHEADING);
            writer.paragraph(&record.answer, BODY);
            writer.spacer(10.0);
            writer.paragraph("AI Evaluation:", SUBHEADING);
            writer.paragraph(&record.evaluation, BODY);
            writer.spacer(20.0);
        }
    }

    writer.finish()
}

/// Renders the summary into a complete PDF file.
pub fn build_summary_pdf(summary: &SummaryDocument<'_>) -> Result<Vec<u8>, ExportError> {
    if summary.responses.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_dict = {
        let mut fonts = lopdf::Dictionary::new();
        for font in [PdfFont::Helvetica, PdfFont::HelveticaBold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        fonts
    };
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_dict,
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in layout(summary) {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            full_name: "Linus Example".to_string(),
            email: "linus@example.com".to_string(),
            phone: "+14155550123".to_string(),
            experience: "4".to_string(),
            desired_position: "Platform Engineer".to_string(),
            location: "Helsinki".to_string(),
            resume: "linus.pdf".to_string(),
        }
    }

    fn record(n: usize, body_words: usize) -> ResponseRecord {
        ResponseRecord {
            question: format!("[Difficulty: Medium] Question number {n}?"),
            answer: "word ".repeat(body_words),
            evaluation: "Strengths:\n* Clear\nOverall assessment: Good.".to_string(),
        }
    }

    #[test]
    fn test_empty_transcript_is_rejected() {
        let summary = SummaryDocument {
            profile: None,
            skills: &[],
            responses: &[],
        };
        assert!(matches!(
            build_summary_pdf(&summary),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_pdf_is_well_formed_single_page() {
        let profile = profile();
        let skills = vec!["Python".to_string(), "Docker".to_string()];
        let responses = vec![record(1, 20)];
        let bytes = build_summary_pdf(&SummaryDocument {
            profile: Some(&profile),
            skills: &skills,
            responses: &responses,
        })
        .unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_transcript_flows_onto_more_pages() {
        let profile = profile();
        let responses: Vec<ResponseRecord> = (1..=5).map(|n| record(n, 600)).collect();
        let bytes = build_summary_pdf(&SummaryDocument {
            profile: Some(&profile),
            skills: &[],
            responses: &responses,
        })
        .unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_text_stays_within_margins() {
        let responses: Vec<ResponseRecord> = (1..=3).map(|n| record(n, 400)).collect();
        let summary = SummaryDocument {
            profile: None,
            skills: &[],
            responses: &responses,
        };
        for page in layout(&summary) {
            for op in page.iter().filter(|op| op.operator == "Td") {
                let y = match op.operands[1] {
                    Object::Real(v) => v as f32,
                    Object::Integer(v) => v as f32,
                    ref other => panic!("unexpected Td operand {other:?}"),
                };
                assert!(y >= MARGIN - 1.0, "baseline {y} below bottom margin");
                assert!(y <= PAGE_HEIGHT - MARGIN);
            }
        }
    }

    /// Font resource in effect for each `Tj` string on a page.
    fn fonts_by_text(ops: &[Operation]) -> Vec<(String, String)> {
        let mut font = String::new();
        let mut drawn = Vec::new();
        for op in ops {
            match (op.operator.as_str(), op.operands.first()) {
                ("Tf", Some(Object::Name(name))) => font = String::from_utf8_lossy(name).into_owned(),
                ("Tj", Some(Object::String(text, _))) => {
                    drawn.push((String::from_utf8_lossy(text).into_owned(), font.clone()))
                }
                _ => {}
            }
        }
        drawn
    }

    #[test]
    fn test_profile_labels_are_bold_and_values_regular() {
        let profile = profile();
        let responses = vec![record(1, 5)];
        let pages = layout(&SummaryDocument {
            profile: Some(&profile),
            skills: &[],
            responses: &responses,
        });
        let drawn = fonts_by_text(&pages[0]);
        let font_of = |text: &str| {
            drawn
                .iter()
                .find(|(t, _)| t == text)
                .map(|(_, f)| f.as_str())
                .unwrap()
                .to_string()
        };

        assert_eq!(font_of("Full Name"), PdfFont::HelveticaBold.resource_name());
        assert_eq!(font_of("Linus Example"), PdfFont::Helvetica.resource_name());
        assert_eq!(font_of("Helsinki"), PdfFont::Helvetica.resource_name());
    }

    #[test]
    fn test_missing_profile_values_render_as_na() {
        assert_eq!(display_or_na("  "), "N/A");
        assert_eq!(display_or_na("Paris"), "Paris");
    }
}
