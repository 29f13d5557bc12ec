use std::time::Instant;

use time::PrimitiveDateTime;

use crate::core::time::format_document_date;
use crate::db::models::Question;
use crate::services::answers::{option_text, OptionLetter};
use crate::services::pdf::{DocumentLayout, PdfError};

const TITLE_SIZE: f32 = 18.0;
const META_SIZE: f32 = 10.0;
const SECTION_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 11.0;
const OPTION_INDENT: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionMarks {
    pub(crate) mcq: u32,
    pub(crate) short: u32,
    pub(crate) long: u32,
}

impl Default for SectionMarks {
    fn default() -> Self {
        Self { mcq: 1, short: 2, long: 5 }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PaperSections {
    pub(crate) mcq: Vec<Question>,
    pub(crate) short: Vec<Question>,
    pub(crate) long: Vec<Question>,
}

impl PaperSections {
    pub(crate) fn is_empty(&self) -> bool {
        self.mcq.is_empty() && self.short.is_empty() && self.long.is_empty()
    }

    pub(crate) fn total_marks(&self, marks: SectionMarks) -> u32 {
        self.mcq.len() as u32 * marks.mcq
            + self.short.len() as u32 * marks.short
            + self.long.len() as u32 * marks.long
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PaperMetadata {
    pub(crate) title: String,
    pub(crate) subject_name: String,
    pub(crate) time_minutes: u32,
    pub(crate) marks: SectionMarks,
    pub(crate) generated_at: PrimitiveDateTime,
}

pub(crate) fn layout_paper(meta: &PaperMetadata, sections: &PaperSections) -> DocumentLayout {
    let mut layout = DocumentLayout::new(meta.title.clone(), format!("{} (continued)", meta.title));

    layout.heading(&meta.title, TITLE_SIZE);
    layout.spacer(4.0);
    layout.paragraph(&format!("Subject: {}", meta.subject_name), META_SIZE);
    layout.paragraph(&format!("Time allowed: {} minutes", meta.time_minutes), META_SIZE);
    layout.paragraph(&format!("Total marks: {}", sections.total_marks(meta.marks)), META_SIZE);
    layout.paragraph(&format!("Date: {}", format_document_date(meta.generated_at)), META_SIZE);

    if !sections.mcq.is_empty() {
        section_heading(&mut layout, "Section A - Multiple Choice Questions", &sections.mcq, meta.marks.mcq);
        for (index, question) in sections.mcq.iter().enumerate() {
            layout.paragraph(&format!("{}. {}", index + 1, question.question_text.trim()), BODY_SIZE);
            for letter in OptionLetter::ALL {
                if let Some(text) = option_text(question, letter) {
                    layout.indented(&format!("{}) {text}", letter.as_str()), BODY_SIZE, OPTION_INDENT);
                }
            }
            layout.spacer(6.0);
        }
    }

    if !sections.short.is_empty() {
        section_heading(&mut layout, "Section B - Short Questions", &sections.short, meta.marks.short);
        write_numbered(&mut layout, &sections.short);
    }

    if !sections.long.is_empty() {
        section_heading(&mut layout, "Section C - Long Questions", &sections.long, meta.marks.long);
        write_numbered(&mut layout, &sections.long);
    }

    layout
}

fn section_heading(layout: &mut DocumentLayout, name: &str, questions: &[Question], marks_each: u32) {
    layout.spacer(14.0);
    let count = questions.len() as u32;
    layout.heading(
        &format!("{name} ({count} x {marks_each} = {} marks)", count * marks_each),
        SECTION_SIZE,
    );
    layout.spacer(4.0);
}

fn write_numbered(layout: &mut DocumentLayout, questions: &[Question]) {
    for (index, question) in questions.iter().enumerate() {
        layout.paragraph(&format!("{}. {}", index + 1, question.question_text.trim()), BODY_SIZE);
        layout.spacer(6.0);
    }
}

pub(crate) fn render_paper(
    meta: &PaperMetadata,
    sections: &PaperSections,
) -> Result<Vec<u8>, PdfError> {
    let started = Instant::now();
    let bytes = layout_paper(meta, sections).render()?;

    metrics::histogram!("document_render_seconds", "document" => "paper")
        .record(started.elapsed().as_secs_f64());
    metrics::counter!("documents_generated_total", "document" => "paper").increment(1);

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::types::QuestionType;
    use crate::test_support::question;

    fn metadata() -> PaperMetadata {
        PaperMetadata {
            title: "Final Exam".to_string(),
            subject_name: "Chemistry".to_string(),
            time_minutes: 90,
            marks: SectionMarks::default(),
            generated_at: primitive_now_utc(),
        }
    }

    #[test]
    fn paper_has_three_sections_with_totals() {
        let sections = PaperSections {
            mcq: vec![question("m1", "S").text("Pick one").options(["x", "", "z", ""]).build()],
            short: vec![
                question("s1", "S").kind(QuestionType::Short).text("Define mole").build(),
                question("s2", "S").kind(QuestionType::Short).text("Define ion").build(),
            ],
            long: vec![question("l1", "S").kind(QuestionType::Long).text("Explain bonding").build()],
        };

        let layout = layout_paper(&metadata(), &sections);
        let texts = layout.pages().iter().flat_map(|page| page.texts()).collect::<Vec<_>>();

        assert_eq!(texts[0], "Final Exam");
        assert!(texts.contains(&"Time allowed: 90 minutes"));
        assert!(texts.contains(&"Total marks: 10"));
        let body = texts
            .iter()
            .skip_while(|text| !text.starts_with("Section A"))
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(
            body,
            vec![
                "Section A - Multiple Choice Questions (1 x 1 = 1 marks)",
                "1. Pick one",
                "A) x",
                "C) z",
                "Section B - Short Questions (2 x 2 = 4 marks)",
                "1. Define mole",
                "2. Define ion",
                "Section C - Long Questions (1 x 5 = 5 marks)",
                "1. Explain bonding",
            ]
        );
    }

    #[test]
    fn empty_sections_are_omitted() {
        let sections = PaperSections {
            long: vec![question("l1", "S").kind(QuestionType::Long).build()],
            ..PaperSections::default()
        };

        let layout = layout_paper(&metadata(), &sections);
        let texts = layout.pages().iter().flat_map(|page| page.texts()).collect::<Vec<_>>();

        assert!(!texts.iter().any(|text| text.starts_with("Section A")));
        assert!(!texts.iter().any(|text| text.starts_with("Section B")));
        assert!(texts.iter().any(|text| text.starts_with("Section C")));
    }

    #[test]
    fn long_paper_pages_start_with_continued_title() {
        let sections = PaperSections {
            short: (0..70)
                .map(|index| {
                    question(&format!("s{index:02}"), "S")
                        .kind(QuestionType::Short)
                        .text(&format!("Short question {index}"))
                        .build()
                })
                .collect(),
            ..PaperSections::default()
        };

        let layout = layout_paper(&metadata(), &sections);

        assert!(layout.pages().len() > 1);
        for page in &layout.pages()[1..] {
            assert_eq!(page.texts().next(), Some("Final Exam (continued)"));
        }
        assert!(render_paper(&metadata(), &sections).is_ok());
    }
}
