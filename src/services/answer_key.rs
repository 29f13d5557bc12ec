use std::time::Instant;

use time::PrimitiveDateTime;

use crate::core::time::format_document_date;
use crate::db::models::Question;
use crate::services::answers::answer_line;
use crate::services::pdf::{DocumentLayout, PdfError};

const TITLE_SIZE: f32 = 18.0;
const META_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 11.0;
const ANSWER_INDENT: f32 = 18.0;

#[derive(Debug, Clone)]
pub(crate) struct AnswerKeyMetadata {
    pub(crate) paper_title: String,
    pub(crate) subject_name: String,
    pub(crate) chapter_scope: String,
    pub(crate) generated_at: PrimitiveDateTime,
}

/// `Full book` when no chapter restriction applies, otherwise the chapter names.
pub(crate) fn chapter_scope(chapter_names: &[String]) -> String {
    if chapter_names.is_empty() {
        "Full book".to_string()
    } else {
        format!("Chapters: {}", chapter_names.join(", "))
    }
}

pub(crate) fn layout_answer_key(meta: &AnswerKeyMetadata, questions: &[Question]) -> DocumentLayout {
    let title = format!("{} - Answer Key", meta.paper_title);
    let mut layout = DocumentLayout::new(title.clone(), format!("{title} (continued)"));

    layout.heading(&title, TITLE_SIZE);
    layout.spacer(4.0);
    layout.paragraph(&format!("Subject: {}", meta.subject_name), META_SIZE);
    layout.paragraph(&format!("Scope: {}", meta.chapter_scope), META_SIZE);
    layout.paragraph(&format!("Total MCQs: {}", questions.len()), META_SIZE);
    layout.paragraph(
        &format!("Generated: {}", format_document_date(meta.generated_at)),
        META_SIZE,
    );
    layout.spacer(12.0);

    for (index, question) in questions.iter().enumerate() {
        layout.paragraph(&format!("{}. {}", index + 1, question.question_text.trim()), BODY_SIZE);
        layout.indented(&answer_line(question), BODY_SIZE, ANSWER_INDENT);
        layout.spacer(6.0);
    }

    layout
}

pub(crate) fn render_answer_key(
    meta: &AnswerKeyMetadata,
    questions: &[Question],
) -> Result<Vec<u8>, PdfError> {
    let started = Instant::now();
    let bytes = layout_answer_key(meta, questions).render()?;

    metrics::histogram!("document_render_seconds", "document" => "answer_key")
        .record(started.elapsed().as_secs_f64());
    metrics::counter!("documents_generated_total", "document" => "answer_key").increment(1);

    Ok(bytes)
}
