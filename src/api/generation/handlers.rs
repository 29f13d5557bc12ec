use axum::extract::State;
use axum::response::Response;
use uuid::Uuid;

use super::helpers::{
    allows_explicit_ids, attachment_filename, chapter_filter, check_count, load_questions, paper_title,
    parse_difficulty, parse_source, pdf_response, scope_label, subject_name, with_paper_id,
    SelectionBase,
};
use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::api::validation::{required_text, validate_payload, ApiJson};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Paper, PaperQuestionIds, Question};
use crate::db::types::QuestionType;
use crate::repositories;
use crate::schemas::generation::{GenerateMcqKeyRequest, GeneratePaperRequest, SelectedQuestions};
use crate::services::answer_key::{render_answer_key, AnswerKeyMetadata};
use crate::services::paper::{render_paper, PaperMetadata, PaperSections, SectionMarks};
use crate::services::question_selection::fetch_in_order;
use crate::services::storage::PaperDocument;

/// Open to anonymous callers; only staff callers update the stored paper's key.
pub(super) async fn generate_mcq_key(
    staff: Option<CurrentStaff>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GenerateMcqKeyRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let subject_id = required_text(payload.subject_id.as_deref(), "subjectId")?;
    let difficulty = parse_difficulty(payload.mcq_difficulty.as_deref())?;
    let source_type = parse_source(payload.source_type.as_deref())?;
    let count = check_count(payload.mcq_count, state.settings(), "mcqCount")?;
    let title = paper_title(payload.paper_title.as_deref());
    let base = SelectionBase {
        subject_id: subject_id.clone(),
        chapter_ids: chapter_filter(&payload.selected_chapters, payload.chapter_option.as_deref()),
        source_type,
        explicit_ids_allowed: allows_explicit_ids(payload.selection_method.as_deref()),
    };

    let paper = match payload.paper_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(paper_id) => {
            let paper = repositories::papers::find_by_id(state.db(), paper_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load paper"))?;
            if paper.is_none() {
                tracing::warn!(paper_id, "Paper not found, selecting questions from filters");
            }
            paper
        }
        None => None,
    };

    let questions = match paper.as_ref().filter(|paper| !paper.question_ids.mcq.is_empty()) {
        Some(paper) => fetch_in_order(state.db(), &paper.question_ids.mcq)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load paper questions"))?,
        None => {
            let manual_ids =
                payload.selected_questions.as_ref().map(|selected| selected.mcq.as_slice());
            load_questions(
                &state,
                &base,
                QuestionType::Mcq,
                count,
                difficulty,
                manual_ids.unwrap_or_default(),
            )
            .await?
        }
    };

    if questions.is_empty() {
        return Err(ApiError::NotFound("No MCQs found for the given criteria".to_string()));
    }

    let meta = AnswerKeyMetadata {
        paper_title: title.clone(),
        subject_name: subject_name(&state, &subject_id).await?,
        chapter_scope: scope_label(&state, &base.chapter_ids).await?,
        generated_at: primitive_now_utc(),
    };
    let bytes = render_answer_key(&meta, &questions)
        .map_err(|e| ApiError::internal(e, "Failed to render answer key"))?;

    tracing::info!(
        subject_id = %subject_id,
        paper_id = paper.as_ref().map(|paper| paper.id.as_str()),
        questions = questions.len(),
        "Generated MCQ answer key"
    );

    match key_upload_target(paper.as_ref(), staff.as_ref()) {
        Some(paper) => store_document(&state, paper, PaperDocument::AnswerKey, &bytes).await,
        None if paper.is_some() => {
            tracing::debug!("Answer key not stored for a caller without staff access");
        }
        None => {}
    }

    Ok(pdf_response(bytes, &attachment_filename(&title, "answer-key")))
}

pub(super) async fn generate_paper(
    CurrentStaff(user): CurrentStaff,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<GeneratePaperRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let subject_id = required_text(payload.subject_id.as_deref(), "subjectId")?;
    let source_type = parse_source(payload.source_type.as_deref())?;
    let mcq_difficulty = parse_difficulty(payload.mcq_difficulty.as_deref())?;
    let short_difficulty = parse_difficulty(payload.short_difficulty.as_deref())?;
    let long_difficulty = parse_difficulty(payload.long_difficulty.as_deref())?;
    let mcq_count = check_count(payload.mcq_count, state.settings(), "mcqCount")?;
    let short_count = check_count(payload.short_count, state.settings(), "shortCount")?;
    let long_count = check_count(payload.long_count, state.settings(), "longCount")?;
    let title = paper_title(payload.paper_title.as_deref());
    let base = SelectionBase {
        subject_id: subject_id.clone(),
        chapter_ids: chapter_filter(&payload.selected_chapters, payload.chapter_option.as_deref()),
        source_type,
        explicit_ids_allowed: allows_explicit_ids(payload.selection_method.as_deref()),
    };
    let selected = payload.selected_questions.clone().unwrap_or_default();

    let sections = PaperSections {
        mcq: load_questions(&state, &base, QuestionType::Mcq, mcq_count, mcq_difficulty, &selected.mcq)
            .await?,
        short: load_questions(
            &state,
            &base,
            QuestionType::Short,
            short_count,
            short_difficulty,
            &selected.short,
        )
        .await?,
        long: load_questions(&state, &base, QuestionType::Long, long_count, long_difficulty, &selected.long)
            .await?,
    };

    if sections.is_empty() {
        return Err(ApiError::NotFound("No questions found for the given criteria".to_string()));
    }

    let marks = SectionMarks {
        mcq: payload.mcq_marks,
        short: payload.short_marks,
        long: payload.long_marks,
    };
    let now = primitive_now_utc();
    let paper_id = Uuid::new_v4().to_string();
    let paper = repositories::papers::create(
        state.db(),
        repositories::papers::CreatePaper {
            id: &paper_id,
            title: &title,
            subject_id: &subject_id,
            class_id: payload.class_id.as_deref().map(str::trim).filter(|id| !id.is_empty()),
            question_ids: PaperQuestionIds {
                mcq: question_ids(&sections.mcq),
                short: question_ids(&sections.short),
                long: question_ids(&sections.long),
            },
            settings: paper_settings(&payload, &base, marks),
            now,
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to save paper"))?;

    let meta = PaperMetadata {
        title: title.clone(),
        subject_name: subject_name(&state, &subject_id).await?,
        time_minutes: payload.time_minutes,
        marks,
        generated_at: now,
    };
    let bytes = render_paper(&meta, &sections)
        .map_err(|e| ApiError::internal(e, "Failed to render paper"))?;

    tracing::info!(
        paper_id = %paper.id,
        subject_id = %subject_id,
        mcq = sections.mcq.len(),
        short = sections.short.len(),
        long = sections.long.len(),
        user_id = %user.id,
        "Generated question paper"
    );

    store_document(&state, &paper, PaperDocument::Paper, &bytes).await;

    let response = pdf_response(bytes, &attachment_filename(&title, "paper"));
    Ok(with_paper_id(response, &paper.id))
}

/// The stored paper whose key may be replaced, when the caller is staff.
pub(super) fn key_upload_target<'a>(
    paper: Option<&'a Paper>,
    staff: Option<&CurrentStaff>,
) -> Option<&'a Paper> {
    staff.and(paper)
}

fn question_ids(questions: &[Question]) -> Vec<String> {
    questions.iter().map(|question| question.id.clone()).collect()
}

fn paper_settings(
    payload: &GeneratePaperRequest,
    base: &SelectionBase,
    marks: SectionMarks,
) -> serde_json::Value {
    let SelectedQuestions { mcq, short, long } =
        payload.selected_questions.clone().unwrap_or_default();
    let (mcq, short, long) =
        (base.explicit_ids(&mcq), base.explicit_ids(&short), base.explicit_ids(&long));
    let manual = !(mcq.is_empty() && short.is_empty() && long.is_empty());
    serde_json::json!({
        "selectionMethod": if manual { "manual" } else { "auto" },
        "chapterOption": payload.chapter_option,
        "selectedChapters": base.chapter_ids,
        "sourceType": base.source_type.map(|source| source.as_str()),
        "counts": {"mcq": payload.mcq_count, "short": payload.short_count, "long": payload.long_count},
        "difficulty": {
            "mcq": payload.mcq_difficulty,
            "short": payload.short_difficulty,
            "long": payload.long_difficulty,
        },
        "manualSelection": {"mcq": mcq.len(), "short": short.len(), "long": long.len()},
        "marks": {"mcq": marks.mcq, "short": marks.short, "long": marks.long},
        "timeMinutes": payload.time_minutes,
    })
}

/// Uploads a generated PDF for a stored paper. Failures are logged; the caller still gets the PDF.
async fn store_document(state: &AppState, paper: &Paper, document: PaperDocument, bytes: &[u8]) {
    let Some(storage) = state.storage() else {
        return;
    };

    let stored = match storage.upload_pdf(&paper.id, document, bytes.to_vec()).await {
        Ok(stored) => stored,
        Err(err) => {
            tracing::error!(error = %err, paper_id = %paper.id, "Failed to upload PDF");
            return;
        }
    };
    tracing::info!(
        paper_id = %paper.id,
        key = %stored.key,
        size = stored.size,
        sha256 = %stored.sha256,
        "Stored generated PDF"
    );

    let now = primitive_now_utc();
    let result = match document {
        PaperDocument::Paper => {
            repositories::papers::set_paper_url(state.db(), &paper.id, &stored.url, now).await
        }
        PaperDocument::AnswerKey => {
            repositories::papers::set_key_url(state.db(), &paper.id, &stored.url, now).await
        }
    };
    if let Err(err) = result {
        tracing::error!(error = %err, paper_id = %paper.id, "Failed to record PDF url");
    }
}
