use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::errors::ApiError;
use crate::core::config::Settings;
use crate::core::state::AppState;
use crate::db::models::Question;
use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType};
use crate::repositories;
use crate::services::answer_key::chapter_scope;
use crate::services::question_selection::{
    fetch_in_order, normalize_ids, select_questions, SelectionCriteria,
};
use crate::services::storage::PDF_CONTENT_TYPE;

const FULL_BOOK: &str = "full_book";
const MANUAL: &str = "manual";
const DEFAULT_TITLE: &str = "Question Paper";

pub(crate) const PAPER_ID_HEADER: &str = "x-paper-id";

/// Chapter restriction applies only for a non-empty list outside full-book mode.
pub(super) fn chapter_filter(selected: &[String], chapter_option: Option<&str>) -> Vec<String> {
    let full_book =
        chapter_option.map(str::trim).is_some_and(|option| option.eq_ignore_ascii_case(FULL_BOOK));
    if full_book {
        return Vec::new();
    }
    normalize_ids(selected)
}

/// Explicit ids are honoured unless the caller names a method other than manual.
pub(super) fn allows_explicit_ids(selection_method: Option<&str>) -> bool {
    match selection_method.map(str::trim).filter(|method| !method.is_empty()) {
        Some(method) => method.eq_ignore_ascii_case(MANUAL),
        None => true,
    }
}

pub(super) fn parse_difficulty(raw: Option<&str>) -> Result<Option<DifficultyLevel>, ApiError> {
    DifficultyLevel::parse_filter(raw).map_err(ApiError::BadRequest)
}

pub(super) fn parse_source(raw: Option<&str>) -> Result<Option<QuestionSource>, ApiError> {
    QuestionSource::parse_filter(raw).map_err(ApiError::BadRequest)
}

pub(super) fn check_count(count: i64, settings: &Settings, field: &str) -> Result<i64, ApiError> {
    let max = settings.generation().max_questions_per_type;
    if count > max {
        return Err(ApiError::BadRequest(format!("{field} must be at most {max}")));
    }
    Ok(count)
}

pub(super) fn paper_title(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// ASCII file name derived from the title, e.g. `midterm-physics-answer-key.pdf`.
pub(super) fn attachment_filename(title: &str, suffix: &str) -> String {
    let mut slug = String::new();
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let stem = if slug.is_empty() { "paper" } else { slug };
    format!("{stem}-{suffix}.pdf")
}

pub(super) fn pdf_response(bytes: Vec<u8>, filename: &str) -> Response {
    let mut response = (StatusCode::OK, bytes).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(PDF_CONTENT_TYPE));
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

pub(super) fn with_paper_id(mut response: Response, paper_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(paper_id) {
        response.headers_mut().insert(HeaderName::from_static(PAPER_ID_HEADER), value);
    }
    response
}

pub(super) async fn subject_name(state: &AppState, subject_id: &str) -> Result<String, ApiError> {
    let subject = repositories::subjects::find_by_id(state.db(), subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load subject"))?;
    Ok(subject.map(|subject| subject.name).unwrap_or_else(|| subject_id.to_string()))
}

pub(super) async fn scope_label(state: &AppState, chapter_ids: &[String]) -> Result<String, ApiError> {
    let names = repositories::chapters::list_names_by_ids(state.db(), chapter_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load chapters"))?;
    Ok(chapter_scope(&names))
}

/// Filters shared by every question type of one generation request.
pub(super) struct SelectionBase {
    pub(super) subject_id: String,
    pub(super) chapter_ids: Vec<String>,
    pub(super) source_type: Option<QuestionSource>,
    pub(super) explicit_ids_allowed: bool,
}

impl SelectionBase {
    /// Normalized explicit ids for one type, empty when the request selects automatically.
    pub(super) fn explicit_ids(&self, raw_ids: &[String]) -> Vec<String> {
        if self.explicit_ids_allowed {
            normalize_ids(raw_ids)
        } else {
            Vec::new()
        }
    }
}

/// Explicit ids win when the request allows them and names any; otherwise the fallback selection.
pub(super) async fn load_questions(
    state: &AppState,
    base: &SelectionBase,
    question_type: QuestionType,
    count: i64,
    difficulty: Option<DifficultyLevel>,
    manual_ids: &[String],
) -> Result<Vec<Question>, ApiError> {
    let explicit = base.explicit_ids(manual_ids);
    if !explicit.is_empty() {
        let field = format!("selectedQuestions.{}", question_type.as_str());
        check_count(explicit.len() as i64, state.settings(), &field)?;
        return fetch_in_order(state.db(), &explicit)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load selected questions"));
    }

    let criteria = SelectionCriteria {
        question_type,
        subject_id: base.subject_id.clone(),
        chapter_ids: base.chapter_ids.clone(),
        source_type: base.source_type,
        difficulty,
        count,
    };
    let (_, questions) = select_questions(state.db(), &criteria)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to select questions"))?;
    Ok(questions)
}
