use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{Page, PaginatedResponse};
use crate::api::validation::{validate_mcq_options, validate_payload, ApiJson};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType};
use crate::repositories;
use crate::schemas::question::{ListQuestionsQuery, QuestionResponse, QuestionWrite};

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn check_question(payload: &QuestionWrite) -> Result<Option<String>, ApiError> {
    validate_payload(payload)?;
    if payload.question_text.trim().is_empty() {
        return Err(ApiError::BadRequest("question_text must not be empty".to_string()));
    }

    let correct_option = payload.normalized_correct_option();
    if payload.question_type == QuestionType::Mcq {
        validate_mcq_options(payload.options(), correct_option.as_deref())?;
    }
    Ok(correct_option)
}

fn write_params<'a>(
    payload: &'a QuestionWrite,
    correct_option: Option<&'a str>,
) -> repositories::questions::QuestionWrite<'a> {
    repositories::questions::QuestionWrite {
        question_text: payload.question_text.trim(),
        question_text_ur: non_blank(payload.question_text_ur.as_deref()),
        options: payload.options(),
        options_ur: payload.options_ur(),
        correct_option,
        answer_text: non_blank(payload.answer_text.as_deref()),
        difficulty: payload.difficulty,
        question_type: payload.question_type,
        source_type: payload.source_type,
        subject_id: payload.subject_id.trim(),
        chapter_id: non_blank(payload.chapter_id.as_deref()),
        topic_id: non_blank(payload.topic_id.as_deref()),
        class_subject_id: non_blank(payload.class_subject_id.as_deref()),
    }
}

pub(super) async fn list_questions(
    Query(query): Query<ListQuestionsQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<QuestionResponse>>, ApiError> {
    let difficulty =
        DifficultyLevel::parse_filter(query.difficulty.as_deref()).map_err(ApiError::BadRequest)?;
    let source_type =
        QuestionSource::parse_filter(query.source_type.as_deref()).map_err(ApiError::BadRequest)?;

    let page = Page::new(query.skip, query.limit);
    let rows = repositories::questions::list(
        state.db(),
        repositories::questions::ListQuestionsParams {
            subject_id: non_blank(query.subject_id.as_deref()).map(str::to_string),
            chapter_id: non_blank(query.chapter_id.as_deref()).map(str::to_string),
            topic_id: non_blank(query.topic_id.as_deref()).map(str::to_string),
            question_type: query.question_type,
            difficulty,
            source_type,
            search: non_blank(query.search.as_deref()).map(str::to_string),
            skip: page.skip,
            limit: page.limit,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let total_count = rows.first().map(|row| row.total_count).unwrap_or(0);
    let items = rows.into_iter().map(|row| QuestionResponse::from(row.question)).collect();

    Ok(Json(PaginatedResponse::new(items, total_count, page)))
}

pub(super) async fn get_question(
    Path(question_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question = repositories::questions::find_by_id(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;
    Ok(Json(QuestionResponse::from(question)))
}

pub(super) async fn create_question(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<QuestionWrite>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let correct_option = check_question(&payload)?;
    let question = repositories::questions::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        write_params(&payload, correct_option.as_deref()),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create question"))?;

    tracing::info!(
        question_id = %question.id,
        question_type = question.question_type.as_str(),
        admin_id = %admin.id,
        "Question created"
    );
    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))))
}

pub(super) async fn update_question(
    Path(question_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<QuestionWrite>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let correct_option = check_question(&payload)?;
    let question = repositories::questions::update(
        state.db(),
        &question_id,
        write_params(&payload, correct_option.as_deref()),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to update question"))?
    .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(QuestionResponse::from(question)))
}

pub(super) async fn delete_question(
    Path(question_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::questions::delete_by_id(state.db(), &question_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete question"))?;
    if !deleted {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
