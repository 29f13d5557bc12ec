use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::{validate_payload, ApiJson};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::catalog::{
    ChapterListQuery, ChapterResponse, ChapterWrite, ClassResponse, ClassSubjectCreate,
    ClassSubjectListQuery, ClassSubjectResponse, NamedEntityWrite, SubjectResponse, TopicListQuery,
    TopicResponse, TopicWrite,
};

fn deleted_or_not_found(deleted: bool, entity: &str) -> Result<StatusCode, ApiError> {
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("{entity} not found")))
    }
}

pub(super) async fn list_classes(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;
    Ok(Json(classes.into_iter().map(ClassResponse::from).collect()))
}

pub(super) async fn create_class(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NamedEntityWrite>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    validate_payload(&payload)?;
    let class = repositories::classes::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        payload.name.trim(),
        payload.description.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create class"))?;

    tracing::info!(class_id = %class.id, admin_id = %admin.id, "Class created");
    Ok((StatusCode::CREATED, Json(ClassResponse::from(class))))
}

pub(super) async fn update_class(
    Path(class_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NamedEntityWrite>,
) -> Result<Json<ClassResponse>, ApiError> {
    validate_payload(&payload)?;
    let class = repositories::classes::update(
        state.db(),
        &class_id,
        payload.name.trim(),
        payload.description.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to update class"))?
    .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    Ok(Json(ClassResponse::from(class)))
}

pub(super) async fn delete_class(
    Path(class_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::classes::delete_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete class"))?;
    deleted_or_not_found(deleted, "Class")
}

pub(super) async fn list_subjects(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = repositories::subjects::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list subjects"))?;
    Ok(Json(subjects.into_iter().map(SubjectResponse::from).collect()))
}

pub(super) async fn create_subject(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NamedEntityWrite>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    validate_payload(&payload)?;
    let subject = repositories::subjects::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        payload.name.trim(),
        payload.description.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create subject"))?;

    tracing::info!(subject_id = %subject.id, admin_id = %admin.id, "Subject created");
    Ok((StatusCode::CREATED, Json(SubjectResponse::from(subject))))
}

pub(super) async fn update_subject(
    Path(subject_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NamedEntityWrite>,
) -> Result<Json<SubjectResponse>, ApiError> {
    validate_payload(&payload)?;
    let subject = repositories::subjects::update(
        state.db(),
        &subject_id,
        payload.name.trim(),
        payload.description.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to update subject"))?
    .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;

    Ok(Json(SubjectResponse::from(subject)))
}

pub(super) async fn delete_subject(
    Path(subject_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::subjects::delete_by_id(state.db(), &subject_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete subject"))?;
    deleted_or_not_found(deleted, "Subject")
}

pub(super) async fn list_class_subjects(
    Query(query): Query<ClassSubjectListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassSubjectResponse>>, ApiError> {
    let links = repositories::class_subjects::list(state.db(), query.class_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list class subjects"))?;
    Ok(Json(links.into_iter().map(ClassSubjectResponse::from).collect()))
}

pub(super) async fn create_class_subject(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ClassSubjectCreate>,
) -> Result<(StatusCode, Json<ClassSubjectResponse>), ApiError> {
    validate_payload(&payload)?;
    let link = repositories::class_subjects::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        &payload.class_id,
        &payload.subject_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to link subject to class"))?;

    Ok((StatusCode::CREATED, Json(ClassSubjectResponse::from(link))))
}

pub(super) async fn delete_class_subject(
    Path(link_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::class_subjects::delete_by_id(state.db(), &link_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete class subject"))?;
    deleted_or_not_found(deleted, "Class subject")
}

pub(super) async fn list_chapters(
    Query(query): Query<ChapterListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChapterResponse>>, ApiError> {
    let chapters = repositories::chapters::list(
        state.db(),
        query.subject_id.as_deref(),
        query.class_subject_id.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list chapters"))?;
    Ok(Json(chapters.into_iter().map(ChapterResponse::from).collect()))
}

fn chapter_params(payload: &ChapterWrite) -> repositories::chapters::ChapterWrite<'_> {
    repositories::chapters::ChapterWrite {
        name: payload.name.trim(),
        chapter_no: payload.chapter_no,
        subject_id: &payload.subject_id,
        class_subject_id: payload.class_subject_id.as_deref().filter(|id| !id.trim().is_empty()),
    }
}

pub(super) async fn create_chapter(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChapterWrite>,
) -> Result<(StatusCode, Json<ChapterResponse>), ApiError> {
    validate_payload(&payload)?;
    let chapter = repositories::chapters::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        chapter_params(&payload),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create chapter"))?;

    Ok((StatusCode::CREATED, Json(ChapterResponse::from(chapter))))
}

pub(super) async fn update_chapter(
    Path(chapter_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChapterWrite>,
) -> Result<Json<ChapterResponse>, ApiError> {
    validate_payload(&payload)?;
    let chapter = repositories::chapters::update(
        state.db(),
        &chapter_id,
        chapter_params(&payload),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to update chapter"))?
    .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))?;

    Ok(Json(ChapterResponse::from(chapter)))
}

pub(super) async fn delete_chapter(
    Path(chapter_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::chapters::delete_by_id(state.db(), &chapter_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete chapter"))?;
    deleted_or_not_found(deleted, "Chapter")
}

pub(super) async fn list_topics(
    Query(query): Query<TopicListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<TopicResponse>>, ApiError> {
    let topics = repositories::topics::list(state.db(), query.chapter_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;
    Ok(Json(topics.into_iter().map(TopicResponse::from).collect()))
}

pub(super) async fn create_topic(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TopicWrite>,
) -> Result<(StatusCode, Json<TopicResponse>), ApiError> {
    validate_payload(&payload)?;
    let topic = repositories::topics::create(
        state.db(),
        &Uuid::new_v4().to_string(),
        payload.name.trim(),
        &payload.chapter_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create topic"))?;

    Ok((StatusCode::CREATED, Json(TopicResponse::from(topic))))
}

pub(super) async fn update_topic(
    Path(topic_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TopicWrite>,
) -> Result<Json<TopicResponse>, ApiError> {
    validate_payload(&payload)?;
    let topic = repositories::topics::update(
        state.db(),
        &topic_id,
        payload.name.trim(),
        &payload.chapter_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to update topic"))?
    .ok_or_else(|| ApiError::NotFound("Topic not found".to_string()))?;

    Ok(Json(TopicResponse::from(topic)))
}

pub(super) async fn delete_topic(
    Path(topic_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::topics::delete_by_id(state.db(), &topic_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete topic"))?;
    deleted_or_not_found(deleted, "Topic")
}
