use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::api::pagination::{Page, PaginatedResponse};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::paper::{ListPapersQuery, PaperResponse, PaperSummaryResponse};
use crate::services::storage::{paper_object_key, PaperDocument, StorageService};

const DOWNLOAD_LINK_TTL: Duration = Duration::from_secs(15 * 60);

pub(super) async fn list_papers(
    Query(query): Query<ListPapersQuery>,
    CurrentStaff(_user): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<PaperSummaryResponse>>, ApiError> {
    let page = Page::new(query.skip, query.limit);
    let rows = repositories::papers::list_summaries(
        state.db(),
        repositories::papers::ListPapersParams {
            subject_id: query
                .subject_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            skip: page.skip,
            limit: page.limit,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list papers"))?;

    let total_count = rows.first().map(|row| row.total_count).unwrap_or(0);
    let items = rows.into_iter().map(PaperSummaryResponse::from).collect();

    Ok(Json(PaginatedResponse::new(items, total_count, page)))
}

async fn download_link(
    storage: &StorageService,
    paper_id: &str,
    document: PaperDocument,
    stored_url: Option<&str>,
) -> Option<String> {
    stored_url?;
    let key = paper_object_key(paper_id, document);
    match storage.presign_get(&key, DOWNLOAD_LINK_TTL).await {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::warn!(error = %err, paper_id, key = %key, "Failed to presign paper download");
            None
        }
    }
}

pub(super) async fn get_paper(
    Path(paper_id): Path<String>,
    CurrentStaff(_user): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<PaperResponse>, ApiError> {
    let paper = repositories::papers::find_by_id(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load paper"))?
        .ok_or_else(|| ApiError::NotFound("Paper not found".to_string()))?;

    let (paper_link, key_link) = match state.storage() {
        Some(storage) => (
            download_link(storage, &paper.id, PaperDocument::Paper, paper.paper_pdf_url.as_deref())
                .await,
            download_link(storage, &paper.id, PaperDocument::AnswerKey, paper.key_pdf_url.as_deref())
                .await,
        ),
        None => (None, None),
    };

    let mut response = PaperResponse::from_paper(paper);
    response.paper_download_url = paper_link;
    response.key_download_url = key_link;
    Ok(Json(response))
}

pub(super) async fn delete_paper(
    Path(paper_id): Path<String>,
    CurrentStaff(user): CurrentStaff,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::papers::delete_by_id(state.db(), &paper_id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Failed to delete paper"))?;
    if !deleted {
        return Err(ApiError::NotFound("Paper not found".to_string()));
    }

    if let Some(storage) = state.storage() {
        if let Err(err) = storage.delete_paper_objects(&paper_id).await {
            tracing::warn!(error = %err, paper_id = %paper_id, "Failed to delete paper PDFs");
        }
    }

    tracing::info!(paper_id = %paper_id, user_id = %user.id, "Paper deleted");
    Ok(StatusCode::NO_CONTENT)
}
