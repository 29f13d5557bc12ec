use sqlx::types::Json as SqlxJson;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Paper, PaperQuestionIds};

pub(crate) const COLUMNS: &str = "\
    id, title, subject_id, class_id, paper_pdf_url, key_pdf_url, question_ids, settings, \
    created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PaperSummaryRow {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) paper_pdf_url: Option<String>,
    pub(crate) key_pdf_url: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) total_count: i64,
}

pub(crate) struct CreatePaper<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) subject_id: &'a str,
    pub(crate) class_id: Option<&'a str>,
    pub(crate) question_ids: PaperQuestionIds,
    pub(crate) settings: serde_json::Value,
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreatePaper<'_>,
) -> Result<Paper, sqlx::Error> {
    sqlx::query_as::<_, Paper>(&format!(
        "INSERT INTO papers (
            id, title, subject_id, class_id, paper_pdf_url, key_pdf_url, question_ids, settings,
            created_at, updated_at
         ) VALUES ($1,$2,$3,$4,NULL,NULL,$5,$6,$7,$8)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.subject_id)
    .bind(params.class_id)
    .bind(SqlxJson(params.question_ids))
    .bind(SqlxJson(params.settings))
    .bind(params.now)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Paper>, sqlx::Error> {
    sqlx::query_as::<_, Paper>(&format!("SELECT {COLUMNS} FROM papers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn set_paper_url(
    pool: &PgPool,
    id: &str,
    url: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE papers SET paper_pdf_url = $1, updated_at = $2 WHERE id = $3")
        .bind(url)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn set_key_url(
    pool: &PgPool,
    id: &str,
    url: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE papers SET key_pdf_url = $1, updated_at = $2 WHERE id = $3")
        .bind(url)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) struct ListPapersParams {
    pub(crate) subject_id: Option<String>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

pub(crate) async fn list_summaries(
    pool: &PgPool,
    params: ListPapersParams,
) -> Result<Vec<PaperSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, PaperSummaryRow>(
        "SELECT p.id,
                p.title,
                p.subject_id,
                s.name AS subject_name,
                p.paper_pdf_url,
                p.key_pdf_url,
                p.created_at,
                COUNT(*) OVER() AS total_count
         FROM papers p
         JOIN subjects s ON s.id = p.subject_id
         WHERE ($1::text IS NULL OR p.subject_id = $1)
         ORDER BY p.created_at DESC, p.id DESC
         OFFSET $2
         LIMIT $3",
    )
    .bind(params.subject_id)
    .bind(params.skip.max(0))
    .bind(params.limit.clamp(1, 1000))
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM papers WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
