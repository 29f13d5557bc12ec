use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Chapter;

pub(crate) const COLUMNS: &str =
    "id, name, chapter_no, subject_id, class_subject_id, created_at, updated_at";

pub(crate) async fn list(
    pool: &PgPool,
    subject_id: Option<&str>,
    class_subject_id: Option<&str>,
) -> Result<Vec<Chapter>, sqlx::Error> {
    sqlx::query_as::<_, Chapter>(&format!(
        "SELECT {COLUMNS}
         FROM chapters
         WHERE ($1::text IS NULL OR subject_id = $1)
           AND ($2::text IS NULL OR class_subject_id = $2)
         ORDER BY chapter_no NULLS LAST, name"
    ))
    .bind(subject_id)
    .bind(class_subject_id)
    .fetch_all(pool)
    .await
}

/// Names of the given chapters, in the order of `ids`.
pub(crate) async fn list_names_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar(
        "SELECT name FROM chapters WHERE id = ANY($1) ORDER BY array_position($1::text[], id)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub(crate) struct ChapterWrite<'a> {
    pub(crate) name: &'a str,
    pub(crate) chapter_no: Option<i32>,
    pub(crate) subject_id: &'a str,
    pub(crate) class_subject_id: Option<&'a str>,
}

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    params: ChapterWrite<'_>,
    now: PrimitiveDateTime,
) -> Result<Chapter, sqlx::Error> {
    sqlx::query_as::<_, Chapter>(&format!(
        "INSERT INTO chapters (
            id, name, chapter_no, subject_id, class_subject_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.name)
    .bind(params.chapter_no)
    .bind(params.subject_id)
    .bind(params.class_subject_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: ChapterWrite<'_>,
    now: PrimitiveDateTime,
) -> Result<Option<Chapter>, sqlx::Error> {
    sqlx::query_as::<_, Chapter>(&format!(
        "UPDATE chapters
         SET name = $2, chapter_no = $3, subject_id = $4, class_subject_id = $5, updated_at = $6
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.name)
    .bind(params.chapter_no)
    .bind(params.subject_id)
    .bind(params.class_subject_id)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM chapters WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
