use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Topic;

pub(crate) const COLUMNS: &str = "id, name, chapter_id, created_at, updated_at";

pub(crate) async fn list(pool: &PgPool, chapter_id: Option<&str>) -> Result<Vec<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "SELECT {COLUMNS}
         FROM topics
         WHERE ($1::text IS NULL OR chapter_id = $1)
         ORDER BY name"
    ))
    .bind(chapter_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    chapter_id: &str,
    now: PrimitiveDateTime,
) -> Result<Topic, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "INSERT INTO topics (id, name, chapter_id, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(chapter_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    name: &str,
    chapter_id: &str,
    now: PrimitiveDateTime,
) -> Result<Option<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(&format!(
        "UPDATE topics SET name = $2, chapter_id = $3, updated_at = $4
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(chapter_id)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM topics WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
