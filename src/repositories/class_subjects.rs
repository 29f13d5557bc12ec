use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::ClassSubject;

pub(crate) const COLUMNS: &str = "id, class_id, subject_id, created_at";

pub(crate) async fn list(
    pool: &PgPool,
    class_id: Option<&str>,
) -> Result<Vec<ClassSubject>, sqlx::Error> {
    sqlx::query_as::<_, ClassSubject>(&format!(
        "SELECT {COLUMNS}
         FROM class_subject
         WHERE ($1::text IS NULL OR class_id = $1)
         ORDER BY class_id, subject_id"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    class_id: &str,
    subject_id: &str,
    now: PrimitiveDateTime,
) -> Result<ClassSubject, sqlx::Error> {
    sqlx::query_as::<_, ClassSubject>(&format!(
        "INSERT INTO class_subject (id, class_id, subject_id, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(class_id)
    .bind(subject_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM class_subject WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
