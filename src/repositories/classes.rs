use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Class;

pub(crate) const COLUMNS: &str = "id, name, description, created_at, updated_at";

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes ORDER BY name"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    description: Option<&str>,
    now: PrimitiveDateTime,
) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "INSERT INTO classes (id, name, description, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    name: &str,
    description: Option<&str>,
    now: PrimitiveDateTime,
) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "UPDATE classes SET name = $2, description = $3, updated_at = $4
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
