use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Profile;
use crate::db::types::UserRole;

pub(crate) const COLUMNS: &str = "id, full_name, role, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg_attr(not(test), allow(dead_code))]
pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    full_name: &str,
    role: UserRole,
    now: PrimitiveDateTime,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!(
        "INSERT INTO profiles (id, full_name, role, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(full_name)
    .bind(role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}
