use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::ProfileRow;

const COLUMNS: &str = "id, user_id, username, display_name, headline, about, location, avatar, \
    section_order, created_at, updated_at";

pub struct NewProfile<'a> {
    pub user_id: Uuid,
    pub username: &'a str,
    pub display_name: &'a str,
    pub headline: Option<&'a str>,
    pub about: Option<&'a str>,
    pub location: Option<&'a str>,
}

/// Inserts a profile. A taken username or an existing profile for this user
/// trips a `uq_*` index and surfaces as a 409 through the error layer.
pub async fn insert_profile(pool: &PgPool, input: NewProfile<'_>) -> Result<ProfileRow, sqlx::Error> {
    let query = format!(
        "INSERT INTO profiles (id, user_id, username, display_name, headline, about, location)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.username)
        .bind(input.display_name)
        .bind(input.headline)
        .bind(input.about)
        .bind(input.location)
        .fetch_one(pool)
        .await
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM profiles WHERE username = $1");
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub struct ProfilePatch<'a> {
    pub display_name: Option<&'a str>,
    pub headline: Option<&'a str>,
    pub about: Option<&'a str>,
    pub location: Option<&'a str>,
}

/// Partial update; only non-`None` fields are applied.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    patch: ProfilePatch<'_>,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!(
        "UPDATE profiles SET
            display_name = COALESCE($2, display_name),
            headline = COALESCE($3, headline),
            about = COALESCE($4, about),
            location = COALESCE($5, location),
            updated_at = now()
         WHERE id = $1
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(id)
        .bind(patch.display_name)
        .bind(patch.headline)
        .bind(patch.about)
        .bind(patch.location)
        .fetch_optional(pool)
        .await
}

/// Persists the chosen section order as a list of kind identifiers.
/// Validation happens before this call; the store trusts its input.
pub async fn set_section_order(
    pool: &PgPool,
    id: Uuid,
    order: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET section_order = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(order)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replaces the stored avatar pointer; `None` clears it.
pub async fn set_avatar(
    pool: &PgPool,
    id: Uuid,
    avatar: Option<&Value>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE profiles SET avatar = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(avatar)
        .execute(pool)
        .await?;
    Ok(())
}
