use sqlx::PgPool;
use uuid::Uuid;

use crate::models::post::PostRow;

const COLUMNS: &str = "id, profile_id, slug, title, content, published, created_at, updated_at";

pub async fn insert_post(
    pool: &PgPool,
    profile_id: Uuid,
    slug: &str,
    title: &str,
    content: &str,
) -> Result<PostRow, sqlx::Error> {
    let query = format!(
        "INSERT INTO posts (id, profile_id, slug, title, content)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, PostRow>(&query)
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(slug)
        .bind(title)
        .bind(content)
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    profile_id: Uuid,
    id: Uuid,
) -> Result<Option<PostRow>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1 AND profile_id = $2");
    sqlx::query_as::<_, PostRow>(&query)
        .bind(id)
        .bind(profile_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(
    pool: &PgPool,
    profile_id: Uuid,
    slug: &str,
) -> Result<Option<PostRow>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM posts WHERE slug = $1 AND profile_id = $2");
    sqlx::query_as::<_, PostRow>(&query)
        .bind(slug)
        .bind(profile_id)
        .fetch_optional(pool)
        .await
}

/// Newest first; drafts included only for the owner.
pub async fn list_by_profile(
    pool: &PgPool,
    profile_id: Uuid,
    include_drafts: bool,
) -> Result<Vec<PostRow>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM posts
         WHERE profile_id = $1 AND (published OR $2)
         ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, PostRow>(&query)
        .bind(profile_id)
        .bind(include_drafts)
        .fetch_all(pool)
        .await
}

/// Partial update of title and content. The slug column is deliberately
/// absent: slugs are immutable once generated.
pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Option<PostRow>, sqlx::Error> {
    let query = format!(
        "UPDATE posts SET
            title = COALESCE($2, title),
            content = COALESCE($3, content),
            updated_at = now()
         WHERE id = $1
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, PostRow>(&query)
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_optional(pool)
        .await
}

pub async fn set_published(pool: &PgPool, id: Uuid, published: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE posts SET published = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(published)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Physical delete. Tag and section links cascade away with it.
pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Links a post to a section at creation time (the origin link).
pub async fn link_section(pool: &PgPool, section_id: Uuid, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO section_posts (section_id, post_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
    )
    .bind(section_id)
    .bind(post_id)
    .execute(pool)
    .await?;
    Ok(())
}
