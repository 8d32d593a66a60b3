use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::post::PostRow;
use crate::models::section::SectionRow;
use crate::sections::kind::SectionKind;

const COLUMNS: &str = "id, profile_id, kind, title, published, data, created_at, updated_at";

pub async fn insert_section(
    pool: &PgPool,
    profile_id: Uuid,
    kind: SectionKind,
    title: &str,
    data: &Value,
) -> Result<SectionRow, sqlx::Error> {
    let query = format!(
        "INSERT INTO sections (id, profile_id, kind, title, data)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, SectionRow>(&query)
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(kind.as_str())
        .bind(title)
        .bind(data)
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    profile_id: Uuid,
    kind: SectionKind,
    id: Uuid,
) -> Result<Option<SectionRow>, sqlx::Error> {
    let query =
        format!("SELECT {COLUMNS} FROM sections WHERE id = $1 AND profile_id = $2 AND kind = $3");
    sqlx::query_as::<_, SectionRow>(&query)
        .bind(id)
        .bind(profile_id)
        .bind(kind.as_str())
        .fetch_optional(pool)
        .await
}

/// Lists one kind of section for a profile, oldest first. Drafts are
/// included only for the owner.
pub async fn list_by_kind(
    pool: &PgPool,
    profile_id: Uuid,
    kind: SectionKind,
    include_drafts: bool,
) -> Result<Vec<SectionRow>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM sections
         WHERE profile_id = $1 AND kind = $2 AND (published OR $3)
         ORDER BY created_at ASC"
    );
    sqlx::query_as::<_, SectionRow>(&query)
        .bind(profile_id)
        .bind(kind.as_str())
        .bind(include_drafts)
        .fetch_all(pool)
        .await
}

pub async fn update_section(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    data: &Value,
) -> Result<Option<SectionRow>, sqlx::Error> {
    let query = format!(
        "UPDATE sections SET title = $2, data = $3, updated_at = now()
         WHERE id = $1
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, SectionRow>(&query)
        .bind(id)
        .bind(title)
        .bind(data)
        .fetch_optional(pool)
        .await
}

pub async fn set_published(pool: &PgPool, id: Uuid, published: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE sections SET published = $2, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(published)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Physical delete. Join rows cascade; referenced posts survive.
pub async fn delete_section(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sections WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Posts attached to a section, for edit and detail views.
pub async fn posts_for_section(pool: &PgPool, section_id: Uuid) -> Result<Vec<PostRow>, sqlx::Error> {
    sqlx::query_as::<_, PostRow>(
        "SELECT p.id, p.profile_id, p.slug, p.title, p.content, p.published,
                p.created_at, p.updated_at
         FROM posts p
         JOIN section_posts sp ON sp.post_id = p.id
         WHERE sp.section_id = $1
         ORDER BY p.created_at ASC",
    )
    .bind(section_id)
    .fetch_all(pool)
    .await
}

/// Splits the desired link set against the current one.
fn diff_links(current: &[Uuid], desired: &[Uuid]) -> (Vec<Uuid>, Vec<Uuid>) {
    let to_unlink = current
        .iter()
        .copied()
        .filter(|id| !desired.contains(id))
        .collect();
    let to_link = desired
        .iter()
        .copied()
        .filter(|id| !current.contains(id))
        .collect();
    (to_unlink, to_link)
}

/// Reconciles a section's attached posts to exactly `post_ids`.
/// Same shape as tag reconciliation: one transaction, idempotent link
/// inserts, and links outside the new set removed.
pub async fn set_section_posts(
    pool: &PgPool,
    section_id: Uuid,
    post_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let current: Vec<Uuid> =
        sqlx::query_scalar("SELECT post_id FROM section_posts WHERE section_id = $1")
            .bind(section_id)
            .fetch_all(&mut *tx)
            .await?;

    let (to_unlink, to_link) = diff_links(&current, post_ids);

    for post_id in to_unlink {
        sqlx::query("DELETE FROM section_posts WHERE section_id = $1 AND post_id = $2")
            .bind(section_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
    }

    for post_id in to_link {
        sqlx::query(
            "INSERT INTO section_posts (section_id, post_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(section_id)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Returns the subset of `post_ids` that do NOT belong to the profile.
/// Used to reject cross-profile attachments before reconciling.
pub async fn foreign_post_ids(
    pool: &PgPool,
    profile_id: Uuid,
    post_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let owned: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM posts WHERE profile_id = $1 AND id = ANY($2)")
            .bind(profile_id)
            .bind(post_ids)
            .fetch_all(pool)
            .await?;
    Ok(post_ids
        .iter()
        .copied()
        .filter(|id| !owned.contains(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_links_disjoint() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let (unlink, link) = diff_links(&[a], &[b]);
        assert_eq!(unlink, vec![a]);
        assert_eq!(link, vec![b]);
    }

    #[test]
    fn test_diff_links_overlap_is_untouched() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let (unlink, link) = diff_links(&[a, b], &[b, c]);
        assert_eq!(unlink, vec![a]);
        assert_eq!(link, vec![c]);
    }

    #[test]
    fn test_diff_links_identical_is_noop() {
        let a = Uuid::new_v4();
        let (unlink, link) = diff_links(&[a], &[a]);
        assert!(unlink.is_empty());
        assert!(link.is_empty());
    }
}
