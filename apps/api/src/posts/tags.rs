use sqlx::PgPool;
use uuid::Uuid;

use crate::models::post::TagRow;

/// Normalizes free-text tag input: trimmed, lowercased, empties dropped,
/// duplicates collapsed preserving first occurrence.
pub fn normalize_tags(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim().to_lowercase();
        if name.is_empty() || out.contains(&name) {
            continue;
        }
        out.push(name);
    }
    out
}

/// Splits a desired tag set against the currently linked tags: which links
/// to drop, which names to upsert-and-link. Names already linked are left
/// alone so existing tag rows are reused, never duplicated.
pub fn plan_reconcile<'a>(
    current: &[(Uuid, String)],
    desired: &'a [String],
) -> (Vec<Uuid>, Vec<&'a str>) {
    let to_unlink = current
        .iter()
        .filter(|(_, name)| !desired.iter().any(|d| d == name))
        .map(|(id, _)| *id)
        .collect();

    let to_link = desired
        .iter()
        .filter(|d| !current.iter().any(|(_, name)| name == *d))
        .map(String::as_str)
        .collect();

    (to_unlink, to_link)
}

/// Reconciles a post's tags to exactly `names` inside one transaction.
///
/// Each new tag is a single atomic upsert keyed on the
/// `uq_tags_profile_name` index, so two concurrent saves inventing the same
/// tag converge on one row instead of racing an exists-check.
pub async fn set_post_tags(
    pool: &PgPool,
    profile_id: Uuid,
    post_id: Uuid,
    names: &[String],
) -> Result<(), sqlx::Error> {
    let desired = normalize_tags(names);
    let mut tx = pool.begin().await?;

    let current: Vec<(Uuid, String)> = sqlx::query_as(
        "SELECT t.id, t.name FROM tags t
         JOIN post_tags pt ON pt.tag_id = t.id
         WHERE pt.post_id = $1",
    )
    .bind(post_id)
    .fetch_all(&mut *tx)
    .await?;

    let (to_unlink, to_link) = plan_reconcile(&current, &desired);

    for tag_id in to_unlink {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1 AND tag_id = $2")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    for name in to_link {
        let tag_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tags (id, profile_id, name) VALUES ($1, $2, $3)
             ON CONFLICT (profile_id, name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(profile_id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Tags currently linked to a post, for response bodies.
pub async fn tags_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<TagRow>, sqlx::Error> {
    sqlx::query_as::<_, TagRow>(
        "SELECT t.id, t.profile_id, t.name FROM tags t
         JOIN post_tags pt ON pt.tag_id = t.id
         WHERE pt.post_id = $1
         ORDER BY t.name ASC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> (Uuid, String) {
        (Uuid::new_v4(), name.to_string())
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let names = vec![" Design ".to_string(), "RUST".to_string()];
        assert_eq!(normalize_tags(&names), vec!["design", "rust"]);
    }

    #[test]
    fn test_normalize_drops_empty_and_duplicates() {
        let names = vec![
            "a".to_string(),
            "  ".to_string(),
            "A".to_string(),
            "b".to_string(),
        ];
        assert_eq!(normalize_tags(&names), vec!["a", "b"]);
    }

    #[test]
    fn test_reconcile_ab_to_bc() {
        let a = tag("a");
        let b = tag("b");
        let desired = vec!["b".to_string(), "c".to_string()];
        let (to_unlink, to_link) = plan_reconcile(&[a.clone(), b], &desired);

        // a is unlinked, b is reused untouched, exactly one c is created.
        assert_eq!(to_unlink, vec![a.0]);
        assert_eq!(to_link, vec!["c"]);
    }

    #[test]
    fn test_reconcile_same_set_is_noop() {
        let a = tag("a");
        let b = tag("b");
        let desired = vec!["a".to_string(), "b".to_string()];
        let (to_unlink, to_link) = plan_reconcile(&[a, b], &desired);
        assert!(to_unlink.is_empty());
        assert!(to_link.is_empty());
    }

    #[test]
    fn test_reconcile_empty_desired_unlinks_all() {
        let a = tag("a");
        let b = tag("b");
        let (to_unlink, to_link) = plan_reconcile(&[a.clone(), b.clone()], &[]);
        assert_eq!(to_unlink, vec![a.0, b.0]);
        assert!(to_link.is_empty());
    }

    #[test]
    fn test_reconcile_from_nothing_links_all() {
        let desired = vec!["x".to_string(), "y".to_string()];
        let (to_unlink, to_link) = plan_reconcile(&[], &desired);
        assert!(to_unlink.is_empty());
        assert_eq!(to_link, vec!["x", "y"]);
    }
}
