use sqlx::PgPool;
use uuid::Uuid;

/// Turns a title into a URL slug: lowercase ASCII alphanumeric runs joined
/// by single hyphens. Falls back to "post" when nothing survives.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

fn with_suffix(base: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{base}-{}", &suffix[..8])
}

/// Picks a globally unique slug for a new post. The base slug is preferred;
/// on collision a random suffix is appended. A concurrent insert racing past
/// this check still lands on the `uq_posts_slug` index and comes back as a
/// 409, never as a duplicate.
pub async fn unique_slug(pool: &PgPool, title: &str) -> Result<String, sqlx::Error> {
    let base = slugify(title);
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
        .bind(&base)
        .fetch_one(pool)
        .await?;

    if !taken {
        return Ok(base);
    }
    Ok(with_suffix(&base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("Design -- & Code!"), "design-code");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Top 10 Tools of 2024"), "top-10-tools-of-2024");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café – Menü"), "caf-men");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify(""), "post");
        assert_eq!(slugify("!!!"), "post");
    }

    #[test]
    fn test_slugify_no_edge_hyphens() {
        let slug = slugify("...leading and trailing...");
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_suffix_shape() {
        let suffixed = with_suffix("hello-world");
        assert!(suffixed.starts_with("hello-world-"));
        assert_eq!(suffixed.len(), "hello-world-".len() + 8);
    }
}
